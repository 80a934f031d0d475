//! Rendering of predicates to PostgreSQL `WHERE` fragments.
//!
//! Tasks are stored as one JSONB `document` column; every field reference is
//! a `->>` extraction cast to the field's storage type. Literals are inlined
//! with quotes doubled, the way all generated SQL in this crate is built.

use super::predicate::{Clause, FieldKind, FieldValue, Predicate, TaskField};

/// Column holding the task document
pub const DOCUMENT_COLUMN: &str = "document";

/// Represents different types of SQL conditions
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Simple {
        field: String,
        operator: String,
        value: String,
    },
    In {
        field: String,
        values: Vec<String>,
    },
    IsNotNull {
        field: String,
    },
    /// Case-insensitive substring match; `pattern` is already escaped
    ILike {
        field: String,
        pattern: String,
    },
    JsonHasAnyKeys {
        field: String,
        keys: Vec<String>,
    },
    JsonArrayNonEmpty {
        field: String,
    },
    Raw {
        sql: String,
    },
}

impl Condition {
    /// Convert condition to SQL string
    pub fn to_sql(&self) -> String {
        match self {
            Condition::Simple {
                field,
                operator,
                value,
            } => format!("{field} {operator} {value}"),
            Condition::In { field, values } => {
                format!("{field} IN ({})", values.join(", "))
            }
            Condition::IsNotNull { field } => format!("{field} IS NOT NULL"),
            Condition::ILike { field, pattern } => {
                format!("{field} ILIKE {} ESCAPE '\\'", quote_literal(pattern))
            }
            Condition::JsonHasAnyKeys { field, keys } => {
                let key_list = keys
                    .iter()
                    .map(|k| quote_literal(k))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{field} ?| array[{key_list}]::text[]")
            }
            Condition::JsonArrayNonEmpty { field } => {
                format!("jsonb_array_length(COALESCE({field}, '[]'::jsonb)) > 0")
            }
            Condition::Raw { sql } => sql.clone(),
        }
    }

    /// Translate one predicate clause
    pub fn from_clause(clause: &Clause) -> Condition {
        match clause {
            Clause::Equals { field, value } => Condition::Simple {
                field: field_expr(*field),
                operator: "=".to_string(),
                value: format_value(value),
            },
            Clause::NotEquals { field, value } => Condition::Simple {
                field: field_expr(*field),
                operator: "IS DISTINCT FROM".to_string(),
                value: format_value(value),
            },
            Clause::AnyOf { field, values } => match field.kind() {
                FieldKind::List => Condition::JsonHasAnyKeys {
                    field: field_expr(*field),
                    keys: values.clone(),
                },
                _ => Condition::In {
                    field: field_expr(*field),
                    values: values.iter().map(|v| quote_literal(v)).collect(),
                },
            },
            Clause::TextSearch { fields, needle } => {
                let pattern = format!("%{}%", escape_like(needle));
                let conditions = fields
                    .iter()
                    .map(|field| Condition::ILike {
                        field: field_expr(*field),
                        pattern: pattern.clone(),
                    })
                    .collect();
                Condition::Raw {
                    sql: WhereClause::or(conditions).to_sql(),
                }
            }
            Clause::Exists { field } => Condition::IsNotNull {
                field: field_expr(*field),
            },
            Clause::Compare { field, op, value } => Condition::Simple {
                field: field_expr(*field),
                operator: op.sql_operator().to_string(),
                value: format_value(value),
            },
            Clause::NonEmpty { field } => Condition::JsonArrayNonEmpty {
                field: field_expr(*field),
            },
        }
    }
}

/// Represents a WHERE clause that can contain multiple conditions
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub conditions: Vec<Condition>,
    pub operator: LogicalOperator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
}

impl WhereClause {
    /// Combine multiple conditions with AND
    pub fn and(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::And,
        }
    }

    /// Combine multiple conditions with OR
    pub fn or(conditions: Vec<Condition>) -> Self {
        Self {
            conditions,
            operator: LogicalOperator::Or,
        }
    }

    pub fn from_predicate(predicate: &Predicate) -> Self {
        Self::and(
            predicate
                .clauses()
                .iter()
                .map(Condition::from_clause)
                .collect(),
        )
    }

    /// Convert to SQL string
    pub fn to_sql(&self) -> String {
        if self.conditions.is_empty() {
            // An empty OR group is unsatisfiable, an empty AND group is not
            return match self.operator {
                LogicalOperator::And => "1=1".to_string(),
                LogicalOperator::Or => "1=0".to_string(),
            };
        }

        if self.conditions.len() == 1 {
            return self.conditions[0].to_sql();
        }

        let operator_str = match self.operator {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
        };

        let condition_sqls: Vec<String> = self.conditions.iter().map(|c| c.to_sql()).collect();

        format!("({})", condition_sqls.join(operator_str))
    }
}

/// SQL expression reading `field` out of the document column
pub fn field_expr(field: TaskField) -> String {
    let key = field.json_key();
    match field.kind() {
        FieldKind::Text => format!("{DOCUMENT_COLUMN}->>'{key}'"),
        FieldKind::Bool => format!("({DOCUMENT_COLUMN}->>'{key}')::boolean"),
        FieldKind::Time => format!("({DOCUMENT_COLUMN}->>'{key}')::timestamptz"),
        FieldKind::Number => format!("({DOCUMENT_COLUMN}->>'{key}')::double precision"),
        FieldKind::List => format!("{DOCUMENT_COLUMN}->'{key}'"),
    }
}

/// Format a field value for SQL
pub fn format_value(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => quote_literal(s),
        FieldValue::Bool(b) => b.to_string(),
        FieldValue::Time(t) => format!("{}::timestamptz", quote_literal(&t.to_rfc3339())),
        FieldValue::Number(n) if n.is_finite() => n.to_string(),
        FieldValue::Number(_) => "NULL".to_string(),
    }
}

pub fn quote_literal(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Escape LIKE metacharacters so the needle matches literally
pub fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for ch in needle.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
