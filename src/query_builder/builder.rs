use super::aggregation::{Accumulator, AggregationPipeline};
use super::conditions::{field_expr, WhereClause};
use super::pagination::PageWindow;
use super::predicate::{FieldKind, Predicate, TaskField};
use super::sort::{SortDirection, SortSpec};
use sqlx::{PgPool, Row};

/// Column alias carrying the group key in aggregation queries
pub const GROUP_KEY_COLUMN: &str = "group_key";

/// SQL builder over the task document table
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    base_table: String,
    select_fields: Vec<String>,
    where_clauses: Vec<WhereClause>,
    group_by: Vec<String>,
    having: Vec<String>,
    order_by: Vec<String>,
    window: Option<PageWindow>,
}

impl QueryBuilder {
    /// Create a new query builder for the given table
    pub fn new(table: &str) -> Self {
        Self {
            base_table: table.to_string(),
            select_fields: vec!["*".to_string()],
            where_clauses: Vec::new(),
            group_by: Vec::new(),
            having: Vec::new(),
            order_by: Vec::new(),
            window: None,
        }
    }

    /// Set specific fields to select
    pub fn select(mut self, fields: &[&str]) -> Self {
        self.select_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Add a WHERE clause
    pub fn where_clause(mut self, clause: WhereClause) -> Self {
        if !clause.conditions.is_empty() {
            self.where_clauses.push(clause);
        }
        self
    }

    /// Restrict rows to tasks matching `predicate`
    pub fn where_predicate(self, predicate: &Predicate) -> Self {
        self.where_clause(WhereClause::from_predicate(predicate))
    }

    /// Add GROUP BY clause
    pub fn group_by(mut self, fields: &[&str]) -> Self {
        self.group_by.extend(fields.iter().map(|f| f.to_string()));
        self
    }

    /// Add HAVING condition
    pub fn having(mut self, condition: &str) -> Self {
        self.having.push(condition.to_string());
        self
    }

    /// Add ORDER BY clause
    pub fn order_by(mut self, field: &str, direction: &str) -> Self {
        self.order_by.push(format!("{field} {direction}"));
        self
    }

    /// Order by a single task field. Unset values come first ascending and
    /// last descending; text compares bytewise.
    pub fn order_by_spec(self, spec: SortSpec) -> Self {
        let field = spec.field.field();
        let expr = match field.kind() {
            FieldKind::Text => format!("{} COLLATE \"C\"", field_expr(field)),
            _ => field_expr(field),
        };
        let direction = match spec.direction {
            SortDirection::Asc => "ASC NULLS FIRST",
            SortDirection::Desc => "DESC NULLS LAST",
        };
        self.order_by(&expr, direction)
    }

    /// Add LIMIT/OFFSET
    pub fn window(mut self, window: PageWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Build the complete SQL query string
    pub fn build_sql(&self) -> String {
        let mut sql = String::new();

        // SELECT clause
        sql.push_str("SELECT ");
        sql.push_str(&self.select_fields.join(", "));

        // FROM clause
        sql.push_str(&format!(" FROM {}", self.base_table));

        // WHERE clauses
        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            let where_parts: Vec<String> = self
                .where_clauses
                .iter()
                .map(|clause| clause.to_sql())
                .collect();
            sql.push_str(&where_parts.join(" AND "));
        }

        // GROUP BY
        if !self.group_by.is_empty() {
            sql.push_str(&format!(" GROUP BY {}", self.group_by.join(", ")));
        }

        // HAVING
        if !self.having.is_empty() {
            sql.push_str(&format!(" HAVING {}", self.having.join(" AND ")));
        }

        // ORDER BY
        if !self.order_by.is_empty() {
            sql.push_str(&format!(" ORDER BY {}", self.order_by.join(", ")));
        }

        // LIMIT/OFFSET
        if let Some(ref window) = self.window {
            sql.push_str(&window.to_sql());
        }

        sql
    }

    /// Count query over the same rows, ignoring order and window
    pub fn count_sql(&self) -> String {
        let mut count_builder = self.clone();
        count_builder.select_fields = vec!["COUNT(*)".to_string()];
        count_builder.order_by.clear();
        count_builder.window = None;
        count_builder.build_sql()
    }

    /// Render an aggregation pipeline.
    ///
    /// Each row carries [`GROUP_KEY_COLUMN`] plus one `double precision`
    /// column per accumulator, named after it. A pipeline over no rows
    /// yields no rows, grouped or not.
    pub fn aggregate(table: &str, pipeline: &AggregationPipeline) -> Self {
        let key_expr = match pipeline.group_by {
            Some(field) => group_expr(field),
            None => "NULL::text".to_string(),
        };
        let mut select = vec![format!("{key_expr} AS {GROUP_KEY_COLUMN}")];
        select.extend(
            pipeline
                .accumulators
                .iter()
                .map(|(name, acc)| format!("{} AS {}", accumulator_sql(acc), quote_ident(name))),
        );

        let mut builder = Self::new(table).where_predicate(&pipeline.filter);
        builder.select_fields = select;
        builder = match pipeline.group_by {
            Some(_) => builder.group_by(&[GROUP_KEY_COLUMN]),
            None => builder.having("COUNT(*) > 0"),
        };
        if let Some(name) = &pipeline.sort_desc_by {
            builder = builder
                .order_by(&quote_ident(name), "DESC")
                .order_by(GROUP_KEY_COLUMN, "ASC NULLS FIRST");
        }
        if let Some(limit) = pipeline.limit {
            builder.window = Some(PageWindow {
                offset: 0,
                limit: limit as u64,
            });
        }
        builder
    }

    /// Execute the query and return all rows
    pub async fn fetch_all<T>(&self, pool: &PgPool) -> Result<Vec<T>, sqlx::Error>
    where
        T: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Send + Unpin,
    {
        let sql = self.build_sql();
        sqlx::query_as::<_, T>(&sql).fetch_all(pool).await
    }

    /// Execute count query
    pub async fn count(&self, pool: &PgPool) -> Result<i64, sqlx::Error> {
        let sql = self.count_sql();
        let row = sqlx::query(&sql).fetch_one(pool).await?;

        Ok(row.get::<i64, _>(0))
    }
}

fn group_expr(field: TaskField) -> String {
    // Group keys are compared as text on both sides of the store boundary
    match field.kind() {
        FieldKind::Text => field_expr(field),
        _ => format!("document->>'{}'", field.json_key()),
    }
}

fn accumulator_sql(accumulator: &Accumulator) -> String {
    match accumulator {
        Accumulator::Count => "COUNT(*)::double precision".to_string(),
        Accumulator::CountWhere(predicate) => format!(
            "COUNT(*) FILTER (WHERE {})::double precision",
            WhereClause::from_predicate(predicate).to_sql()
        ),
        Accumulator::Sum(field) => format!(
            "COALESCE(SUM({}), 0)::double precision",
            field_expr(*field)
        ),
    }
}

/// Quote an identifier, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Table names are interpolated into SQL, so only plain identifiers pass
pub fn is_valid_table_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.len() <= 63
}
