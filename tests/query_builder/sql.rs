use taskboard::query_builder::{
    list_predicate, Pagination, QueryBuilder, SortSpec, TaskListParams, WhereClause,
};

use crate::common::fixed_now;

#[test]
fn test_list_parameters_render_to_sql() {
    let params = TaskListParams {
        status: Some("pending".to_string()),
        search: Some("50%".to_string()),
        sort_by: Some("dueDate".to_string()),
        sort_order: Some("desc".to_string()),
        page: Some("3".to_string()),
        limit: Some("20".to_string()),
        ..Default::default()
    };
    let predicate = list_predicate(&params, fixed_now());
    let sort = SortSpec::from_params(params.sort_by.as_deref(), params.sort_order.as_deref());
    let page = Pagination::from_params(params.page.as_deref(), params.limit.as_deref(), 10);

    let sql = QueryBuilder::new("tasks")
        .select(&["document"])
        .where_predicate(&predicate)
        .order_by_spec(sort)
        .window(page.window())
        .build_sql();

    assert!(sql.starts_with("SELECT document FROM tasks WHERE "));
    assert!(sql.contains("document->>'status' = 'pending'"));
    assert!(sql.contains("50\\%"));
    assert!(sql.contains("ORDER BY (document->>'dueDate')::timestamptz DESC NULLS LAST"));
    assert!(sql.ends_with(" LIMIT 20 OFFSET 40"));
}

#[test]
fn test_empty_predicate_renders_no_where() {
    let predicate = list_predicate(&TaskListParams::default(), fixed_now());
    assert!(WhereClause::from_predicate(&predicate).conditions.is_empty());

    let sql = QueryBuilder::new("tasks")
        .where_predicate(&predicate)
        .count_sql();
    assert_eq!(sql, "SELECT COUNT(*) FROM tasks");
}

#[test]
fn test_values_are_quoted() {
    let params = TaskListParams {
        assignee: Some("O'Brien".to_string()),
        ..Default::default()
    };
    let sql = QueryBuilder::new("tasks")
        .where_predicate(&list_predicate(&params, fixed_now()))
        .count_sql();
    assert!(sql.contains("'O''Brien'"));
}
