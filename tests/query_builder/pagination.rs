use taskboard::query_builder::Pagination;

#[test]
fn test_twenty_five_items_by_ten() {
    let first = Pagination::new(1, 10).summarize(25);
    assert_eq!(first.total_pages, 3);
    assert!(first.has_next_page);
    assert!(!first.has_prev_page);

    let last = Pagination::new(3, 10).summarize(25);
    assert_eq!(last.current_page, 3);
    assert!(!last.has_next_page);
    assert!(last.has_prev_page);
}

#[test]
fn test_empty_collection() {
    let info = Pagination::new(1, 10).summarize(0);
    assert_eq!(info.total_pages, 0);
    assert_eq!(info.total_items, 0);
    assert!(!info.has_next_page);
    assert!(!info.has_prev_page);
}

#[test]
fn test_page_beyond_last_is_not_an_error() {
    let pagination = Pagination::new(9, 10);
    assert_eq!(pagination.skip(), 80);

    let info = pagination.summarize(25);
    assert_eq!(info.total_pages, 3);
    assert!(!info.has_next_page);
    assert!(info.has_prev_page);
}

#[test]
fn test_raw_parameters() {
    let pagination = Pagination::from_params(Some("2"), Some("25"), 10);
    assert_eq!(pagination.page, 2);
    assert_eq!(pagination.limit, 25);
    assert_eq!(pagination.skip(), 25);

    let fallback = Pagination::from_params(Some("abc"), None, 10);
    assert_eq!(fallback, Pagination::new(1, 10));
}

#[test]
fn test_summary_serializes_camel_case() {
    let info = Pagination::new(2, 5).summarize(11);
    assert_eq!(
        serde_json::to_value(info).unwrap(),
        serde_json::json!({
            "currentPage": 2,
            "totalPages": 3,
            "totalItems": 11,
            "hasNextPage": true,
            "hasPrevPage": true,
        })
    );
}
