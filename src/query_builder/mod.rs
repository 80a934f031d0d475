//! # Query Builder System
//!
//! Typed construction of task queries, evaluated in memory or rendered to
//! PostgreSQL.
//!
//! ## Key Components
//!
//! - [`predicate`] - Field addressing and the AND-of-clauses [`Predicate`]
//! - [`scopes`] - Predicates built from list, search and export parameters
//! - [`sort`] - Single-key [`SortSpec`]
//! - [`pagination`] - Page/limit windows and the [`PaginationInfo`] summary
//! - [`aggregation`] - Filter, group and accumulate pipelines
//! - [`conditions`] - Predicate to `WHERE` rendering over the JSONB document
//! - [`builder`] - SQL assembly for find, count and aggregate queries
//!
//! ## Example Usage
//!
//! ```rust
//! use taskboard::query_builder::{list_predicate, Pagination, SortSpec, TaskListParams};
//! use chrono::Utc;
//!
//! let params = TaskListParams {
//!     status: Some("pending".to_string()),
//!     ..Default::default()
//! };
//! let predicate = list_predicate(&params, Utc::now());
//! let sort = SortSpec::from_params(params.sort_by.as_deref(), params.sort_order.as_deref());
//! let page = Pagination::default();
//! assert_eq!(predicate.clauses().len(), 1);
//! assert_eq!(page.skip(), 0);
//! # let _ = sort;
//! ```

pub mod aggregation;
pub mod builder;
pub mod conditions;
pub mod pagination;
pub mod predicate;
pub mod scopes;
pub mod sort;

pub use aggregation::{Accumulator, AggregationPipeline, GroupResult};
pub use builder::QueryBuilder;
pub use conditions::{Condition, WhereClause};
pub use pagination::{PageWindow, Pagination, PaginationInfo};
pub use predicate::{Clause, Comparison, FieldKind, FieldValue, Predicate, TaskField};
pub use scopes::{
    advanced_search_predicate, export_predicate, list_predicate, AdvancedSearchParams,
    ExportParams, TaskListParams, TaskScope, SEARCH_FIELDS,
};
pub use sort::{SortDirection, SortField, SortSpec};
