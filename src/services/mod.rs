//! # Services
//!
//! Orchestration between the HTTP layer and the [`TaskStore`](crate::database::TaskStore):
//!
//! - [`task_query_service`] - list, advanced search and export
//! - [`statistics`] - overview counts and breakdowns
//! - [`task_service`] - single and bulk mutations, comments, attachments, templates
//! - [`csv_export`] - flat CSV rendering of exported tasks
//!
//! Every service reads "now" from an injected [`Clock`](crate::utils::Clock).

pub mod csv_export;
pub mod statistics;
pub mod task_query_service;
pub mod task_service;

use serde_json::Value;

use crate::error::Result;
use crate::models::TaskView;

pub use csv_export::{to_csv, CSV_COLUMNS};
pub use statistics::{BreakdownEntry, OverviewStats, StatisticsAggregator, TaskStatistics};
pub use task_query_service::{ExportFormat, ExportOutput, TaskPage, TaskQueryService};
pub use task_service::{
    BulkCreateOutcome, BulkFailure, BulkUpdateOutcome, TaskService, SYSTEM_ACTOR,
};

/// Keys left out of exported tasks
pub const EXPORT_OMITTED: &[&str] = &["history"];
/// Keys left out of template listings
pub const TEMPLATE_OMITTED: &[&str] = &["history", "comments", "attachments"];

/// Serialize a view without the given top-level keys
pub fn project(view: &TaskView, omit: &[&str]) -> Result<Value> {
    let mut value = serde_json::to_value(view)?;
    if let Value::Object(fields) = &mut value {
        for key in omit {
            fields.remove(*key);
        }
    }
    Ok(value)
}
