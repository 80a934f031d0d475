//! Task Query Service.
//!
//! List, advanced search and export over the store. Parameters arrive already
//! validated; this layer turns them into a predicate, a sort key and a page
//! window, then packages the results.

use std::sync::Arc;

use futures::try_join;
use serde_json::Value;
use tracing::debug;

use super::{csv_export, project, EXPORT_OMITTED};
use crate::config::PaginationConfig;
use crate::database::TaskStore;
use crate::error::Result;
use crate::models::TaskView;
use crate::query_builder::scopes::present;
use crate::query_builder::{
    advanced_search_predicate, export_predicate, list_predicate, AdvancedSearchParams,
    ExportParams, Pagination, PaginationInfo, SortDirection, SortField, SortSpec, TaskListParams,
};
use crate::utils::Clock;

/// One page of a task list
#[derive(Debug, Clone, PartialEq)]
pub struct TaskPage {
    pub pagination: PaginationInfo,
    pub data: Vec<TaskView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    /// `"csv"` selects CSV; anything else, including nothing, is JSON
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("csv") => ExportFormat::Csv,
            _ => ExportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutput {
    /// Task documents without their history
    Json(Vec<Value>),
    Csv(String),
}

#[derive(Debug, Clone)]
pub struct TaskQueryService {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    pagination: PaginationConfig,
}

impl TaskQueryService {
    pub fn new(
        store: Arc<dyn TaskStore>,
        clock: Arc<dyn Clock>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            store,
            clock,
            pagination,
        }
    }

    /// Filtered, sorted page of tasks plus the pagination summary.
    ///
    /// The page and the total count are read concurrently with the same
    /// predicate. A page past the end comes back empty, not as an error.
    pub async fn list(&self, params: &TaskListParams) -> Result<TaskPage> {
        let now = self.clock.now();
        let predicate = list_predicate(params, now);
        let sort = SortSpec::from_params(present(&params.sort_by), present(&params.sort_order));
        let page = Pagination::from_params(
            present(&params.page),
            present(&params.limit),
            self.pagination.default_limit,
        );
        debug!(
            clauses = predicate.clauses().len(),
            page = page.page,
            limit = page.limit,
            sort = sort.field.as_str(),
            "Listing tasks"
        );

        let (tasks, total) = try_join!(
            self.store.find(&predicate, sort, Some(page.window())),
            self.store.count(&predicate),
        )?;

        Ok(TaskPage {
            pagination: page.summarize(total),
            data: tasks.into_iter().map(|t| TaskView::new(t, now)).collect(),
        })
    }

    /// Every task matching the advanced search inputs, newest first
    pub async fn search(&self, params: &AdvancedSearchParams) -> Result<Vec<TaskView>> {
        let now = self.clock.now();
        let predicate = advanced_search_predicate(params);
        let sort = SortSpec::new(SortField::CreatedAt, SortDirection::Desc);
        let tasks = self.store.find(&predicate, sort, None).await?;
        Ok(tasks.into_iter().map(|t| TaskView::new(t, now)).collect())
    }

    /// The whole filtered collection, unpaginated
    pub async fn export(&self, params: &ExportParams) -> Result<ExportOutput> {
        let now = self.clock.now();
        let predicate = export_predicate(params);
        let sort = SortSpec::new(SortField::CreatedAt, SortDirection::Asc);
        let tasks = self.store.find(&predicate, sort, None).await?;
        debug!(count = tasks.len(), "Exporting tasks");

        match ExportFormat::from_param(present(&params.format)) {
            ExportFormat::Csv => Ok(ExportOutput::Csv(csv_export::to_csv(&tasks))),
            ExportFormat::Json => tasks
                .into_iter()
                .map(|t| project(&TaskView::new(t, now), EXPORT_OMITTED))
                .collect::<Result<Vec<_>>>()
                .map(ExportOutput::Json),
        }
    }
}
