//! Statistics Aggregator.
//!
//! Four independent pipelines: an overall summary and breakdowns by
//! priority, category and project. They run concurrently against the store and
//! are not read from a shared snapshot, so under concurrent writes the four
//! results are each correct but need not agree with one another.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::try_join;
use serde::Serialize;
use tracing::debug;

use crate::database::TaskStore;
use crate::error::Result;
use crate::models::TaskStatus;
use crate::query_builder::{
    Accumulator, AggregationPipeline, Clause, Comparison, FieldValue, GroupResult, Predicate,
    TaskField,
};
use crate::utils::Clock;

/// Breakdowns by category and project keep this many groups
pub const TOP_GROUPS: usize = 10;

const COUNT: &str = "count";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub pending_tasks: u64,
    pub in_progress_tasks: u64,
    pub overdue_tasks: u64,
    pub total_estimated_hours: f64,
    pub total_actual_hours: f64,
}

impl OverviewStats {
    fn from_group(group: &GroupResult) -> Self {
        Self {
            total_tasks: group.count("totalTasks"),
            completed_tasks: group.count("completedTasks"),
            pending_tasks: group.count("pendingTasks"),
            in_progress_tasks: group.count("inProgressTasks"),
            overdue_tasks: group.count("overdueTasks"),
            total_estimated_hours: group.value("totalEstimatedHours"),
            total_actual_hours: group.value("totalActualHours"),
        }
    }
}

/// One group of a breakdown, keyed by the field value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakdownEntry {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub count: u64,
}

impl From<&GroupResult> for BreakdownEntry {
    fn from(group: &GroupResult) -> Self {
        Self {
            id: group.key.clone(),
            count: group.count(COUNT),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatistics {
    pub overview: OverviewStats,
    pub priority_breakdown: Vec<BreakdownEntry>,
    pub category_breakdown: Vec<BreakdownEntry>,
    pub project_breakdown: Vec<BreakdownEntry>,
}

fn count_where(clauses: Vec<Clause>) -> Accumulator {
    Accumulator::CountWhere(clauses.into_iter().fold(Predicate::match_all(), Predicate::and))
}

/// Overall summary of the collection.
///
/// `overdueTasks` counts tasks whose due date is still in the future
/// (`dueDate > now`), not tasks past due. The list filter uses `dueDate < now`.
/// Both definitions are kept as they are.
pub fn overview_pipeline(now: DateTime<Utc>) -> AggregationPipeline {
    AggregationPipeline::overall()
        .accumulate("totalTasks", Accumulator::Count)
        .accumulate(
            "completedTasks",
            count_where(vec![Clause::Equals {
                field: TaskField::IsCompleted,
                value: FieldValue::Bool(true),
            }]),
        )
        .accumulate(
            "pendingTasks",
            count_where(vec![Clause::Equals {
                field: TaskField::Status,
                value: FieldValue::text(TaskStatus::Pending.as_str()),
            }]),
        )
        .accumulate(
            "inProgressTasks",
            count_where(vec![Clause::Equals {
                field: TaskField::Status,
                value: FieldValue::text(TaskStatus::InProgress.as_str()),
            }]),
        )
        .accumulate(
            "overdueTasks",
            count_where(vec![
                Clause::Exists {
                    field: TaskField::DueDate,
                },
                Clause::Compare {
                    field: TaskField::DueDate,
                    op: Comparison::Gt,
                    value: FieldValue::Time(now),
                },
                Clause::NotEquals {
                    field: TaskField::IsCompleted,
                    value: FieldValue::Bool(true),
                },
            ]),
        )
        .accumulate(
            "totalEstimatedHours",
            Accumulator::Sum(TaskField::EstimatedHours),
        )
        .accumulate("totalActualHours", Accumulator::Sum(TaskField::ActualHours))
}

/// Count per distinct priority
pub fn priority_pipeline() -> AggregationPipeline {
    AggregationPipeline::grouped_by(TaskField::Priority).accumulate(COUNT, Accumulator::Count)
}

/// Top groups of a text field, tasks without a value excluded
pub fn top_groups_pipeline(field: TaskField) -> AggregationPipeline {
    AggregationPipeline::grouped_by(field)
        .filter(Predicate::match_all().and(Clause::Exists { field }))
        .accumulate(COUNT, Accumulator::Count)
        .sort_desc_by(COUNT)
        .limit(TOP_GROUPS)
}

#[derive(Debug, Clone)]
pub struct StatisticsAggregator {
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
}

impl StatisticsAggregator {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Run all four pipelines. Any failure fails the whole computation.
    pub async fn compute(&self) -> Result<TaskStatistics> {
        let overview = overview_pipeline(self.clock.now());
        let priority = priority_pipeline();
        let category = top_groups_pipeline(TaskField::Category);
        let project = top_groups_pipeline(TaskField::Project);

        let (overview, priority, category, project) = try_join!(
            self.store.aggregate(&overview),
            self.store.aggregate(&priority),
            self.store.aggregate(&category),
            self.store.aggregate(&project),
        )?;
        debug!(
            priority_groups = priority.len(),
            category_groups = category.len(),
            project_groups = project.len(),
            "Computed task statistics"
        );

        Ok(TaskStatistics {
            overview: overview
                .first()
                .map(OverviewStats::from_group)
                .unwrap_or_default(),
            priority_breakdown: priority.iter().map(BreakdownEntry::from).collect(),
            category_breakdown: category.iter().map(BreakdownEntry::from).collect(),
            project_breakdown: project.iter().map(BreakdownEntry::from).collect(),
        })
    }
}
