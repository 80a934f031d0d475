//! Aggregation pipelines over the task collection.
//!
//! A pipeline is: filter → group (by one field, or everything into a single
//! group) → accumulate → optionally sort groups descending by one
//! accumulator → optionally keep the first N groups.
//!
//! [`AggregationPipeline::evaluate`] runs a pipeline in one pass with running
//! accumulators keyed by group; the PostgreSQL store renders the same
//! pipeline to `GROUP BY` SQL instead.

use std::collections::BTreeMap;

use serde::Serialize;

use super::predicate::{FieldValue, Predicate, TaskField};
use crate::models::Task;

/// How one output value of a group is computed
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulator {
    /// Number of tasks in the group
    Count,
    /// Number of tasks in the group matching the predicate
    CountWhere(Predicate),
    /// Sum of a numeric field, unset values counting as zero
    Sum(TaskField),
}

impl Accumulator {
    fn contribution(&self, task: &Task) -> f64 {
        match self {
            Accumulator::Count => 1.0,
            Accumulator::CountWhere(predicate) => {
                if predicate.matches(task) {
                    1.0
                } else {
                    0.0
                }
            }
            Accumulator::Sum(field) => match field.value_of(task) {
                Some(FieldValue::Number(n)) => n,
                _ => 0.0,
            },
        }
    }
}

/// One output row of a pipeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupResult {
    /// Group key; `None` for the single whole-collection group or tasks
    /// where the grouping field is unset
    pub key: Option<String>,
    pub values: BTreeMap<String, f64>,
}

impl GroupResult {
    /// Named accumulator value, zero when absent
    pub fn value(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    pub fn count(&self, name: &str) -> u64 {
        // Counts are whole numbers stored as f64
        self.value(name).max(0.0).round() as u64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationPipeline {
    pub filter: Predicate,
    pub group_by: Option<TaskField>,
    pub accumulators: Vec<(String, Accumulator)>,
    /// Accumulator name to sort groups by, descending
    pub sort_desc_by: Option<String>,
    pub limit: Option<usize>,
}

impl AggregationPipeline {
    /// Whole collection in one group
    pub fn overall() -> Self {
        Self {
            filter: Predicate::match_all(),
            group_by: None,
            accumulators: Vec::new(),
            sort_desc_by: None,
            limit: None,
        }
    }

    pub fn grouped_by(field: TaskField) -> Self {
        Self {
            group_by: Some(field),
            ..Self::overall()
        }
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = predicate;
        self
    }

    pub fn accumulate(mut self, name: impl Into<String>, accumulator: Accumulator) -> Self {
        self.accumulators.push((name.into(), accumulator));
        self
    }

    pub fn sort_desc_by(mut self, name: impl Into<String>) -> Self {
        self.sort_desc_by = Some(name.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the pipeline over `tasks` in a single pass.
    ///
    /// An empty input yields no groups. Groups come out in key order unless a
    /// sort is requested; the sort is stable, so equal counts keep key order.
    pub fn evaluate<'a>(&self, tasks: impl IntoIterator<Item = &'a Task>) -> Vec<GroupResult> {
        let mut groups: BTreeMap<Option<String>, Vec<f64>> = BTreeMap::new();

        for task in tasks.into_iter().filter(|t| self.filter.matches(t)) {
            let key = self
                .group_by
                .and_then(|field| field.value_of(task))
                .map(|value| value.render());
            let totals = groups
                .entry(key)
                .or_insert_with(|| vec![0.0; self.accumulators.len()]);
            for (total, (_, accumulator)) in totals.iter_mut().zip(&self.accumulators) {
                *total += accumulator.contribution(task);
            }
        }

        let mut results: Vec<GroupResult> = groups
            .into_iter()
            .map(|(key, totals)| GroupResult {
                key,
                values: self
                    .accumulators
                    .iter()
                    .map(|(name, _)| name.clone())
                    .zip(totals)
                    .collect(),
            })
            .collect();

        if let Some(name) = &self.sort_desc_by {
            results.sort_by(|a, b| b.value(name).total_cmp(&a.value(name)));
        }
        if let Some(limit) = self.limit {
            results.truncate(limit);
        }
        results
    }
}
