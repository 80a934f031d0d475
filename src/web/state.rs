//! # Web Application State
//!
//! Shared services handed to every handler. Services hold `Arc`s to the
//! store and the clock, so the state itself is cheap to share behind an `Arc`.

use std::sync::Arc;

use crate::config::{PaginationConfig, TaskboardConfig};
use crate::database::TaskStore;
use crate::services::{StatisticsAggregator, TaskQueryService, TaskService};
use crate::utils::{Clock, SystemClock};

#[derive(Debug, Clone)]
pub struct AppState {
    pub pagination: PaginationConfig,
    store: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    tasks: TaskService,
    queries: TaskQueryService,
    statistics: StatisticsAggregator,
}

impl AppState {
    pub fn new(store: Arc<dyn TaskStore>, clock: Arc<dyn Clock>, config: &TaskboardConfig) -> Self {
        Self {
            pagination: config.pagination.clone(),
            tasks: TaskService::new(store.clone(), clock.clone()),
            queries: TaskQueryService::new(
                store.clone(),
                clock.clone(),
                config.pagination.clone(),
            ),
            statistics: StatisticsAggregator::new(store.clone(), clock.clone()),
            store,
            clock,
        }
    }

    /// State reading real time
    pub fn with_system_clock(store: Arc<dyn TaskStore>, config: &TaskboardConfig) -> Self {
        Self::new(store, Arc::new(SystemClock), config)
    }

    pub fn tasks(&self) -> &TaskService {
        &self.tasks
    }

    pub fn queries(&self) -> &TaskQueryService {
        &self.queries
    }

    pub fn statistics(&self) -> &StatisticsAggregator {
        &self.statistics
    }

    pub fn store(&self) -> &Arc<dyn TaskStore> {
        &self.store
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
