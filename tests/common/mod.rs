//! Shared fixtures for integration tests

#![allow(dead_code)]

pub mod strategies;

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use taskboard::config::TaskboardConfig;
use taskboard::database::{MemoryTaskStore, TaskStore};
use taskboard::models::Task;
use taskboard::utils::FixedClock;
use taskboard::web::AppState;

/// The instant every fixture treats as "now"
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 15, 0, 0).unwrap()
}

/// Store, clock and app state wired together
pub struct TestContext {
    pub store: Arc<MemoryTaskStore>,
    pub clock: Arc<FixedClock>,
    pub state: Arc<AppState>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::seeded(Vec::new())
    }

    pub fn seeded(tasks: Vec<Task>) -> Self {
        let store = Arc::new(MemoryTaskStore::with_tasks(tasks));
        let clock = Arc::new(FixedClock::new(fixed_now()));
        let state = Arc::new(AppState::new(
            store.clone() as Arc<dyn TaskStore>,
            clock.clone(),
            &TaskboardConfig::default(),
        ));
        Self {
            store,
            clock,
            state,
        }
    }
}
