#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Taskboard
//!
//! A task management REST API whose core is typed query construction:
//! filter predicates, sorting, pagination and grouped statistics over a
//! collection of task documents.
//!
//! ## Module Organization
//!
//! - [`models`] - The task document, embedded records and request payloads
//! - [`query_builder`] - Predicates, sort keys, page windows and aggregation pipelines
//! - [`database`] - The [`database::TaskStore`] seam with in-memory and PostgreSQL backends
//! - [`validation`] - Field-level validation of bodies and query strings
//! - [`services`] - Task mutations, list/search/export and statistics
//! - [`web`] - Axum routes, handlers and response envelopes
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use taskboard::config::TaskboardConfig;
//! use taskboard::database::MemoryTaskStore;
//! use taskboard::web::{create_app, AppState};
//!
//! let config = TaskboardConfig::default();
//! let state = AppState::with_system_clock(Arc::new(MemoryTaskStore::new()), &config);
//! let _app = create_app(Arc::new(state), config.server.request_timeout());
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # Unit and HTTP-level integration tests
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod query_builder;
pub mod services;
pub mod utils;
pub mod validation;
pub mod web;

pub use config::{ConfigManager, TaskboardConfig};
pub use database::{open_store, MemoryTaskStore, PgTaskStore, TaskStore};
pub use error::{FieldError, Result, TaskboardError};
pub use models::{Task, TaskPriority, TaskStatus, TaskView};
pub use services::{StatisticsAggregator, TaskQueryService, TaskService};
