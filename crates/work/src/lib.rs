//! Work Management
//!
//! Task lifecycle on top of a [`tasklens_storage::Storage`] backend, on-demand
//! analysis through the insight engine, and the background batch analyzer.

#![warn(missing_docs)]

pub mod error;
pub mod manager;
pub mod batch;

pub use error::{WorkError, Result};
pub use manager::{BasicTaskManager, HealthReport, TaskManager, TaskReport, SAMPLE_TASKS};
pub use batch::{BatchAnalyzer, BatchConfig, ServiceStatus};
