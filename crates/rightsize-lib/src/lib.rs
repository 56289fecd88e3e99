//! Right-sizing decision engine for managed database instances
//!
//! This crate provides the core functionality for:
//! - Instance-type catalog loading and traversal
//! - Utilization classification (CPU, memory, bandwidth, activity)
//! - Scaling-target resolution with a burstable-family fallback
//! - The recommendation rule engine and cost-delta estimation
//!
//! Everything here is pure and synchronous. Fetching inventories, metrics
//! and the catalog document, and persisting the output, belongs to the
//! caller.

pub mod catalog;
pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod resolver;

pub use catalog::{CatalogIssue, InstanceCatalog, InstanceProperties};
pub use config::{AnalyzerConfig, Statistic};
pub use engine::{total_monthly_price_diff, Engine, HOURS_PER_MONTH};
pub use error::RightSizeError;
pub use models::*;
