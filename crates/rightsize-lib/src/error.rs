//! Error types for the right-sizing engine

use thiserror::Error;

use crate::models::MetricName;

/// Run-level failures. Everything here aborts the whole run; per-instance
/// conditions like an unsupported type or a missing catalog neighbor are
/// not errors and simply suppress the recommendation.
#[derive(Debug, Error)]
pub enum RightSizeError {
    /// The instance-type catalog document could not be parsed.
    #[error("failed to parse instance type catalog: {0}")]
    CatalogParse(#[from] serde_json::Error),

    /// A required metric was not returned by the telemetry backend.
    #[error("no {metric} metric found for instance {instance}")]
    MissingMetric {
        instance: String,
        metric: MetricName,
    },

    /// Caller-supplied configuration failed boundary validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
