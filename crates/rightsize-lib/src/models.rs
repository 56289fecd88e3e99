//! Core data models for the right-sizing engine

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Instance tags, keyed by tag name. Ordered so serialized output is stable.
pub type Tags = BTreeMap<String, String>;

/// A managed database instance as reported by the inventory collaborator.
///
/// Everything except the identifier and class is opaque pass-through that
/// ends up verbatim in the recommendation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "AvailabilityZone")]
    pub availability_zone: Option<String>,
    #[serde(rename = "DBInstanceArn")]
    pub db_instance_arn: Option<String>,
    #[serde(rename = "DBInstanceIdentifier")]
    pub db_instance_identifier: String,
    #[serde(rename = "DBInstanceClass")]
    pub db_instance_class: String,
    #[serde(rename = "Engine")]
    pub engine: Option<String>,
    #[serde(rename = "EngineVersion")]
    pub engine_version: Option<String>,
    #[serde(rename = "Tags")]
    pub tags: Tags,
}

/// The five telemetry signals the engine consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricName {
    CpuUtilization,
    DatabaseConnections,
    FreeableMemory,
    ReadThroughput,
    WriteThroughput,
}

impl MetricName {
    /// The CloudWatch metric name for this signal.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::CpuUtilization => "CPUUtilization",
            MetricName::DatabaseConnections => "DatabaseConnections",
            MetricName::FreeableMemory => "FreeableMemory",
            MetricName::ReadThroughput => "ReadThroughput",
            MetricName::WriteThroughput => "WriteThroughput",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One aggregated statistic for one signal over the lookback window.
///
/// `value: None` means the telemetry backend returned the series but no
/// data points; a missing map entry in [`InstanceMetrics`] means the series
/// was not returned at all. Both are reportable conditions, never zero.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Metric {
    pub value: Option<f64>,
}

/// All metrics fetched for one instance in one batch.
#[derive(Debug, Clone)]
pub struct InstanceMetrics {
    pub db_instance_identifier: String,
    metrics: HashMap<MetricName, Metric>,
}

impl InstanceMetrics {
    pub fn new(db_instance_identifier: impl Into<String>) -> Self {
        Self {
            db_instance_identifier: db_instance_identifier.into(),
            metrics: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: MetricName, value: Option<f64>) {
        self.metrics.insert(name, Metric { value });
    }

    pub fn get(&self, name: MetricName) -> Option<&Metric> {
        self.metrics.get(&name)
    }
}

/// What the engine suggests doing with an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    UpScale,
    DownScale,
    Terminate,
}

/// Why the engine suggests it. Fixed vocabulary; serialized verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reason {
    #[serde(rename = "No usage within period")]
    NoUsageWithinPeriod,
    #[serde(rename = "Memory is under provisioned")]
    MemoryUnderProvisioned,
    #[serde(rename = "CPU is under provisioned")]
    CpuUnderProvisioned,
    #[serde(rename = "CPU is over provisioned")]
    CpuOverProvisioned,
}

/// The engine's output record, one per flagged instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub instance: Instance,
    #[serde(rename = "Recommendation")]
    pub action: Action,
    #[serde(rename = "Reason")]
    pub reason: Reason,
    #[serde(rename = "RecommendedInstanceType")]
    pub recommended_instance_type: Option<String>,
    #[serde(rename = "MetricValue")]
    pub metric_value: Option<f64>,
    #[serde(rename = "MonthlyApproximatePriceDiff")]
    pub monthly_approximate_price_diff: Option<f64>,
}
