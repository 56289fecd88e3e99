//! Analyzer configuration and boundary validation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RightSizeError;
use crate::models::Tags;

/// The statistic the telemetry collaborator aggregates non-connection
/// metrics with. Connections always use the average (a p99 of connection
/// count would hide long idle stretches).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistic {
    Average,
    Percentile(u8),
}

impl Statistic {
    /// The CloudWatch stat string, e.g. `"Average"` or `"p99"`.
    pub fn to_stat_string(self) -> String {
        match self {
            Statistic::Average => "Average".to_string(),
            Statistic::Percentile(p) => format!("p{}", p),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_stat_string())
    }
}

impl FromStr for Statistic {
    type Err = RightSizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("average") {
            return Ok(Statistic::Average);
        }
        if let Some(rest) = s.strip_prefix(['p', 'P']) {
            if let Ok(p) = rest.parse::<u8>() {
                if p <= 100 {
                    return Ok(Statistic::Percentile(p));
                }
            }
        }
        Err(RightSizeError::InvalidConfig(format!(
            "unknown statistic {:?} (expected Average or p0..p100)",
            s
        )))
    }
}

/// Thresholds and filters for one analysis run.
///
/// The bandwidth check intentionally reuses the CPU threshold pair; there
/// is no separate bandwidth threshold surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Lookback window in days.
    pub period_days: i32,
    /// Instances must match every entry to be analyzed at all.
    pub required_tags: Tags,
    /// CPU % above which an instance is under-provisioned.
    pub cpu_upsize_threshold: f64,
    /// CPU % below which an instance is over-provisioned.
    pub cpu_downsize_threshold: f64,
    /// Freeable-memory % below which an instance is under-provisioned.
    pub mem_upsize_threshold: f64,
    /// Statistic for CPU, memory and throughput metrics.
    pub statistic: Statistic,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            period_days: 30,
            required_tags: Tags::new(),
            cpu_upsize_threshold: 75.0,
            cpu_downsize_threshold: 30.0,
            mem_upsize_threshold: 5.0,
            statistic: Statistic::Percentile(99),
        }
    }
}

impl AnalyzerConfig {
    /// Validate before the engine runs. An inverted CPU threshold pair
    /// would make the "optimized" zone empty and flag every instance, so
    /// it is rejected here rather than silently reordered.
    pub fn validate(&self) -> Result<(), RightSizeError> {
        if self.period_days <= 0 {
            return Err(RightSizeError::InvalidConfig(format!(
                "lookback period must be positive, got {}",
                self.period_days
            )));
        }
        for (name, value) in [
            ("cpu-upsize", self.cpu_upsize_threshold),
            ("cpu-downsize", self.cpu_downsize_threshold),
            ("mem-upsize", self.mem_upsize_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(RightSizeError::InvalidConfig(format!(
                    "{} threshold must be within 0..=100, got {}",
                    name, value
                )));
            }
        }
        if self.cpu_downsize_threshold > self.cpu_upsize_threshold {
            return Err(RightSizeError::InvalidConfig(format!(
                "cpu-downsize threshold ({}) must not exceed cpu-upsize threshold ({})",
                self.cpu_downsize_threshold, self.cpu_upsize_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_statistics() {
        assert_eq!("Average".parse::<Statistic>().unwrap(), Statistic::Average);
        assert_eq!("p99".parse::<Statistic>().unwrap(), Statistic::Percentile(99));
        assert_eq!("P50".parse::<Statistic>().unwrap(), Statistic::Percentile(50));
        assert!("p101".parse::<Statistic>().is_err());
        assert!("median".parse::<Statistic>().is_err());
    }

    #[test]
    fn default_config_is_valid() {
        assert!(AnalyzerConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_cpu_thresholds() {
        let config = AnalyzerConfig {
            cpu_upsize_threshold: 30.0,
            cpu_downsize_threshold: 75.0,
            ..AnalyzerConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("cpu-downsize"));
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        let config = AnalyzerConfig {
            mem_upsize_threshold: 120.0,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_positive_period() {
        let config = AnalyzerConfig {
            period_days: 0,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
