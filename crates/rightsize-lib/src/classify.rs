//! Utilization classifiers
//!
//! Pure functions turning raw metric values plus thresholds into
//! categorical postures. Missing metrics are reportable errors, never
//! silent defaults.

use serde::{Deserialize, Serialize};

use crate::error::RightSizeError;
use crate::models::{InstanceMetrics, MetricName};

/// Bytes per Mbit, matching the unit the catalog publishes bandwidth in.
pub const BYTES_PER_MBIT: f64 = 131072.0;

const BYTES_PER_GIB: f64 = (1u64 << 30) as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuStatus {
    UnderProvisioned,
    Optimized,
    OverProvisioned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandwidthStatus {
    UnderProvisioned,
    Optimized,
    OverProvisioned,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CpuUtilization {
    /// CPU % over the window.
    pub value: f64,
    pub status: CpuStatus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandwidthUtilization {
    /// Percent of the type's max bandwidth; unset when the max is unknown.
    pub value: Option<f64>,
    /// Raw read + write throughput in bytes/s.
    pub total: f64,
    pub status: BandwidthStatus,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryUtilization {
    /// Freeable memory as a percent of the type's memory size.
    pub percent_free: f64,
    pub under_provisioned: bool,
}

fn required_value(
    metrics: &InstanceMetrics,
    name: MetricName,
) -> Result<f64, RightSizeError> {
    metrics
        .get(name)
        .and_then(|m| m.value)
        .ok_or_else(|| RightSizeError::MissingMetric {
            instance: metrics.db_instance_identifier.clone(),
            metric: name,
        })
}

/// True when the connection count is absent or exactly zero. Evaluated
/// before every other classifier; a true result short-circuits the whole
/// evaluation into a terminate recommendation.
pub fn had_no_activity(metrics: &InstanceMetrics) -> Result<bool, RightSizeError> {
    let metric = metrics.get(MetricName::DatabaseConnections).ok_or_else(|| {
        RightSizeError::MissingMetric {
            instance: metrics.db_instance_identifier.clone(),
            metric: MetricName::DatabaseConnections,
        }
    })?;

    Ok(match metric.value {
        None => true,
        Some(v) => v == 0.0,
    })
}

/// Freeable memory as a percent of capacity, flagged under-provisioned
/// below the threshold. Takes priority over the CPU and bandwidth checks.
pub fn memory_posture(
    metrics: &InstanceMetrics,
    mem_gib: i64,
    mem_upsize_threshold: f64,
) -> Result<MemoryUtilization, RightSizeError> {
    let freeable_bytes = required_value(metrics, MetricName::FreeableMemory)?;
    let percent_free = (freeable_bytes / BYTES_PER_GIB) * 100.0 / mem_gib as f64;

    Ok(MemoryUtilization {
        percent_free,
        under_provisioned: percent_free < mem_upsize_threshold,
    })
}

/// CPU % against the caller's threshold pair. Strictly above the upsize
/// threshold is under-provisioned, strictly below the downsize threshold
/// is over-provisioned, the closed band between is optimized.
pub fn cpu_posture(
    metrics: &InstanceMetrics,
    cpu_upsize_threshold: f64,
    cpu_downsize_threshold: f64,
) -> Result<CpuUtilization, RightSizeError> {
    let value = required_value(metrics, MetricName::CpuUtilization)?;

    let status = if value > cpu_upsize_threshold {
        CpuStatus::UnderProvisioned
    } else if value >= cpu_downsize_threshold {
        CpuStatus::Optimized
    } else {
        CpuStatus::OverProvisioned
    };

    Ok(CpuUtilization { value, status })
}

/// Read + write throughput against the type's max bandwidth, statused with
/// the same threshold pair as CPU (single-threshold-pair design). With no
/// known max the posture is forced optimized so it never blocks a
/// downscale.
pub fn bandwidth_posture(
    metrics: &InstanceMetrics,
    max_bandwidth: Option<i64>,
    cpu_upsize_threshold: f64,
    cpu_downsize_threshold: f64,
) -> Result<BandwidthUtilization, RightSizeError> {
    let read = required_value(metrics, MetricName::ReadThroughput)?;
    let write = required_value(metrics, MetricName::WriteThroughput)?;
    let total = read + write;

    let Some(max_bandwidth) = max_bandwidth else {
        return Ok(BandwidthUtilization {
            value: None,
            total,
            status: BandwidthStatus::Optimized,
        });
    };

    let percent = total / (max_bandwidth as f64 * BYTES_PER_MBIT) * 100.0;
    let status = if percent > cpu_upsize_threshold {
        BandwidthStatus::UnderProvisioned
    } else if percent >= cpu_downsize_threshold {
        BandwidthStatus::Optimized
    } else {
        BandwidthStatus::OverProvisioned
    };

    Ok(BandwidthUtilization {
        value: Some(percent),
        total,
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics_with(entries: &[(MetricName, Option<f64>)]) -> InstanceMetrics {
        let mut metrics = InstanceMetrics::new("db1");
        for (name, value) in entries {
            metrics.insert(*name, *value);
        }
        metrics
    }

    #[test]
    fn no_activity_when_connections_zero_or_absent_value() {
        let zero = metrics_with(&[(MetricName::DatabaseConnections, Some(0.0))]);
        assert!(had_no_activity(&zero).unwrap());

        let absent = metrics_with(&[(MetricName::DatabaseConnections, None)]);
        assert!(had_no_activity(&absent).unwrap());

        let busy = metrics_with(&[(MetricName::DatabaseConnections, Some(5.0))]);
        assert!(!had_no_activity(&busy).unwrap());
    }

    #[test]
    fn missing_connections_metric_is_an_error() {
        let metrics = metrics_with(&[]);
        let err = had_no_activity(&metrics).unwrap_err();
        assert!(matches!(
            err,
            RightSizeError::MissingMetric {
                metric: MetricName::DatabaseConnections,
                ..
            }
        ));
    }

    #[test]
    fn memory_percent_free_is_relative_to_capacity() {
        // 6.4 GiB freeable on a 16 GiB type = 40% free
        let metrics = metrics_with(&[(
            MetricName::FreeableMemory,
            Some(6.4 * BYTES_PER_GIB),
        )]);

        let posture = memory_posture(&metrics, 16, 10.0).unwrap();
        assert!((posture.percent_free - 40.0).abs() < 1e-9);
        assert!(!posture.under_provisioned);

        let posture = memory_posture(&metrics, 16, 45.0).unwrap();
        assert!(posture.under_provisioned);
    }

    #[test]
    fn memory_with_null_value_is_an_error() {
        let metrics = metrics_with(&[(MetricName::FreeableMemory, None)]);
        assert!(memory_posture(&metrics, 16, 10.0).is_err());
    }

    #[test]
    fn cpu_threshold_zones() {
        let cases = [
            (80.0, CpuStatus::UnderProvisioned),
            (75.0, CpuStatus::Optimized),
            (30.0, CpuStatus::Optimized),
            (29.9, CpuStatus::OverProvisioned),
        ];
        for (value, expected) in cases {
            let metrics = metrics_with(&[(MetricName::CpuUtilization, Some(value))]);
            let posture = cpu_posture(&metrics, 75.0, 30.0).unwrap();
            assert_eq!(posture.status, expected, "cpu {}", value);
        }
    }

    #[test]
    fn bandwidth_uses_cpu_thresholds_against_max() {
        // 4000 Mbit max; 80% of it in bytes/s
        let total = 4000.0 * BYTES_PER_MBIT * 0.8;
        let metrics = metrics_with(&[
            (MetricName::ReadThroughput, Some(total / 2.0)),
            (MetricName::WriteThroughput, Some(total / 2.0)),
        ]);

        let posture = bandwidth_posture(&metrics, Some(4000), 75.0, 30.0).unwrap();
        assert_eq!(posture.status, BandwidthStatus::UnderProvisioned);
        assert!((posture.value.unwrap() - 80.0).abs() < 1e-9);
        assert!((posture.total - total).abs() < 1e-6);
    }

    #[test]
    fn unknown_max_bandwidth_is_forced_optimized() {
        let metrics = metrics_with(&[
            (MetricName::ReadThroughput, Some(1e9)),
            (MetricName::WriteThroughput, Some(1e9)),
        ]);

        let posture = bandwidth_posture(&metrics, None, 75.0, 30.0).unwrap();
        assert_eq!(posture.status, BandwidthStatus::Optimized);
        assert_eq!(posture.value, None);
        assert!((posture.total - 2e9).abs() < 1e-3);
    }

    #[test]
    fn missing_throughput_metric_is_an_error() {
        let metrics = metrics_with(&[(MetricName::ReadThroughput, Some(1.0))]);
        let err = bandwidth_posture(&metrics, Some(100), 75.0, 30.0).unwrap_err();
        assert!(matches!(
            err,
            RightSizeError::MissingMetric {
                metric: MetricName::WriteThroughput,
                ..
            }
        ));
    }
}
