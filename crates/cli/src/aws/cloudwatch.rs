//! CloudWatch metrics retrieval
//!
//! One GetMetricData batch per instance covering all five signals over
//! the lookback window. Connection counts always aggregate with Average;
//! the remaining signals use the configured statistic.

use anyhow::{Context, Result};
use aws_config::SdkConfig;
use aws_sdk_cloudwatch::primitives::DateTime;
use aws_sdk_cloudwatch::types::{Dimension, Metric, MetricDataQuery, MetricStat};
use chrono::Utc;
use rightsize_lib::config::Statistic;
use rightsize_lib::models::{InstanceMetrics, MetricName};
use tracing::debug;

const NAMESPACE: &str = "AWS/RDS";
const DIMENSION_NAME: &str = "DBInstanceIdentifier";

const CPU_ID: &str = "cpu";
const CONNECTIONS_ID: &str = "connections";
const FREEABLE_MEMORY_ID: &str = "freeablemem";
const READ_ID: &str = "read";
const WRITE_ID: &str = "write";

fn metric_for_query_id(id: &str) -> Option<MetricName> {
    match id {
        CPU_ID => Some(MetricName::CpuUtilization),
        CONNECTIONS_ID => Some(MetricName::DatabaseConnections),
        FREEABLE_MEMORY_ID => Some(MetricName::FreeableMemory),
        READ_ID => Some(MetricName::ReadThroughput),
        WRITE_ID => Some(MetricName::WriteThroughput),
        _ => None,
    }
}

/// Telemetry source for instance utilization metrics.
pub struct MetricsSource {
    client: aws_sdk_cloudwatch::Client,
}

impl MetricsSource {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_cloudwatch::Client::new(config),
        }
    }

    /// Fetch all five signals for one instance, aggregated into a single
    /// statistic each over the lookback window ending at the current hour.
    ///
    /// A query that comes back with no data points yields an entry with an
    /// absent value; a query missing from the response entirely yields no
    /// entry, which the engine reports as a missing metric.
    pub async fn metrics(
        &self,
        db_instance_identifier: &str,
        period_days: i32,
        statistic: Statistic,
    ) -> Result<InstanceMetrics> {
        let end = Utc::now().timestamp() / 3600 * 3600;
        let start = end - i64::from(period_days) * 86400;
        let period_seconds = period_days * 24 * 60 * 60;
        let stat = statistic.to_stat_string();

        let queries = [
            (CONNECTIONS_ID, MetricName::DatabaseConnections, "Average"),
            (CPU_ID, MetricName::CpuUtilization, stat.as_str()),
            (FREEABLE_MEMORY_ID, MetricName::FreeableMemory, stat.as_str()),
            (READ_ID, MetricName::ReadThroughput, stat.as_str()),
            (WRITE_ID, MetricName::WriteThroughput, stat.as_str()),
        ];

        let mut request = self
            .client
            .get_metric_data()
            .start_time(DateTime::from_secs(start))
            .end_time(DateTime::from_secs(end));

        for (query_id, metric, stat) in queries {
            let dimension = Dimension::builder()
                .name(DIMENSION_NAME)
                .value(db_instance_identifier)
                .build();
            let metric = Metric::builder()
                .namespace(NAMESPACE)
                .metric_name(metric.as_str())
                .dimensions(dimension)
                .build();
            let metric_stat = MetricStat::builder()
                .metric(metric)
                .period(period_seconds)
                .stat(stat)
                .build();
            request = request.metric_data_queries(
                MetricDataQuery::builder()
                    .id(query_id)
                    .metric_stat(metric_stat)
                    .build(),
            );
        }

        let response = request.send().await.with_context(|| {
            format!("failed to fetch metrics for {}", db_instance_identifier)
        })?;

        let mut metrics = InstanceMetrics::new(db_instance_identifier);
        for result in response.metric_data_results() {
            let Some(name) = result.id().and_then(metric_for_query_id) else {
                continue;
            };
            metrics.insert(name, result.values().first().copied());
        }

        debug!(instance = %db_instance_identifier, "fetched instance metrics");
        Ok(metrics)
    }
}
