//! The `analyze` command: fetch, evaluate, report

use std::path::Path;

use anyhow::{Context, Result};
use rightsize_lib::models::Tags;
use rightsize_lib::{total_monthly_price_diff, AnalyzerConfig, Engine, InstanceCatalog};
use tracing::{debug, info, warn};

use crate::aws::{self, MetricsSource, RdsInventory};
use crate::output::{self, OutputFormat};
use crate::{catalog_source, report};

pub struct AnalyzeOptions {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub instance_types: String,
    pub config: AnalyzerConfig,
    pub format: OutputFormat,
}

/// Run one full analysis: one recommendation file per invocation, one
/// aggregate cost line, fail-fast on any missing metric.
pub async fn run(options: AnalyzeOptions) -> Result<()> {
    let document = catalog_source::fetch(&options.instance_types).await?;
    let catalog =
        InstanceCatalog::from_json(&document).context("failed to load instance type catalog")?;
    info!(types = catalog.len(), "loaded instance type catalog");
    for issue in catalog.validate() {
        warn!(%issue, "instance type catalog inconsistency");
    }

    let engine = Engine::new(catalog, options.config)?;

    let aws_config =
        aws::load_config(options.profile.as_deref(), options.region.as_deref()).await;
    let inventory = RdsInventory::new(&aws_config);
    let telemetry = MetricsSource::new(&aws_config);

    let instances = inventory.instances().await?;
    info!(count = instances.len(), "analyzing DB instances");

    let mut recommendations = Vec::new();
    for instance in &instances {
        // Filter on tags before paying for a metrics call.
        if !engine.matches_tag_filter(instance) {
            debug!(
                instance = %instance.db_instance_identifier,
                "skipping: required tags not present"
            );
            continue;
        }

        let metrics = telemetry
            .metrics(
                &instance.db_instance_identifier,
                engine.config().period_days,
                engine.config().statistic,
            )
            .await?;

        if let Some(recommendation) = engine.evaluate(instance, &metrics)? {
            recommendations.push(recommendation);
        }
    }

    output::print_recommendations(&recommendations, options.format)?;
    output::print_cost_difference(total_monthly_price_diff(&recommendations));

    let path = report::write_recommendations(&recommendations, Path::new("."))?;
    println!("{}", path.display());

    Ok(())
}

/// Parse a `key=value,key2=value2` tag filter. Blank entries are ignored;
/// entries without exactly one `=` are rejected.
pub fn parse_tags(raw: &str) -> Result<Tags> {
    let mut tags = Tags::new();

    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        match entry.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() && !value.contains('=') => {
                tags.insert(key.trim().to_string(), value.trim().to_string());
            }
            _ => anyhow::bail!("invalid tag filter entry {:?} (expected key=value)", entry),
        }
    }

    Ok(tags)
}
