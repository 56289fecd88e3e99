//! Recommendation rule engine
//!
//! Combines the classifiers and the resolver in strict priority order and
//! emits at most one recommendation per instance. Evaluation is pure and
//! synchronous; all I/O happened before this point.

use tracing::{debug, info};

use crate::catalog::{InstanceCatalog, InstanceProperties};
use crate::classify::{self, BandwidthStatus, CpuStatus, BYTES_PER_MBIT};
use crate::config::AnalyzerConfig;
use crate::error::RightSizeError;
use crate::models::{Action, Instance, InstanceMetrics, Reason, Recommendation};

/// Fixed hours-per-month constant for price extrapolation.
pub const HOURS_PER_MONTH: f64 = 730.0;

/// The right-sizing decision engine for one run.
pub struct Engine {
    catalog: InstanceCatalog,
    config: AnalyzerConfig,
}

impl Engine {
    /// Build an engine over an immutable catalog. Configuration is
    /// validated here so threshold misuse surfaces before any instance is
    /// processed.
    pub fn new(catalog: InstanceCatalog, config: AnalyzerConfig) -> Result<Self, RightSizeError> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    pub fn catalog(&self) -> &InstanceCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Whether an instance carries every required tag. Instances failing
    /// the filter are excluded before any metric is fetched.
    pub fn matches_tag_filter(&self, instance: &Instance) -> bool {
        self.config
            .required_tags
            .iter()
            .all(|(key, value)| instance.tags.get(key) == Some(value))
    }

    /// Evaluate one instance. `Ok(None)` means the instance is excluded or
    /// already right-sized; a missing metric aborts the whole run.
    pub fn evaluate(
        &self,
        instance: &Instance,
        metrics: &InstanceMetrics,
    ) -> Result<Option<Recommendation>, RightSizeError> {
        let id = &instance.db_instance_identifier;

        if !self.matches_tag_filter(instance) {
            debug!(instance = %id, "skipping: required tags not present");
            return Ok(None);
        }

        if classify::had_no_activity(metrics)? {
            info!(instance = %id, "no connections within period, flagging for termination");
            return Ok(Some(self.recommendation(
                instance,
                Action::Terminate,
                Reason::NoUsageWithinPeriod,
                None,
                None,
            )));
        }

        let Some(props) = self.catalog.lookup(&instance.db_instance_class) else {
            debug!(
                instance = %id,
                class = %instance.db_instance_class,
                "skipping: instance type not in catalog"
            );
            return Ok(None);
        };

        let memory = classify::memory_posture(
            metrics,
            props.mem,
            self.config.mem_upsize_threshold,
        )?;
        if memory.under_provisioned {
            // Terminal even without an up link: escalation is
            // explicit-catalog-only, and a memory-starved instance is
            // never a downscale candidate.
            return Ok(self.upscale(
                instance,
                props,
                Reason::MemoryUnderProvisioned,
                memory.percent_free,
            ));
        }

        let cpu = classify::cpu_posture(
            metrics,
            self.config.cpu_upsize_threshold,
            self.config.cpu_downsize_threshold,
        )?;
        let bandwidth = classify::bandwidth_posture(
            metrics,
            props.max_bandwidth,
            self.config.cpu_upsize_threshold,
            self.config.cpu_downsize_threshold,
        )?;

        match cpu.status {
            CpuStatus::UnderProvisioned => {
                Ok(self.upscale(instance, props, Reason::CpuUnderProvisioned, cpu.value))
            }
            CpuStatus::OverProvisioned
                if bandwidth.status != BandwidthStatus::UnderProvisioned =>
            {
                Ok(self.downscale(instance, props, cpu.value, bandwidth.total))
            }
            _ => {
                debug!(instance = %id, "already right-sized");
                Ok(None)
            }
        }
    }

    fn upscale(
        &self,
        instance: &Instance,
        props: &InstanceProperties,
        reason: Reason,
        metric_value: f64,
    ) -> Option<Recommendation> {
        let target = crate::resolver::resolve_up(props)?;
        let price_diff = self.monthly_price_diff(props, target);

        info!(
            instance = %instance.db_instance_identifier,
            target = %target,
            reason = ?reason,
            "recommending upscale"
        );
        Some(self.recommendation(
            instance,
            Action::UpScale,
            reason,
            Some((target.to_string(), Some(metric_value))),
            price_diff,
        ))
    }

    fn downscale(
        &self,
        instance: &Instance,
        props: &InstanceProperties,
        cpu_value: f64,
        total_throughput: f64,
    ) -> Option<Recommendation> {
        let target = crate::resolver::resolve_down(
            &instance.db_instance_class,
            props,
            &self.catalog,
        )?;

        // A known target bandwidth ceiling must clear the observed
        // throughput; an unpublished ceiling does not block.
        if let Some(target_props) = self.catalog.lookup(&target) {
            if let Some(max) = target_props.max_bandwidth {
                if total_throughput >= max as f64 * BYTES_PER_MBIT {
                    debug!(
                        instance = %instance.db_instance_identifier,
                        target = %target,
                        "downscale target cannot absorb observed throughput"
                    );
                    return None;
                }
            }
        }

        let price_diff = self.monthly_price_diff(props, &target);

        info!(
            instance = %instance.db_instance_identifier,
            target = %target,
            "recommending downscale"
        );
        Some(self.recommendation(
            instance,
            Action::DownScale,
            Reason::CpuOverProvisioned,
            Some((target, Some(cpu_value))),
            price_diff,
        ))
    }

    /// `(target − current) × 730`, or `None` when the target type is not
    /// in the catalog and its price is unknown.
    fn monthly_price_diff(&self, current: &InstanceProperties, target: &str) -> Option<f64> {
        self.catalog
            .lookup(target)
            .map(|t| (t.std_price - current.std_price) * HOURS_PER_MONTH)
    }

    fn recommendation(
        &self,
        instance: &Instance,
        action: Action,
        reason: Reason,
        target: Option<(String, Option<f64>)>,
        monthly_approximate_price_diff: Option<f64>,
    ) -> Recommendation {
        let (recommended_instance_type, metric_value) = match target {
            Some((t, v)) => (Some(t), v),
            None => (None, None),
        };
        Recommendation {
            instance: instance.clone(),
            action,
            reason,
            recommended_instance_type,
            metric_value,
            monthly_approximate_price_diff,
        }
    }
}

/// Sum of the per-recommendation monthly deltas; positive means the run's
/// changes cost more, negative means savings.
pub fn total_monthly_price_diff(recommendations: &[Recommendation]) -> f64 {
    recommendations
        .iter()
        .filter_map(|r| r.monthly_approximate_price_diff)
        .sum()
}
