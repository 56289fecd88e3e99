//! AWS collaborators: instance inventory and telemetry
//!
//! Thin wrappers around the AWS SDK. All blocking I/O for a run happens
//! here; the decision engine only ever sees resolved values.

mod cloudwatch;
mod rds;

pub use cloudwatch::MetricsSource;
pub use rds::RdsInventory;

use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Load the shared AWS configuration, honoring an optional named profile
/// and region override.
pub async fn load_config(profile: Option<&str>, region: Option<&str>) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());
    if let Some(profile) = profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = region {
        loader = loader.region(Region::new(region.to_string()));
    }
    loader.load().await
}
