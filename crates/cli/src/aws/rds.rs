//! RDS instance inventory

use anyhow::{Context, Result};
use aws_config::SdkConfig;
use rightsize_lib::models::{Instance, Tags};
use tracing::debug;

/// Read-only view over the account's DB instances.
pub struct RdsInventory {
    client: aws_sdk_rds::Client,
}

impl RdsInventory {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_rds::Client::new(config),
        }
    }

    /// Fetch every DB instance in the region, with tags, in API order.
    /// Instances missing an identifier or class are skipped; the engine
    /// cannot evaluate them.
    pub async fn instances(&self) -> Result<Vec<Instance>> {
        let mut instances = Vec::new();
        let mut pages = self
            .client
            .describe_db_instances()
            .into_paginator()
            .send();

        while let Some(page) = pages.next().await {
            let page = page.context("failed to describe DB instances")?;
            for db in page.db_instances() {
                let (Some(id), Some(class)) =
                    (db.db_instance_identifier(), db.db_instance_class())
                else {
                    debug!("skipping DB instance without identifier or class");
                    continue;
                };

                let tags: Tags = db
                    .tag_list()
                    .iter()
                    .filter_map(|t| Some((t.key()?.to_string(), t.value()?.to_string())))
                    .collect();

                instances.push(Instance {
                    availability_zone: db.availability_zone().map(str::to_string),
                    db_instance_arn: db.db_instance_arn().map(str::to_string),
                    db_instance_identifier: id.to_string(),
                    db_instance_class: class.to_string(),
                    engine: db.engine().map(str::to_string),
                    engine_version: db.engine_version().map(str::to_string),
                    tags,
                });
            }
        }

        debug!(count = instances.len(), "fetched DB instance inventory");
        Ok(instances)
    }
}
