//! Instance-type catalog: properties and traversal helpers
//!
//! The catalog is loaded once per run from a JSON object keyed by
//! instance-type identifier and never mutated afterwards. A `BTreeMap`
//! backs it so every traversal is deterministic.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RightSizeError;

/// Properties of one instance type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceProperties {
    /// Virtual CPU count.
    pub vcpu: i64,
    /// Memory size in GiB.
    pub mem: i64,
    /// Maximum network bandwidth in Mbit/s; `None` means unbounded or
    /// unpublished.
    #[serde(default)]
    pub max_bandwidth: Option<i64>,
    /// On-demand hourly price in USD.
    pub std_price: f64,
    /// Identifier of the next larger type, when the catalog declares one.
    #[serde(default)]
    pub up: Option<String>,
    /// Identifier of the next smaller type, when the catalog declares one.
    #[serde(default)]
    pub down: Option<String>,
}

/// A structural problem found by [`InstanceCatalog::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    DanglingLink {
        type_id: String,
        link: LinkDirection,
        target: String,
    },
    NonMonotonicLink {
        type_id: String,
        link: LinkDirection,
        target: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Up,
    Down,
}

impl fmt::Display for LinkDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkDirection::Up => f.write_str("up"),
            LinkDirection::Down => f.write_str("down"),
        }
    }
}

impl fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogIssue::DanglingLink { type_id, link, target } => write!(
                f,
                "{}: {} link points at {} which is not in the catalog",
                type_id, link, target
            ),
            CatalogIssue::NonMonotonicLink { type_id, link, target } => write!(
                f,
                "{}: {} link points at {} which is not {} in both vCPU and memory",
                type_id,
                link,
                target,
                match link {
                    LinkDirection::Up => "larger or equal",
                    LinkDirection::Down => "smaller or equal",
                }
            ),
        }
    }
}

/// Immutable table of instance-type properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceCatalog {
    types: BTreeMap<String, InstanceProperties>,
}

impl InstanceCatalog {
    /// Parse a catalog document. Any malformed input is fatal to the run.
    pub fn from_json(document: &str) -> Result<Self, RightSizeError> {
        let catalog: InstanceCatalog = serde_json::from_str(document)?;
        Ok(catalog)
    }

    /// Look up one type. `None` means the type is unsupported and the
    /// instance is excluded from analysis.
    pub fn lookup(&self, type_id: &str) -> Option<&InstanceProperties> {
        self.types.get(type_id)
    }

    /// Iterate entries in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstanceProperties)> {
        self.types.iter().map(|(id, props)| (id.as_str(), props))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Check the up/down link invariants: links must resolve, `up` must
    /// point at a type with vCPU and memory at least as large, `down` at
    /// one at most as large.
    pub fn validate(&self) -> Vec<CatalogIssue> {
        let mut issues = Vec::new();

        for (type_id, props) in &self.types {
            for (link, target) in [
                (LinkDirection::Up, props.up.as_deref()),
                (LinkDirection::Down, props.down.as_deref()),
            ] {
                let Some(target) = target else { continue };
                let Some(neighbor) = self.types.get(target) else {
                    issues.push(CatalogIssue::DanglingLink {
                        type_id: type_id.clone(),
                        link,
                        target: target.to_string(),
                    });
                    continue;
                };
                let monotonic = match link {
                    LinkDirection::Up => {
                        neighbor.vcpu >= props.vcpu && neighbor.mem >= props.mem
                    }
                    LinkDirection::Down => {
                        neighbor.vcpu <= props.vcpu && neighbor.mem <= props.mem
                    }
                };
                if !monotonic {
                    issues.push(CatalogIssue::NonMonotonicLink {
                        type_id: type_id.clone(),
                        link,
                        target: target.to_string(),
                    });
                }
            }
        }

        issues
    }
}

impl FromIterator<(String, InstanceProperties)> for InstanceCatalog {
    fn from_iter<T: IntoIterator<Item = (String, InstanceProperties)>>(iter: T) -> Self {
        Self {
            types: iter.into_iter().collect(),
        }
    }
}
