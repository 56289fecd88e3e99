//! Instance-type resolver
//!
//! Finds the scaling target for an instance: explicit catalog neighbors
//! win; downsizing falls back to a deterministic search across the
//! burstable family when no neighbor is declared. There is no upward
//! search, only the explicit `up` link.

use crate::catalog::{InstanceCatalog, InstanceProperties};

/// Burstable-family prefix for x86 types.
const BURSTABLE_PREFIX: &str = "db.t3";
/// Burstable-family prefix for ARM/Graviton types.
const BURSTABLE_PREFIX_GRAVITON: &str = "db.t4g";
/// Any type whose family segment starts with `t` is already burstable.
const BURSTABLE_FAMILY_PREFIX: &str = "db.t";

/// Whether a type identifier names an ARM/Graviton family. The convention
/// is a trailing `g` on the family segment, e.g. `db.r6g.large` or
/// `db.t4g.micro`.
pub fn is_graviton_family(type_id: &str) -> bool {
    type_id
        .split('.')
        .nth(1)
        .is_some_and(|family| family.ends_with('g'))
}

/// Upscale target: the explicit `up` link or nothing. Escalation requires
/// catalog data; guessing past the largest known type is not safe.
pub fn resolve_up(props: &InstanceProperties) -> Option<&str> {
    props.up.as_deref()
}

/// Downscale target for `current_type`.
///
/// The explicit `down` link short-circuits the search. Otherwise the
/// candidate set is the burstable family matching the current type's CPU
/// architecture, restricted to types with vCPU not exceeding the current
/// one; the winner maximizes `(vcpu, mem)`, with the lexicographically
/// smallest identifier taken on an exact tie so repeated runs agree.
pub fn resolve_down(
    current_type: &str,
    props: &InstanceProperties,
    catalog: &InstanceCatalog,
) -> Option<String> {
    if let Some(down) = props.down.as_deref() {
        return Some(down.to_string());
    }

    // Already at the conventional cost floor.
    if current_type.starts_with(BURSTABLE_FAMILY_PREFIX) {
        return None;
    }

    let prefix = if is_graviton_family(current_type) {
        BURSTABLE_PREFIX_GRAVITON
    } else {
        BURSTABLE_PREFIX
    };

    let mut best: Option<(&str, &InstanceProperties)> = None;

    for (type_id, candidate) in catalog.iter() {
        if !type_id.starts_with(prefix) || candidate.vcpu > props.vcpu {
            continue;
        }
        let better = match best {
            None => true,
            Some((_, chosen)) => {
                (candidate.vcpu, candidate.mem) > (chosen.vcpu, chosen.mem)
            }
        };
        if better {
            best = Some((type_id, candidate));
        }
    }

    best.map(|(type_id, _)| type_id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(vcpu: i64, mem: i64) -> InstanceProperties {
        InstanceProperties {
            vcpu,
            mem,
            max_bandwidth: None,
            std_price: 0.1,
            up: None,
            down: None,
        }
    }

    fn burstable_catalog() -> InstanceCatalog {
        [
            ("db.t3.micro".to_string(), props(2, 1)),
            ("db.t3.small".to_string(), props(2, 2)),
            ("db.t3.medium".to_string(), props(2, 4)),
            ("db.t3.xlarge".to_string(), props(4, 16)),
            ("db.t4g.micro".to_string(), props(2, 1)),
            ("db.t4g.medium".to_string(), props(2, 4)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn detects_graviton_families() {
        assert!(is_graviton_family("db.r6g.large"));
        assert!(is_graviton_family("db.t4g.micro"));
        assert!(!is_graviton_family("db.r5.large"));
        assert!(!is_graviton_family("db.t3.medium"));
        assert!(!is_graviton_family("bare-identifier"));
    }

    #[test]
    fn explicit_down_link_short_circuits_search() {
        // The search would find db.t3.medium; the explicit link disagrees
        // on purpose to prove the search path is not entered.
        let mut current = props(2, 16);
        current.down = Some("db.r5.medium".to_string());

        let target = resolve_down("db.r5.large", &current, &burstable_catalog());
        assert_eq!(target.as_deref(), Some("db.r5.medium"));
    }

    #[test]
    fn fallback_picks_largest_fitting_burstable() {
        let current = props(2, 16);
        let target = resolve_down("db.r5.large", &current, &burstable_catalog());
        // vCPU ceiling of 2 excludes db.t3.xlarge; db.t3.medium wins on mem.
        assert_eq!(target.as_deref(), Some("db.t3.medium"));
    }

    #[test]
    fn fallback_respects_architecture_family() {
        let current = props(2, 16);
        let target = resolve_down("db.r6g.large", &current, &burstable_catalog());
        assert_eq!(target.as_deref(), Some("db.t4g.medium"));
    }

    #[test]
    fn burstable_current_type_has_no_fallback() {
        let current = props(2, 4);
        assert_eq!(resolve_down("db.t3.medium", &current, &burstable_catalog()), None);
    }

    #[test]
    fn no_candidate_yields_none() {
        let current = props(1, 8);
        // vCPU ceiling of 1 excludes every burstable entry.
        assert_eq!(resolve_down("db.r5.small", &current, &burstable_catalog()), None);
    }

    #[test]
    fn resolution_is_deterministic_across_calls() {
        let catalog = burstable_catalog();
        let current = props(2, 16);
        let first = resolve_down("db.r5.large", &current, &catalog);
        for _ in 0..10 {
            assert_eq!(resolve_down("db.r5.large", &current, &catalog), first);
        }
    }

    #[test]
    fn exact_tie_breaks_to_smallest_identifier() {
        let catalog: InstanceCatalog = [
            ("db.t3.alpha".to_string(), props(2, 4)),
            ("db.t3.beta".to_string(), props(2, 4)),
        ]
        .into_iter()
        .collect();

        let current = props(2, 16);
        let target = resolve_down("db.r5.large", &current, &catalog);
        assert_eq!(target.as_deref(), Some("db.t3.alpha"));
    }

    #[test]
    fn resolve_up_is_the_explicit_link_only() {
        let mut current = props(2, 16);
        assert_eq!(resolve_up(&current), None);
        current.up = Some("db.r5.xlarge".to_string());
        assert_eq!(resolve_up(&current), Some("db.r5.xlarge"));
    }
}
