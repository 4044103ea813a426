use k8s_openapi::api::core::v1::{
    NodeAffinity, NodeSelector, NodeSelectorRequirement, NodeSelectorTerm, ResourceRequirements, Toleration,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use std::collections::BTreeMap;

use nfs_operator_common::config::ControllerConfig;

use crate::crd::{hub::storagecluster::StorageCluster, rook::common::Placement};

/// Daemon tag of the NFS-Ganesha servers
pub static NFS_DAEMON: &str = "nfs";
/// Placement key applied to every daemon without a placement of its own
pub static ALL_PLACEMENT: &str = "all";


/// Resolve the compute resources of a daemon
///
/// # Arguments
/// * `tag` - The daemon tag, e.g. `nfs`
/// * `overrides` - The per-daemon overrides from the StorageCluster spec
///
/// # Returns
/// The override for the daemon if one is set, the built-in default otherwise
pub fn daemon_resources(tag: &str, overrides: &BTreeMap<String, ResourceRequirements>) -> ResourceRequirements {
    overrides
        .get(tag)
        .cloned()
        .unwrap_or_else(|| default_daemon_resources(tag))
}

fn default_daemon_resources(tag: &str) -> ResourceRequirements {
    match tag {
        "nfs" => resource_requirements("3", "8Gi"),
        _ => ResourceRequirements::default(),
    }
}

fn resource_requirements(cpu: &str, memory: &str) -> ResourceRequirements {
    let quantities = BTreeMap::from([
        ("cpu".to_string(), Quantity(cpu.to_string())),
        ("memory".to_string(), Quantity(memory.to_string())),
    ]);

    ResourceRequirements {
        limits: Some(quantities.clone()),
        requests: Some(quantities),
        ..Default::default()
    }
}

/// Resolve the placement of a daemon
///
/// The daemon's own entry in `spec.placement` wins, then the `all` entry, then a
/// default that pins the daemon to labelled storage nodes and tolerates their taint.
pub fn placement(cluster: &StorageCluster, tag: &str, config: &ControllerConfig) -> Placement {
    cluster.spec.placement
        .get(tag)
        .or_else(|| cluster.spec.placement.get(ALL_PLACEMENT))
        .cloned()
        .unwrap_or_else(|| default_placement(config))
}

fn default_placement(config: &ControllerConfig) -> Placement {
    Placement {
        node_affinity: Some(NodeAffinity {
            required_during_scheduling_ignored_during_execution: Some(NodeSelector {
                node_selector_terms: vec![NodeSelectorTerm {
                    match_expressions: Some(vec![NodeSelectorRequirement {
                        key: config.storage_node_label.clone(),
                        operator: "Exists".to_string(),
                        values: None,
                    }]),
                    ..Default::default()
                }],
            }),
            ..Default::default()
        }),
        tolerations: Some(vec![Toleration {
            key: Some(config.storage_node_taint.clone()),
            operator: Some("Equal".to_string()),
            value: Some("true".to_string()),
            effect: Some("NoSchedule".to_string()),
            ..Default::default()
        }]),
        ..Default::default()
    }
}
