use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema)]
#[kube(
    kind = "CephBlockPool",
    group = "ceph.rook.io",
    version = "v1",
    derive = "PartialEq",
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct CephBlockPoolSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Name of the pool inside Ceph, when it differs from the object name
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_domain: Option<String>,
    pub replicated: ReplicatedSpec,
    #[serde(default, rename = "enableRBDStats")]
    pub enable_rbd_stats: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplicatedSpec {
    pub size: u32,
    #[serde(default)]
    pub require_safe_replica_size: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas_per_failure_domain: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_size_ratio: Option<f64>,
}
