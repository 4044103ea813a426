use kube::CustomResource;
use k8s_openapi::api::core::v1::ResourceRequirements;
use std::collections::BTreeMap;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::crd::rook::common::Placement;
use crate::crd::v1alpha1::common::{NfsSpec, NetworkSpec};

#[derive(CustomResource, Deserialize, Serialize, Clone, Debug, PartialEq, Default, JsonSchema)]
#[kube(
    kind = "StorageCluster",
    group = "nfs-operator.io",
    version = "v1alpha1",
    status = "StorageClusterStatus",
    doc = "StorageCluster declares the NFS export of a Ceph cluster and the resources backing it.",
    derive = "PartialEq",
    shortname = "nfssc",
    printcolumn = r#"{"name":"Phase", "type":"string", "description":"Current phase of the resource", "jsonPath":".status.phase"}"#,
    printcolumn = r#"{"name":"NFS", "type":"boolean", "description":"Whether NFS is enabled", "jsonPath":".spec.nfs.enable"}"#,
    printcolumn = r#"{"name":"Last Updated", "type":"date", "description":"Last time the resource was updated", "jsonPath":".status.lastUpdated"}"#,
    namespaced
)]
#[serde(rename_all = "camelCase")]
pub struct StorageClusterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// NFS feature configuration, NFS is disabled when omitted
    pub nfs: Option<NfsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Network configuration of the Ceph daemons
    pub network: Option<NetworkSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    /// Compute resource overrides keyed by daemon (e.g. `nfs`)
    pub resources: BTreeMap<String, ResourceRequirements>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    /// Placement rules keyed by daemon (e.g. `nfs`), `all` applies to every daemon
    pub placement: BTreeMap<String, Placement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Failure domain of the NFS backing pool
    pub failure_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Replica count of the NFS backing pool
    pub replica: Option<u32>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageClusterStatus {
    pub phase: String,
    pub last_updated: Option<DateTime<Utc>>,
}
