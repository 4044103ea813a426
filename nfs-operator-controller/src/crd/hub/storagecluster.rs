use chrono::{DateTime, Utc};
use k8s_openapi::{
    api::core::v1::ResourceRequirements,
    apimachinery::pkg::apis::meta::v1::ObjectMeta,
};
use serde::{Deserialize, Serialize};
use std::{fmt::{Display, Formatter, Result as FmtResult}, collections::BTreeMap};
use schemars::JsonSchema;

use crate::crd::{hub::traits::Hub, hub::common::{NfsSpec, NetworkSpec}, rook::common::Placement, v1alpha1};

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, JsonSchema)]
pub struct StorageCluster {
    pub metadata: ObjectMeta,
    pub spec: StorageClusterSpec,
    pub status: Option<StorageClusterStatus>,
}

impl Hub for StorageCluster {}

impl StorageCluster {
    /// Whether the NFS feature is switched on. A missing `nfs` section means off.
    pub fn nfs_enabled(&self) -> bool {
        self.spec.nfs.as_ref().is_some_and(|nfs| nfs.enable)
    }

    /// Whether the Ceph daemons of this cluster run on the host network
    pub fn host_network(&self) -> bool {
        self.spec.network.as_ref().is_some_and(|network| network.host_network)
    }
}

impl From<v1alpha1::storagecluster::StorageCluster> for StorageCluster {
    fn from(cluster: v1alpha1::storagecluster::StorageCluster) -> Self {
        StorageCluster {
            metadata: cluster.metadata,
            spec: cluster.spec.into(),
            status: cluster.status.map(|status| status.into()),
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Default, JsonSchema)]
pub struct StorageClusterSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nfs: Option<NfsSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkSpec>,
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceRequirements>,
    #[serde(default)]
    pub placement: BTreeMap<String, Placement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replica: Option<u32>,
}

impl From<v1alpha1::storagecluster::StorageClusterSpec> for StorageClusterSpec {
    fn from(spec: v1alpha1::storagecluster::StorageClusterSpec) -> Self {
        StorageClusterSpec {
            nfs: spec.nfs.map(|nfs| nfs.into()),
            network: spec.network.map(|network| network.into()),
            resources: spec.resources,
            placement: spec.placement,
            failure_domain: spec.failure_domain,
            replica: spec.replica,
        }
    }
}


#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorageClusterStatus {
    pub phase: String,
    pub last_updated: Option<DateTime<Utc>>,
}

impl From<v1alpha1::storagecluster::StorageClusterStatus> for StorageClusterStatus {
    fn from(status: v1alpha1::storagecluster::StorageClusterStatus) -> Self {
        StorageClusterStatus {
            phase: status.phase,
            last_updated: status.last_updated,
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StorageClusterPhase {
    // Managed resources are being created or updated
    Progressing,
    // Every managed resource matches the spec
    Ready,
    // The StorageCluster is being deleted
    Deleting,
}

impl Display for StorageClusterPhase {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageClusterPhase::Progressing => write!(f, "progressing"),
            StorageClusterPhase::Ready => write!(f, "ready"),
            StorageClusterPhase::Deleting => write!(f, "deleting"),
        }
    }
}
