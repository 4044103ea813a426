use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

use nfs_operator_common::config::AppConfig;

use crate::controller::{
    defaults::{daemon_resources, placement, NFS_DAEMON},
    resources::managed_metadata,
    traits::{FromHub, ResourceDrift, SubResource},
};
use crate::crd::{
    hub::storagecluster::StorageCluster,
    rook::nfs::{CephNFS, CephNFSSpec, GaneshaServerSpec},
};

/// Number of active NFS-Ganesha servers
pub static ACTIVE_SERVERS: i32 = 1;


impl FromHub<StorageCluster> for CephNFS {
    /// Create the CephNFS exporter from a StorageCluster Hub
    ///
    /// Placement and resources come from the `nfs` entries of the StorageCluster
    /// spec when present, otherwise from the built-in defaults.
    ///
    /// # Arguments
    /// * `cluster` - The StorageCluster to create the exporter for
    /// * `name` - The name of the CephNFS resource
    /// * `namespace` - The namespace of the CephNFS resource
    /// * `owner_ref` - The owner reference for the CephNFS resource
    /// * `config` - The application configuration
    ///
    /// # Returns
    /// The CephNFS resource
    fn from_hub(cluster: &StorageCluster, name: &str, namespace: &str, owner_ref: OwnerReference, config: &AppConfig) -> Self {
        let controller = &config.controller;

        CephNFS {
            metadata: managed_metadata(name, namespace, owner_ref, Self::NAME_SUFFIX),
            spec: CephNFSSpec {
                server: GaneshaServerSpec {
                    active: ACTIVE_SERVERS,
                    placement: Some(placement(cluster, NFS_DAEMON, controller)),
                    resources: Some(daemon_resources(NFS_DAEMON, &cluster.spec.resources)),
                    priority_class_name: Some(controller.priority_class_name.clone())
                        .filter(|name| !name.is_empty()),
                },
            },
        }
    }
}

impl ResourceDrift<StorageCluster> for CephNFS {
    fn has_drifted(&self, other: &Self) -> bool {
        self.spec != other.spec
    }

    fn merge_from(&mut self, desired: Self) {
        self.spec = desired.spec;
    }
}

impl SubResource<StorageCluster> for CephNFS {
    const NAME_SUFFIX: &'static str = "cephnfs";

    fn should_exist(cluster: &StorageCluster) -> bool {
        cluster.nfs_enabled()
    }
}
