use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

use nfs_operator_common::config::AppConfig;

use crate::controller::{
    resources::managed_metadata,
    traits::{FromHub, ResourceDrift, SubResource},
};
use crate::crd::{
    hub::storagecluster::StorageCluster,
    rook::pool::{CephBlockPool, CephBlockPoolSpec, ReplicatedSpec},
};

/// Name of the pool inside Ceph that NFS-Ganesha keeps its recovery data in
pub static NFS_POOL_NAME: &str = ".nfs";
/// Share of the cluster capacity the autoscaler should plan for the pool
pub static NFS_POOL_TARGET_SIZE_RATIO: f64 = 0.49;


impl FromHub<StorageCluster> for CephBlockPool {
    /// Create the CephBlockPool backing the NFS exporter from a StorageCluster Hub
    ///
    /// # Arguments
    /// * `cluster` - The StorageCluster to create the pool for
    /// * `name` - The name of the CephBlockPool resource
    /// * `namespace` - The namespace of the CephBlockPool resource
    /// * `owner_ref` - The owner reference for the CephBlockPool resource
    /// * `config` - The application configuration
    ///
    /// # Returns
    /// The CephBlockPool resource
    fn from_hub(cluster: &StorageCluster, name: &str, namespace: &str, owner_ref: OwnerReference, config: &AppConfig) -> Self {
        let controller = &config.controller;

        CephBlockPool {
            metadata: managed_metadata(name, namespace, owner_ref, Self::NAME_SUFFIX),
            spec: CephBlockPoolSpec {
                name: Some(NFS_POOL_NAME.to_string()),
                failure_domain: Some(
                    cluster.spec.failure_domain
                        .clone()
                        .unwrap_or_else(|| controller.default_failure_domain.clone())
                ),
                replicated: ReplicatedSpec {
                    size: cluster.spec.replica.unwrap_or(controller.default_replica_size),
                    require_safe_replica_size: true,
                    replicas_per_failure_domain: Some(1),
                    target_size_ratio: Some(NFS_POOL_TARGET_SIZE_RATIO),
                },
                enable_rbd_stats: true,
            },
        }
    }
}

impl ResourceDrift<StorageCluster> for CephBlockPool {
    fn has_drifted(&self, other: &Self) -> bool {
        self.spec != other.spec
    }

    fn merge_from(&mut self, desired: Self) {
        self.spec = desired.spec;
    }
}

impl SubResource<StorageCluster> for CephBlockPool {
    const NAME_SUFFIX: &'static str = "cephnfs-builtin-pool";

    fn should_exist(cluster: &StorageCluster) -> bool {
        cluster.nfs_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::testing::{sample_cluster, scheme};

    fn desired(cluster: &StorageCluster) -> CephBlockPool {
        let owner_ref = scheme().controller_ref(&cluster.metadata).unwrap();
        CephBlockPool::from_hub(cluster, "ocsinit-cephnfs-builtin-pool", "storage", owner_ref, &AppConfig::default())
    }

    #[test]
    fn test_defaults_from_config() {
        let pool = desired(&sample_cluster("ocsinit", true));

        assert_eq!(pool.spec.name.as_deref(), Some(".nfs"));
        assert_eq!(pool.spec.failure_domain.as_deref(), Some("host"));
        assert_eq!(pool.spec.replicated.size, 3);
        assert!(pool.spec.replicated.require_safe_replica_size);
        assert_eq!(pool.spec.replicated.replicas_per_failure_domain, Some(1));
        assert_eq!(pool.spec.replicated.target_size_ratio, Some(0.49));
        assert!(pool.spec.enable_rbd_stats);
    }

    #[test]
    fn test_cluster_overrides_failure_domain_and_replica() {
        let mut cluster = sample_cluster("ocsinit", true);
        cluster.spec.failure_domain = Some("zone".to_string());
        cluster.spec.replica = Some(2);

        let pool = desired(&cluster);

        assert_eq!(pool.spec.failure_domain.as_deref(), Some("zone"));
        assert_eq!(pool.spec.replicated.size, 2);
    }

    #[test]
    fn test_drift_and_merge() {
        let cluster = sample_cluster("ocsinit", true);
        let mut live = desired(&cluster);
        live.metadata.resource_version = Some("42".to_string());
        live.spec.replicated.size = 1;

        let wanted = desired(&cluster);
        assert!(live.has_drifted(&wanted));

        live.merge_from(wanted.clone());
        assert!(!live.has_drifted(&wanted));
        assert_eq!(live.metadata.resource_version.as_deref(), Some("42"));
    }

    #[test]
    fn test_exists_only_when_nfs_enabled() {
        assert!(CephBlockPool::should_exist(&sample_cluster("ocsinit", true)));
        assert!(!CephBlockPool::should_exist(&sample_cluster("ocsinit", false)));
    }
}
