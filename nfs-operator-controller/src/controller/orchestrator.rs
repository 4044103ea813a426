use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;
use kube::Client;
use std::sync::Arc;

use nfs_operator_common::config::AppConfig;

use crate::controller::{
    owner::OwnerScheme,
    reconciler::SubResourceReconciler,
    requeue::RequeueHint,
    store::{KubeStore, ObjectStore},
};
use crate::crd::{
    hub::storagecluster::StorageCluster,
    rook::{nfs::CephNFS, pool::CephBlockPool},
};
use crate::error::Result;


/// A reconciler for one kind of managed resource, with the kind erased so
/// reconcilers of different kinds can be run as a list
#[async_trait]
pub trait ResourceManager: Send + Sync {
    fn kind_name(&self) -> String;

    fn should_exist(&self, cluster: &StorageCluster) -> bool;

    async fn ensure_created(&self, cluster: &StorageCluster) -> Result<RequeueHint>;

    async fn ensure_deleted(&self, cluster: &StorageCluster) -> Result<RequeueHint>;
}

/// Runs the managed resource reconcilers of a StorageCluster in dependency order.
///
/// Creation walks the list front to back and deletion back to front, so the
/// pool exists before the exporter and the Service goes before the exporter.
/// Resources the StorageCluster no longer wants are removed back to front as well,
/// before anything is created. A pass stops at the first reconciler that fails;
/// the ones after it are left for the requeued pass.
pub struct Orchestrator {
    managers: Vec<Box<dyn ResourceManager>>,
}

impl Orchestrator {
    pub fn new(managers: Vec<Box<dyn ResourceManager>>) -> Self {
        Orchestrator { managers }
    }

    /// The NFS resources of a StorageCluster, backed by the Kubernetes API server
    pub fn nfs(client: Client, scheme: OwnerScheme, config: Arc<AppConfig>) -> Self {
        Orchestrator::with_stores(
            Arc::new(KubeStore::<CephBlockPool>::new(client.clone())),
            Arc::new(KubeStore::<CephNFS>::new(client.clone())),
            Arc::new(KubeStore::<Service>::new(client)),
            scheme,
            config,
        )
    }

    /// The NFS resources of a StorageCluster over arbitrary object stores
    pub fn with_stores(
        pools: Arc<dyn ObjectStore<CephBlockPool>>,
        exporters: Arc<dyn ObjectStore<CephNFS>>,
        services: Arc<dyn ObjectStore<Service>>,
        scheme: OwnerScheme,
        config: Arc<AppConfig>,
    ) -> Self {
        Orchestrator::new(vec![
            Box::new(SubResourceReconciler::<CephBlockPool>::new(pools, scheme.clone(), config.clone())),
            Box::new(SubResourceReconciler::<CephNFS>::new(exporters, scheme.clone(), config.clone())),
            Box::new(SubResourceReconciler::<Service>::new(services, scheme, config)),
        ])
    }

    /// The kinds managed, in creation order
    #[cfg(test)]
    pub fn kinds(&self) -> Vec<String> {
        self.managers.iter().map(|manager| manager.kind_name()).collect()
    }

    /// Ensure every managed resource matches the StorageCluster
    ///
    /// # Arguments
    /// * `cluster` - The StorageCluster hub
    ///
    /// # Returns
    /// The combined requeue hint, or the first error encountered
    pub async fn ensure_created(&self, cluster: &StorageCluster) -> Result<RequeueHint> {
        let mut hint = RequeueHint::done();

        for manager in self.managers.iter().rev().filter(|manager| !manager.should_exist(cluster)) {
            hint = hint.merge(manager.ensure_deleted(cluster).await?);
        }

        for manager in self.managers.iter().filter(|manager| manager.should_exist(cluster)) {
            hint = hint.merge(manager.ensure_created(cluster).await?);
        }

        Ok(hint)
    }

    /// Ensure every managed resource is gone, in reverse creation order
    pub async fn ensure_deleted(&self, cluster: &StorageCluster) -> Result<RequeueHint> {
        let mut hint = RequeueHint::done();

        for manager in self.managers.iter().rev() {
            hint = hint.merge(manager.ensure_deleted(cluster).await?);
        }

        Ok(hint)
    }
}
