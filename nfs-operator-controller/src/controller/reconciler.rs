use async_trait::async_trait;
use kube::ResourceExt;
use std::marker::PhantomData;
use std::sync::Arc;

use nfs_operator_common::config::AppConfig;
use nfs_operator_common::telemetry::{debug, info, warn};

use crate::controller::{
    naming::derive_name,
    orchestrator::ResourceManager,
    owner::OwnerScheme,
    requeue::RequeueHint,
    store::ObjectStore,
    traits::{ResourceDrift, SubResource},
    utils::labels_drifted,
};
use crate::crd::hub::storagecluster::StorageCluster;
use crate::error::{ControllerError, Result};


/// Converges one kind of managed resource for a StorageCluster.
///
/// Every call is a single pass: it reads, acts at most once, and returns. Work
/// that cannot finish within the pass (a deletion the API server completes
/// asynchronously, a resource that is still terminating) is reported back as an
/// error carrying a requeue hint instead of being waited on.
pub struct SubResourceReconciler<K>
where
    K: SubResource<StorageCluster>,
{
    store: Arc<dyn ObjectStore<K>>,
    scheme: OwnerScheme,
    config: Arc<AppConfig>,
    _kind: PhantomData<fn() -> K>,
}

impl<K> SubResourceReconciler<K>
where
    K: SubResource<StorageCluster>,
{
    pub fn new(store: Arc<dyn ObjectStore<K>>, scheme: OwnerScheme, config: Arc<AppConfig>) -> Self {
        SubResourceReconciler {
            store,
            scheme,
            config,
            _kind: PhantomData,
        }
    }

    pub fn kind_name() -> String {
        K::kind(&()).to_string()
    }

    /// The name of the managed resource for a StorageCluster
    pub fn name_for(cluster: &StorageCluster) -> Result<String> {
        let parent = cluster.metadata.name.as_deref().ok_or(
            ControllerError::MissingObjectKeyError("Expected StorageCluster to have metadata.name")
        )?;

        Ok(derive_name(parent, K::NAME_SUFFIX))
    }

    fn namespace_of(cluster: &StorageCluster) -> Result<&str> {
        cluster.metadata.namespace.as_deref().ok_or(
            ControllerError::MissingObjectKeyError("Expected StorageCluster to be namespaced via metadata.namespace")
        )
    }

    /// Build the desired managed resource for a StorageCluster
    ///
    /// # Arguments
    /// * `cluster` - The StorageCluster hub
    ///
    /// # Returns
    /// The desired object, or an error if the StorageCluster cannot be referenced as
    /// an owner yet
    pub fn desired(&self, cluster: &StorageCluster) -> Result<K> {
        let name = Self::name_for(cluster)?;
        let namespace = Self::namespace_of(cluster)?;
        let owner_ref = self.scheme.controller_ref(&cluster.metadata)?;

        Ok(K::from_hub(cluster, &name, namespace, owner_ref, &self.config))
    }

    /// Ensure the managed resource exists in its desired state, or is absent if the
    /// StorageCluster no longer wants it
    pub async fn ensure_created(&self, cluster: &StorageCluster) -> Result<RequeueHint> {
        if !K::should_exist(cluster) {
            return self.ensure_deleted(cluster).await;
        }

        let kind = Self::kind_name();
        let desired = self.desired(cluster)?;
        let name = desired.name_any();
        let namespace = Self::namespace_of(cluster)?;

        match self.store.get(namespace, &name).await? {
            None => {
                info!(
                    event = "CreatingResource",
                    kind = kind.as_str(),
                    name = name.as_str(),
                    namespace = namespace,
                );
                self.store.create(namespace, &desired).await?;
            },
            Some(live) if live.meta().deletion_timestamp.is_some() => {
                warn!(
                    event = "ResourcePendingDeletion",
                    kind = kind.as_str(),
                    name = name.as_str(),
                    namespace = namespace,
                );
                return Err(ControllerError::PendingDeletionError { kind, name });
            },
            Some(mut live) => {
                if !has_drifted(&live, &desired) {
                    debug!(
                        event = "ResourceInSync",
                        kind = kind.as_str(),
                        name = name.as_str(),
                        namespace = namespace,
                    );
                    return Ok(RequeueHint::done());
                }

                info!(
                    event = "UpdatingResource",
                    kind = kind.as_str(),
                    name = name.as_str(),
                    namespace = namespace,
                );
                merge(&mut live, desired);
                self.store.replace(namespace, &name, &live).await?;
            },
        }

        Ok(RequeueHint::done())
    }

    /// Ensure the managed resource is gone
    ///
    /// Issues at most one delete, then reads the object back once. An object that is
    /// still present afterwards is reported as still deleting.
    pub async fn ensure_deleted(&self, cluster: &StorageCluster) -> Result<RequeueHint> {
        let kind = Self::kind_name();
        let name = Self::name_for(cluster)?;
        let namespace = Self::namespace_of(cluster)?;

        let live = match self.store.get(namespace, &name).await? {
            Some(live) => live,
            None => {
                debug!(
                    event = "ResourceNotFound",
                    kind = kind.as_str(),
                    name = name.as_str(),
                    namespace = namespace,
                );
                return Ok(RequeueHint::done());
            },
        };

        if live.meta().deletion_timestamp.is_none() {
            info!(
                event = "DeletingResource",
                kind = kind.as_str(),
                name = name.as_str(),
                namespace = namespace,
            );
            match self.store.delete(namespace, &name).await {
                Ok(()) => {},
                // Removed between the read and the delete, the read-back confirms it
                Err(e) if e.is_not_found() => debug!(
                    event = "ResourceAlreadyDeleted",
                    kind = kind.as_str(),
                    name = name.as_str(),
                    namespace = namespace,
                ),
                Err(e) => return Err(e),
            }
        }

        // A failed read-back is a transient error, not evidence the object is still there
        match self.store.get(namespace, &name).await? {
            None => {
                info!(
                    event = "ResourceDeleted",
                    kind = kind.as_str(),
                    name = name.as_str(),
                    namespace = namespace,
                );
                Ok(RequeueHint::done())
            },
            Some(_) => {
                info!(
                    event = "WaitingForDeletion",
                    kind = kind.as_str(),
                    name = name.as_str(),
                    namespace = namespace,
                );
                Err(ControllerError::StillDeletingError { kind, name })
            },
        }
    }
}

#[async_trait]
impl<K> ResourceManager for SubResourceReconciler<K>
where
    K: SubResource<StorageCluster>,
{
    fn kind_name(&self) -> String {
        Self::kind_name()
    }

    fn should_exist(&self, cluster: &StorageCluster) -> bool {
        K::should_exist(cluster)
    }

    async fn ensure_created(&self, cluster: &StorageCluster) -> Result<RequeueHint> {
        SubResourceReconciler::ensure_created(self, cluster).await
    }

    async fn ensure_deleted(&self, cluster: &StorageCluster) -> Result<RequeueHint> {
        SubResourceReconciler::ensure_deleted(self, cluster).await
    }
}

/// Whether the live object differs from the desired one in anything the operator owns
fn has_drifted<K>(live: &K, desired: &K) -> bool
where
    K: SubResource<StorageCluster>,
{
    live.owner_references() != desired.owner_references()
        || labels_drifted(live.labels(), desired.labels())
        || ResourceDrift::<StorageCluster>::has_drifted(live, desired)
}

/// Fold the desired object into the live one, keeping server-managed metadata
/// such as the resourceVersion the replace is conditioned on
fn merge<K>(live: &mut K, desired: K)
where
    K: SubResource<StorageCluster>,
{
    live.meta_mut().owner_references = desired.meta().owner_references.clone();
    live.labels_mut().extend(desired.labels().clone());
    ResourceDrift::<StorageCluster>::merge_from(live, desired);
}
