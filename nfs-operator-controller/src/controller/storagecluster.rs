use kube::{
    api::{Api, Patch, PatchParams, ResourceExt},
    runtime::{
        controller::{Action, Controller},
        finalizer::{finalizer, Error as FinalizerError, Event as Finalizer},
        watcher,
    },
};
use k8s_openapi::api::core::v1::Service;
use std::sync::Arc;
use chrono::Utc;
use serde_json::json;

use nfs_operator_common::telemetry::info;

use crate::controller::{
    context::Context, orchestrator::Orchestrator, owner::OwnerScheme, utils::FIELD_MANAGER,
};
use crate::crd::{
    NamespacedCustomResource,
    hub::storagecluster::{StorageCluster, StorageClusterPhase, StorageClusterStatus},
    rook::{nfs::CephNFS, pool::CephBlockPool},
};
use crate::error::{Result, ControllerError};


pub static FINALIZER: &str = "storageclusters.finalizers.nfs-operator.io";

pub struct StorageClusterController;

impl StorageClusterController {
    /// Create a new controller for the StorageCluster resource
    ///
    /// The controller watches StorageClusters and every kind of resource it
    /// manages for them, so a change to an owned object triggers a reconcile of
    /// its owner.
    ///
    /// # Arguments
    /// * `ctx` - The controller context
    ///
    /// # Returns
    /// The controller for the StorageCluster resource
    pub async fn create_controller<T>(ctx: Arc<Context>) -> Controller<T>
    where
        T: NamespacedCustomResource
    {
        let client = ctx.client.clone();
        let cluster = Api::<T>::all(client.clone());

        let pool = Api::<CephBlockPool>::all(client.clone());
        let nfs = Api::<CephNFS>::all(client.clone());
        let service = Api::<Service>::all(client.clone());

        Controller::new(cluster, watcher::Config::default())
            .owns(pool, watcher::Config::default())
            .owns(nfs, watcher::Config::default())
            .owns(service, watcher::Config::default())
    }

    /// Reconcile the StorageCluster resource
    ///
    /// # Arguments
    /// * `cluster` - The StorageCluster resource to reconcile
    /// * `ctx` - The controller context
    ///
    /// # Returns
    /// An action to take after reconciling the StorageCluster resource
    pub async fn reconcile<T>(cluster: Arc<T>, ctx: Arc<Context>) -> Result<Action>
    where
        T: NamespacedCustomResource,
        StorageCluster: From<T>,
    {
        let client = ctx.client.clone();

        let namespace = match cluster.namespace() {
            Some(namespace) => namespace,
            None => return Err(
                ControllerError::MissingObjectKeyError(
                    "Expected StorageCluster to be namespaced via metadata.namespace"
                )
            )
        };

        let config = Arc::new(ctx.config()?.clone());
        let orchestrator = Orchestrator::nfs(client.clone(), OwnerScheme::of::<T>(), config);
        let api = Api::<T>::namespaced(client.clone(), &namespace);

        finalizer(&api, FINALIZER, cluster, |event| async {
            match event {
                Finalizer::Apply(cluster) => reconcile_cluster(&cluster, &ctx, &namespace, &orchestrator).await,
                Finalizer::Cleanup(cluster) => cleanup_cluster(&cluster, &ctx, &namespace, &orchestrator).await,
            }
        })
        .await
        .map_err(|e| match e {
            // Keep the reconcile error typed so the error policy can pick the requeue
            FinalizerError::ApplyFailed(e) | FinalizerError::CleanupFailed(e) => e,
            e => ControllerError::FinalizerError(e.to_string()),
        })
    }
}


/// Reconcile the StorageCluster resource
///
/// Brings every managed resource in line with the StorageCluster, creating,
/// updating or deleting them depending on whether NFS is enabled.
///
/// # Arguments
/// * `cluster` - The StorageCluster resource to reconcile
/// * `ctx` - The controller context
/// * `namespace` - The namespace of the StorageCluster resource
/// * `orchestrator` - The managed resource reconcilers
///
/// # Returns
/// An action to take after reconciling the StorageCluster resource
async fn reconcile_cluster<T>(cluster: &T, ctx: &Context, namespace: &str, orchestrator: &Orchestrator) -> Result<Action>
where
    T: NamespacedCustomResource,
    StorageCluster: From<T>,
{
    let config = ctx.config()?;
    let hub = StorageCluster::from(cluster.clone());

    if hub.status.is_none() {
        info!(
            event = "UpdatingStorageClusterStatus",
            name = cluster.name_any(),
            namespace = namespace,
            phase = StorageClusterPhase::Progressing.to_string(),
        );
        update_status(cluster, ctx, namespace, &StorageClusterPhase::Progressing).await?;
    }

    let hint = orchestrator.ensure_created(&hub).await?;

    if needs_phase_update(hub.status.as_ref(), &StorageClusterPhase::Ready) {
        info!(
            event = "UpdatingStorageClusterStatus",
            name = cluster.name_any(),
            namespace = namespace,
            phase = StorageClusterPhase::Ready.to_string(),
        );
        update_status(cluster, ctx, namespace, &StorageClusterPhase::Ready).await?;
    }

    info!(
        event = "StorageClusterReconciled",
        name = cluster.name_any(),
        namespace = namespace,
        nfs_enabled = hub.nfs_enabled(),
    );

    Ok(hint.into_action(config.controller.requeue_interval()))
}

/// Clean up after the StorageCluster resource
///
/// Removes every managed resource in reverse creation order. The finalizer is
/// only released once all of them are gone.
///
/// # Arguments
/// * `cluster` - The StorageCluster resource to cleanup
/// * `ctx` - The controller context
/// * `namespace` - The namespace of the StorageCluster resource
/// * `orchestrator` - The managed resource reconcilers
///
/// # Returns
/// An action to take after cleaning up the StorageCluster resource
async fn cleanup_cluster<T>(cluster: &T, ctx: &Context, namespace: &str, orchestrator: &Orchestrator) -> Result<Action>
where
    T: NamespacedCustomResource,
    StorageCluster: From<T>,
{
    let hub = StorageCluster::from(cluster.clone());

    if needs_phase_update(hub.status.as_ref(), &StorageClusterPhase::Deleting) {
        update_status(cluster, ctx, namespace, &StorageClusterPhase::Deleting).await?;
    }

    orchestrator.ensure_deleted(&hub).await?;

    info!(
        event = "StorageClusterCleanedUp",
        name = cluster.name_any(),
        namespace = namespace,
    );

    Ok(Action::await_change())
}

/// Whether the recorded status is missing or in a different phase
fn needs_phase_update(status: Option<&StorageClusterStatus>, phase: &StorageClusterPhase) -> bool {
    status.is_none_or(|status| status.phase != phase.to_string())
}

/// Update the status of the StorageCluster resource
///
/// # Arguments
/// * `cluster` - The StorageCluster resource to update
/// * `ctx` - The controller context
/// * `namespace` - The namespace of the StorageCluster resource
/// * `phase` - The phase to set the StorageCluster resource to
///
/// # Returns
/// A result indicating success or failure
async fn update_status<T>(cluster: &T, ctx: &Context, namespace: &str, phase: &StorageClusterPhase) -> Result<()>
where
    T: NamespacedCustomResource,
{
    let api = Api::<T>::namespaced(ctx.client.clone(), namespace);

    api.patch_status(
        &cluster.name_any(),
        &PatchParams::apply(FIELD_MANAGER),
        &Patch::Merge(json!({
            "status": StorageClusterStatus {
                phase: phase.to_string(),
                last_updated: Some(Utc::now()),
            }
        })),
    ).await?;

    Ok(())
}
