use kube::{
    api::{Api, DeleteParams, PostParams}, core::response::Status, runtime::controller::Action, Client, Resource
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::fmt::Debug;
use either::Either;
use serde::Serialize;
use serde::de::DeserializeOwned;

use nfs_operator_common::telemetry::{error, warn};

use crate::controller::context::Context;
use crate::error::{ControllerError, Result};

pub static FIELD_MANAGER: &str = "operator.nfs-operator.io";

pub static MANAGED_BY_LABEL: &str = "app.kubernetes.io/managed-by";
pub static PART_OF_LABEL: &str = "app.kubernetes.io/part-of";
pub static COMPONENT_LABEL: &str = "app.kubernetes.io/component";
pub static OPERATOR_NAME: &str = "nfs-operator";


/// Create a new kube client by inferring the kubeconfig from the environment
/// or the default service account
///
/// # Returns
/// A Result containing the kube Client or an error
pub async fn create_k8s_client() -> Result<Client> {
    Client::try_default().await.map_err(ControllerError::from)
}

/// Error policy to log the error and requeue the object
///
/// Deletions that are still in progress are expected and only logged as a warning,
/// and requeued on the short deletion poll interval.
///
/// # Arguments
/// * `_object`: The object that caused the error
/// * `error`: The error that occurred
/// * `ctx`: The context of the controller
///
/// # Returns
/// An Action to requeue the object
pub fn error_policy<T>(_object: Arc<T>, error: &ControllerError, ctx: Arc<Context>) -> Action {
    let config = ctx.config()
        .map(|config| config.controller.clone())
        .unwrap_or_default();

    if error.is_still_deleting() {
        warn!(
            event = "WaitingForDeletion",
            error = %error,
        );
    } else {
        error!(
            event = "Error",
            error = %error,
            retryable = error.is_retryable(),
        );
    }

    error.requeue_hint(&config).into_action(config.error_requeue())
}

fn post_params() -> PostParams {
    PostParams {
        field_manager: Some(FIELD_MANAGER.to_string()),
        ..Default::default()
    }
}

/// Get a Resource, treating not-found as `None`
///
/// # Arguments
/// * `api`: The API client for the resource type
/// * `name`: The name of the object
///
/// # Returns
/// A Result containing the object if it exists or an error
pub async fn get<T>(api: &Api<T>, name: &str) -> Result<Option<T>>
where
    T: Clone + Debug + Serialize + DeserializeOwned + Resource<DynamicType = ()>,
{
    api.get_opt(name).await.map_err(ControllerError::from)
}

/// Create a Resource
///
/// # Arguments
/// * `api`: The API client for the resource type
/// * `obj`: The object to create
///
/// # Returns
/// A Result containing the created object or an error
pub async fn create<T>(api: &Api<T>, obj: &T) -> Result<T>
where
    T: Clone + Debug + Serialize + DeserializeOwned + Resource<DynamicType = ()>,
{
    api.create(&post_params(), obj).await.map_err(ControllerError::from)
}

/// Replace a Resource
///
/// The object must carry the resourceVersion it was read at, so a concurrent
/// write makes the API server reject the replace with a conflict.
///
/// # Arguments
/// * `api`: The API client for the resource type
/// * `name`: The name of the object to replace
/// * `obj`: The full replacement object
///
/// # Returns
/// A Result containing the replaced object or an error
pub async fn replace<T>(api: &Api<T>, name: &str, obj: &T) -> Result<T>
where
    T: Clone + Debug + Serialize + DeserializeOwned + Resource<DynamicType = ()>,
{
    api.replace(name, &post_params(), obj).await.map_err(ControllerError::from)
}

/// Delete a Resource
///
/// # Arguments
/// * `api`: The API client for the resource type
/// * `name`: The name of the object to delete
///
/// # Returns
/// A Result containing either the deleted object or a Status indicating the deletion was successful
pub async fn delete<T>(api: &Api<T>, name: &str) -> Result<Either<T, Status>>
where
    T: Clone + Debug + Serialize + DeserializeOwned + Resource<DynamicType = ()>,
{
    api.delete(
        name,
        &DeleteParams::background()
    ).await.map_err(ControllerError::from)
}

/// Labels put on every object managed for a StorageCluster
///
/// # Arguments
/// * `parent`: The name of the owning StorageCluster
/// * `component`: The component the object belongs to
pub fn managed_labels(parent: &str, component: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (MANAGED_BY_LABEL.to_string(), OPERATOR_NAME.to_string()),
        (PART_OF_LABEL.to_string(), parent.to_string()),
        (COMPONENT_LABEL.to_string(), component.to_string()),
    ])
}

/// Whether any of the desired labels is missing from, or different on, the live labels
pub fn labels_drifted(live: &BTreeMap<String, String>, desired: &BTreeMap<String, String>) -> bool {
    desired.iter().any(|(key, value)| live.get(key) != Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_labels() {
        let labels = managed_labels("ocsinit", "cephnfs");

        assert_eq!(labels.get(MANAGED_BY_LABEL).map(String::as_str), Some("nfs-operator"));
        assert_eq!(labels.get(PART_OF_LABEL).map(String::as_str), Some("ocsinit"));
        assert_eq!(labels.get(COMPONENT_LABEL).map(String::as_str), Some("cephnfs"));
    }

    #[test]
    fn test_extra_live_labels_are_not_drift() {
        let desired = managed_labels("ocsinit", "cephnfs");
        let mut live = desired.clone();
        live.insert("team".to_string(), "storage".to_string());

        assert!(!labels_drifted(&live, &desired));
    }

    #[test]
    fn test_missing_or_changed_labels_are_drift() {
        let desired = managed_labels("ocsinit", "cephnfs");

        assert!(labels_drifted(&BTreeMap::new(), &desired));

        let mut live = desired.clone();
        live.insert(PART_OF_LABEL.to_string(), "other".to_string());
        assert!(labels_drifted(&live, &desired));
    }
}
