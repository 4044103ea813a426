// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use std::result;
use thiserror::Error;

use nfs_operator_common::config::ControllerConfig;

use crate::controller::requeue::RequeueHint;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("kubernetes api error: {0}")]
    KubeError(#[from] kube::Error),
    #[error("object store error: {0}")]
    StoreError(String),
    #[error("object not found: {0}")]
    NotFoundError(String),
    #[error("missing object key: {0}")]
    MissingObjectKeyError(&'static str),
    #[error("failed to restore {kind} {name} because it is marked for deletion")]
    PendingDeletionError { kind: String, name: String },
    #[error("waiting for {kind} {name} to be deleted")]
    StillDeletingError { kind: String, name: String },
    #[error("controller state is not configured")]
    MissingStateError,
    #[error("finalizer error: {0}")]
    FinalizerError(String),
    #[error("unknown error: {0}")]
    UnknownError(String),
}

impl ControllerError {
    /// Whether the error is the expected "deletion still in progress" signal rather
    /// than a failure worth alerting on
    pub fn is_still_deleting(&self) -> bool {
        matches!(self, ControllerError::StillDeletingError { .. })
    }

    /// Whether the error means the object is already absent
    pub fn is_not_found(&self) -> bool {
        match self {
            ControllerError::NotFoundError(_) => true,
            ControllerError::KubeError(kube::Error::Api(e)) => e.code == 404,
            _ => false,
        }
    }

    /// Whether retrying the same pass later can succeed without any change to the
    /// StorageCluster spec
    pub fn is_retryable(&self) -> bool {
        !matches!(self, ControllerError::MissingStateError)
    }

    /// The requeue a caller should apply after this error
    pub fn requeue_hint(&self, config: &ControllerConfig) -> RequeueHint {
        match self {
            ControllerError::StillDeletingError { .. } => RequeueHint::after(config.deletion_poll()),
            ControllerError::PendingDeletionError { .. } => RequeueHint::after(config.pending_deletion_requeue()),
            _ => RequeueHint::after(config.error_requeue()),
        }
    }
}

pub type Result<T> = result::Result<T, ControllerError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_error_display_carries_kind_and_name() {
        let err = ControllerError::PendingDeletionError {
            kind: "CephNFS".to_string(),
            name: "ocsinit-cephnfs".to_string(),
        };
        assert_eq!(err.to_string(), "failed to restore CephNFS ocsinit-cephnfs because it is marked for deletion");

        let err = ControllerError::StillDeletingError {
            kind: "Service".to_string(),
            name: "ocsinit-cephnfs-service".to_string(),
        };
        assert_eq!(err.to_string(), "waiting for Service ocsinit-cephnfs-service to be deleted");
    }

    #[test]
    fn test_requeue_hints() {
        let config = ControllerConfig::default();

        let still_deleting = ControllerError::StillDeletingError { kind: "CephNFS".into(), name: "x".into() };
        assert!(still_deleting.is_still_deleting());
        assert_eq!(still_deleting.requeue_hint(&config), RequeueHint::after(Duration::from_secs(5)));

        let pending = ControllerError::PendingDeletionError { kind: "CephNFS".into(), name: "x".into() };
        assert!(!pending.is_still_deleting());
        assert_eq!(pending.requeue_hint(&config), RequeueHint::after(Duration::from_secs(10)));

        let transient = ControllerError::StoreError("connection reset".into());
        assert!(transient.is_retryable());
        assert_eq!(transient.requeue_hint(&config), RequeueHint::after(Duration::from_secs(30)));
    }

    #[test]
    fn test_not_found() {
        let gone = ControllerError::KubeError(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "services \"ocsinit-cephnfs-service\" not found".to_string(),
            reason: "NotFound".to_string(),
            code: 404,
        }));
        assert!(gone.is_not_found());
        assert!(ControllerError::NotFoundError("ocsinit-cephnfs".into()).is_not_found());

        let conflict = ControllerError::KubeError(kube::Error::Api(kube::core::ErrorResponse {
            status: "Failure".to_string(),
            message: "the object has been modified".to_string(),
            reason: "Conflict".to_string(),
            code: 409,
        }));
        assert!(!conflict.is_not_found());
        assert!(!ControllerError::StoreError("connection reset".into()).is_not_found());
    }

    #[test]
    fn test_missing_state_is_not_retryable() {
        assert!(!ControllerError::MissingStateError.is_retryable());
        assert!(ControllerError::MissingObjectKeyError("metadata.uid").is_retryable());
    }
}
