use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};
use kube::Resource;

use crate::error::{ControllerError, Result};


/// The type information needed to point an owner reference at a parent.
///
/// Built once from the served version of the parent custom resource and handed
/// to every sub-resource reconciler, so building a desired object never has to
/// look up type information on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerScheme {
    pub api_version: String,
    pub kind: String,
}

impl OwnerScheme {
    pub fn new(api_version: &str, kind: &str) -> Self {
        OwnerScheme {
            api_version: api_version.to_string(),
            kind: kind.to_string(),
        }
    }

    /// The scheme of a statically typed Kubernetes resource
    pub fn of<T>() -> Self
    where
        T: Resource<DynamicType = ()>,
    {
        OwnerScheme::new(&T::api_version(&()), &T::kind(&()))
    }

    /// Build the controller owner reference for a parent
    ///
    /// # Arguments
    /// * `parent` - The metadata of the parent object
    ///
    /// # Returns
    /// The owner reference, or an error if the parent has not been persisted yet
    /// and therefore has no name or uid to point at
    pub fn controller_ref(&self, parent: &ObjectMeta) -> Result<OwnerReference> {
        let name = parent.name.clone().ok_or(
            ControllerError::MissingObjectKeyError("Expected parent to have metadata.name")
        )?;
        let uid = parent.uid.clone().ok_or(
            ControllerError::MissingObjectKeyError("Expected parent to have metadata.uid")
        )?;

        Ok(OwnerReference {
            api_version: self.api_version.clone(),
            kind: self.kind.clone(),
            name,
            uid,
            controller: Some(true),
            block_owner_deletion: Some(true),
        })
    }
}
