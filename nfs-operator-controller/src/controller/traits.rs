use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;

use nfs_operator_common::config::AppConfig;

use crate::crd::{ManagedResource, hub::traits::Hub};

// Trait to get a Resource from a Hub CustomResourceDefinition
pub trait FromHub<T>
where
    T: Hub,
{
    fn from_hub(hub: &T, name: &str, namespace: &str, owner_ref: OwnerReference, config: &AppConfig) -> Self;
}

// Trait to detect if a child Resource has drifted from another instance
// of the same Resource, where Resource has implemented the FromHub trait,
// and to fold the fields the operator owns back into the live instance
pub trait ResourceDrift<T>
where
    T: Hub,
{
    fn has_drifted(&self, other: &Self) -> bool;

    // Copy the operator-owned fields of `desired` into `self`, leaving anything
    // the API server or other controllers manage untouched
    fn merge_from(&mut self, desired: Self);
}

// A Resource the operator creates on behalf of a Hub, and the policy deciding
// whether it should currently exist
pub trait SubResource<T>: FromHub<T> + ResourceDrift<T> + ManagedResource
where
    T: Hub,
{
    // Suffix appended to the parent name to form the object name
    const NAME_SUFFIX: &'static str;

    fn should_exist(hub: &T) -> bool;
}
