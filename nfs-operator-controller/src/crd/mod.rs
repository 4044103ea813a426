pub mod hub;
pub mod rook;
pub mod utils;
pub mod v1alpha1;

use kube::{Resource, CustomResourceExt, core::object::{HasStatus, HasSpec}};
use k8s_openapi::NamespaceResourceScope;
use schemars::JsonSchema;
use serde::{Serialize, de::DeserializeOwned};
use std::fmt::Debug;

pub trait NamespacedCustomResource:
    Clone
        + Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + CustomResourceExt
        + HasStatus
        + HasSpec
        + JsonSchema
        + DeserializeOwned
        + Serialize
        + Debug
        + Send
        + Sync
        + 'static
{}

impl<T> NamespacedCustomResource for T
where
    T: Clone
        + Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + CustomResourceExt
        + HasStatus
        + HasSpec
        + JsonSchema
        + DeserializeOwned
        + Serialize
        + Debug
        + Send
        + Sync
        + 'static
{}

// Any namespaced object the operator creates on behalf of a StorageCluster,
// whether a core type such as Service or a third party custom resource
pub trait ManagedResource:
    Clone
        + Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + DeserializeOwned
        + Serialize
        + Debug
        + Send
        + Sync
        + 'static
{}

impl<T> ManagedResource for T
where
    T: Clone
        + Resource<Scope = NamespaceResourceScope, DynamicType = ()>
        + DeserializeOwned
        + Serialize
        + Debug
        + Send
        + Sync
        + 'static
{}
