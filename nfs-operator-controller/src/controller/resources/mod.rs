pub mod blockpool;
pub mod cephnfs;
pub mod service;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, OwnerReference};

use crate::controller::utils::managed_labels;


/// Metadata shared by every managed resource: its identity, the single
/// controller owner reference and the operator's labels
pub(crate) fn managed_metadata(name: &str, namespace: &str, owner_ref: OwnerReference, component: &str) -> ObjectMeta {
    ObjectMeta {
        name: Some(name.to_string()),
        namespace: Some(namespace.to_string()),
        labels: Some(managed_labels(&owner_ref.name, component)),
        owner_references: Some(vec![owner_ref]),
        ..Default::default()
    }
}
