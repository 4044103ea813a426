use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::OwnerReference;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::ResourceExt;
use std::collections::BTreeMap;

use nfs_operator_common::config::AppConfig;
use nfs_operator_common::telemetry::warn;

use crate::controller::{
    naming::derive_name,
    resources::managed_metadata,
    traits::{FromHub, ResourceDrift, SubResource},
};
use crate::crd::{hub::storagecluster::StorageCluster, rook::nfs::CephNFS};

pub static NFS_PORT_NAME: &str = "nfs";
pub static NFS_PORT: i32 = 2049;
/// Label rook puts on every NFS-Ganesha pod
pub static NFS_APP_LABEL: &str = "rook-ceph-nfs";


impl FromHub<StorageCluster> for Service {
    /// Create the Service exposing the NFS exporter from a StorageCluster Hub
    ///
    /// The Service selects the pods rook runs for the CephNFS of the same
    /// StorageCluster. With host networking the Service is headless.
    ///
    /// # Arguments
    /// * `cluster` - The StorageCluster to create the Service for
    /// * `name` - The name of the Service resource
    /// * `namespace` - The namespace of the Service resource
    /// * `owner_ref` - The owner reference for the Service resource
    /// * `_config` - The application configuration
    ///
    /// # Returns
    /// The Service resource
    fn from_hub(cluster: &StorageCluster, name: &str, namespace: &str, owner_ref: OwnerReference, _config: &AppConfig) -> Self {
        let exporter = derive_name(&owner_ref.name, <CephNFS as SubResource<StorageCluster>>::NAME_SUFFIX);

        Service {
            metadata: managed_metadata(name, namespace, owner_ref, Self::NAME_SUFFIX),
            spec: Some(ServiceSpec {
                ports: Some(vec![ServicePort {
                    name: Some(NFS_PORT_NAME.to_string()),
                    port: NFS_PORT,
                    protocol: Some("TCP".to_string()),
                    target_port: Some(IntOrString::Int(NFS_PORT)),
                    ..Default::default()
                }]),
                selector: Some(BTreeMap::from([
                    ("app".to_string(), NFS_APP_LABEL.to_string()),
                    ("ceph_nfs".to_string(), exporter),
                ])),
                session_affinity: Some("ClientIP".to_string()),
                cluster_ip: cluster.host_network().then(|| "None".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }
}

impl ResourceDrift<StorageCluster> for Service {
    /// Determine if the Service has drifted from the Service derived from the
    /// StorageCluster
    ///
    /// Only the ports, selector and session affinity are owned by the operator;
    /// the cluster IP is immutable and everything else is defaulted by the API server.
    /// A Service whose headless setting no longer matches is logged, it has to be
    /// deleted for the operator to recreate it.
    ///
    /// # Arguments
    /// * `other` - The desired Service to compare against
    ///
    /// # Returns
    /// Whether the Service has drifted from the desired Service
    fn has_drifted(&self, other: &Self) -> bool {
        let spec = self.spec.as_ref();
        let other_spec = other.spec.as_ref();

        if headless_mismatch(self, other) {
            warn!(
                event = "ServiceHeadlessMismatch",
                name = self.name_any(),
                namespace = self.namespace().unwrap_or_default(),
                headless = is_headless(other),
            );
        }

        // Compare session affinity
        if spec.and_then(|spec| spec.session_affinity.as_deref()).unwrap_or("None")
            != other_spec.and_then(|spec| spec.session_affinity.as_deref()).unwrap_or("None")
        {
            return true;
        }

        // Compare selector labels
        if spec.and_then(|spec| spec.selector.as_ref()) != other_spec.and_then(|spec| spec.selector.as_ref()) {
            return true;
        }

        // Compare ports
        let ports = spec.and_then(|spec| spec.ports.as_deref()).unwrap_or_default();
        let other_ports = other_spec.and_then(|spec| spec.ports.as_deref()).unwrap_or_default();

        ports.len() != other_ports.len()
            || ports.iter().zip(other_ports.iter()).any(|(port, other_port)| ports_differ(port, other_port))
    }

    fn merge_from(&mut self, desired: Self) {
        let desired_spec = desired.spec.unwrap_or_default();

        match self.spec.as_mut() {
            Some(spec) => {
                spec.ports = desired_spec.ports;
                spec.selector = desired_spec.selector;
                spec.session_affinity = desired_spec.session_affinity;
            },
            None => self.spec = Some(desired_spec),
        }
    }
}

impl SubResource<StorageCluster> for Service {
    const NAME_SUFFIX: &'static str = "cephnfs-service";

    fn should_exist(cluster: &StorageCluster) -> bool {
        cluster.nfs_enabled()
    }
}

fn is_headless(service: &Service) -> bool {
    service.spec.as_ref().and_then(|spec| spec.cluster_ip.as_deref()) == Some("None")
}

/// Whether the live Service is headless when the desired one is not, or the
/// other way around. The cluster IP cannot be changed in place.
fn headless_mismatch(live: &Service, desired: &Service) -> bool {
    is_headless(live) != is_headless(desired)
}

// The API server defaults the protocol to TCP and the target port to the port
fn ports_differ(port: &ServicePort, other: &ServicePort) -> bool {
    let target = |port: &ServicePort| port.target_port.clone().unwrap_or(IntOrString::Int(port.port));

    port.port != other.port
        || port.name != other.name
        || target(port) != target(other)
        || port.protocol.as_deref().unwrap_or("TCP") != other.protocol.as_deref().unwrap_or("TCP")
}
