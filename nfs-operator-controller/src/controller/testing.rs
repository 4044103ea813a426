use async_trait::async_trait;
use k8s_openapi::api::core::v1::Service;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{ObjectMeta, Time};
use kube::ResourceExt;
use mockall::mock;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use nfs_operator_common::config::AppConfig;

use crate::controller::{owner::OwnerScheme, store::ObjectStore};
use crate::crd::{
    ManagedResource,
    hub::common::NfsSpec,
    hub::storagecluster::{StorageCluster, StorageClusterSpec},
    v1alpha1::storagecluster::StorageCluster as V1Alpha1StorageCluster,
};
use crate::error::{ControllerError, Result};


pub(crate) fn sample_cluster(name: &str, nfs_enabled: bool) -> StorageCluster {
    StorageCluster {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some("storage".to_string()),
            uid: Some(format!("uid-{}", name)),
            ..Default::default()
        },
        spec: StorageClusterSpec {
            nfs: Some(NfsSpec { enable: nfs_enabled }),
            ..Default::default()
        },
        status: None,
    }
}

pub(crate) fn scheme() -> OwnerScheme {
    OwnerScheme::of::<V1Alpha1StorageCluster>()
}

pub(crate) fn test_config() -> Arc<AppConfig> {
    Arc::new(AppConfig::default())
}

pub(crate) fn deletion_timestamp() -> Time {
    serde_json::from_value(serde_json::json!("2025-01-01T00:00:00Z")).unwrap()
}

/// A request made against a MemoryStore, by object name
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Get(String),
    Create(String),
    Replace(String),
    Delete(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteBehaviour {
    // The object disappears on delete
    Immediate,
    // The object is only marked, as if a finalizer were holding it
    Finalized,
}

/// In-memory ObjectStore that behaves like the API server for the calls the
/// reconcilers make: conditional replace on resourceVersion, not-found as absence,
/// and optionally deletions held back by a finalizer.
pub(crate) struct MemoryStore<K> {
    objects: Mutex<BTreeMap<(String, String), K>>,
    calls: Mutex<Vec<Call>>,
    version: Mutex<u64>,
    delete_behaviour: DeleteBehaviour,
    unavailable: bool,
    journal: Option<Arc<Mutex<Vec<String>>>>,
}

impl<K> MemoryStore<K>
where
    K: ManagedResource,
{
    pub(crate) fn new() -> Self {
        MemoryStore {
            objects: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            version: Mutex::new(0),
            delete_behaviour: DeleteBehaviour::Immediate,
            unavailable: false,
            journal: None,
        }
    }

    /// A store whose deletions only set the deletion timestamp
    pub(crate) fn finalized() -> Self {
        MemoryStore {
            delete_behaviour: DeleteBehaviour::Finalized,
            ..MemoryStore::new()
        }
    }

    /// A store that fails every request
    pub(crate) fn unavailable() -> Self {
        MemoryStore {
            unavailable: true,
            ..MemoryStore::new()
        }
    }

    /// Record every mutation as "<verb> <kind> <name>" in a journal shared
    /// between stores
    pub(crate) fn with_journal(mut self, journal: Arc<Mutex<Vec<String>>>) -> Self {
        self.journal = Some(journal);
        self
    }

    fn key(namespace: &str, name: &str) -> (String, String) {
        (namespace.to_string(), name.to_string())
    }

    fn next_version(&self) -> String {
        let mut version = self.version.lock().unwrap();
        *version += 1;
        version.to_string()
    }

    fn record(&self, call: Call) -> Result<()> {
        if let Some(journal) = &self.journal {
            let entry = match &call {
                Call::Get(_) => None,
                Call::Create(name) => Some(format!("create {} {}", K::kind(&()), name)),
                Call::Replace(name) => Some(format!("replace {} {}", K::kind(&()), name)),
                Call::Delete(name) => Some(format!("delete {} {}", K::kind(&()), name)),
            };
            if let Some(entry) = entry {
                journal.lock().unwrap().push(entry);
            }
        }
        self.calls.lock().unwrap().push(call);

        if self.unavailable {
            return Err(ControllerError::StoreError("store unavailable".to_string()));
        }
        Ok(())
    }

    /// Seed an object as if it had been created by someone else
    pub(crate) fn insert(&self, mut object: K) {
        object.meta_mut().resource_version = Some(self.next_version());
        let namespace = object.namespace().unwrap_or_default();
        self.objects.lock().unwrap().insert(Self::key(&namespace, &object.name_any()), object);
    }

    /// Release a terminating object, as its finalizers would
    pub(crate) fn finalize(&self, namespace: &str, name: &str) {
        self.objects.lock().unwrap().remove(&Self::key(namespace, name));
    }

    pub(crate) fn object(&self, namespace: &str, name: &str) -> Option<K> {
        self.objects.lock().unwrap().get(&Self::key(namespace, name)).cloned()
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of create, replace and delete requests
    pub(crate) fn mutations(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| !matches!(call, Call::Get(_)))
            .count()
    }
}

#[async_trait]
impl<K> ObjectStore<K> for MemoryStore<K>
where
    K: ManagedResource,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>> {
        self.record(Call::Get(name.to_string()))?;
        Ok(self.object(namespace, name))
    }

    async fn create(&self, namespace: &str, object: &K) -> Result<K> {
        let name = object.name_any();
        self.record(Call::Create(name.clone()))?;

        let key = Self::key(namespace, &name);
        if self.objects.lock().unwrap().contains_key(&key) {
            return Err(ControllerError::StoreError(format!("{} already exists", name)));
        }

        let mut created = object.clone();
        created.meta_mut().uid = Some(format!("uid-{}", name));
        created.meta_mut().resource_version = Some(self.next_version());
        self.objects.lock().unwrap().insert(key, created.clone());
        Ok(created)
    }

    async fn replace(&self, namespace: &str, name: &str, object: &K) -> Result<K> {
        self.record(Call::Replace(name.to_string()))?;

        let key = Self::key(namespace, name);
        let current = self.objects.lock().unwrap().get(&key).cloned()
            .ok_or_else(|| ControllerError::StoreError(format!("{} not found", name)))?;
        if current.resource_version() != object.resource_version() {
            return Err(ControllerError::StoreError(format!("conflict replacing {}", name)));
        }

        let mut replaced = object.clone();
        replaced.meta_mut().resource_version = Some(self.next_version());
        self.objects.lock().unwrap().insert(key, replaced.clone());
        Ok(replaced)
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        self.record(Call::Delete(name.to_string()))?;

        let key = Self::key(namespace, name);
        let mut objects = self.objects.lock().unwrap();
        match self.delete_behaviour {
            DeleteBehaviour::Immediate => {
                objects.remove(&key)
                    .ok_or_else(|| ControllerError::NotFoundError(name.to_string()))?;
            },
            DeleteBehaviour::Finalized => {
                let object = objects.get_mut(&key)
                    .ok_or_else(|| ControllerError::NotFoundError(name.to_string()))?;
                object.meta_mut().deletion_timestamp = Some(deletion_timestamp());
            },
        }
        Ok(())
    }
}

mock! {
    pub ServiceStore {}

    #[async_trait]
    impl ObjectStore<Service> for ServiceStore {
        async fn get(&self, namespace: &str, name: &str) -> Result<Option<Service>>;
        async fn create(&self, namespace: &str, object: &Service) -> Result<Service>;
        async fn replace(&self, namespace: &str, name: &str, object: &Service) -> Result<Service>;
        async fn delete(&self, namespace: &str, name: &str) -> Result<()>;
    }
}
