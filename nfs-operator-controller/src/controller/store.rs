use async_trait::async_trait;
use kube::{api::Api, Client};
use std::marker::PhantomData;

use crate::controller::utils::{create, delete, get, replace};
use crate::crd::ManagedResource;
use crate::error::{ControllerError, Result};


/// The object store managed resources live in.
///
/// Every call is a single request; not-found on `get` is `Ok(None)` rather than
/// an error so callers can treat absence as a state.
#[async_trait]
pub trait ObjectStore<K>: Send + Sync
where
    K: Send + Sync + 'static,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>>;

    async fn create(&self, namespace: &str, object: &K) -> Result<K>;

    // Replace the object; `object` must carry the resourceVersion it was read at
    async fn replace(&self, namespace: &str, name: &str, object: &K) -> Result<K>;

    // Delete the object; an object that is already gone is reported as
    // `ControllerError::NotFoundError`
    async fn delete(&self, namespace: &str, name: &str) -> Result<()>;
}

/// ObjectStore backed by the Kubernetes API server
pub struct KubeStore<K> {
    client: Client,
    _kind: PhantomData<fn() -> K>,
}

impl<K> KubeStore<K> {
    pub fn new(client: Client) -> Self {
        KubeStore {
            client,
            _kind: PhantomData,
        }
    }
}

impl<K> KubeStore<K>
where
    K: ManagedResource,
{
    fn api(&self, namespace: &str) -> Api<K> {
        Api::<K>::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait]
impl<K> ObjectStore<K> for KubeStore<K>
where
    K: ManagedResource,
{
    async fn get(&self, namespace: &str, name: &str) -> Result<Option<K>> {
        get(&self.api(namespace), name).await
    }

    async fn create(&self, namespace: &str, object: &K) -> Result<K> {
        create(&self.api(namespace), object).await
    }

    async fn replace(&self, namespace: &str, name: &str, object: &K) -> Result<K> {
        replace(&self.api(namespace), name, object).await
    }

    async fn delete(&self, namespace: &str, name: &str) -> Result<()> {
        match delete(&self.api(namespace), name).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => Err(ControllerError::NotFoundError(name.to_string())),
            Err(e) => Err(e),
        }
    }
}
