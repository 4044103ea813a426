use kube::Client;
use std::sync::Arc;

use nfs_operator_common::config::AppConfig;
use nfs_operator_common::state::State;

use crate::error::{ControllerError, Result};

// Context struct to hold the kube client and the state
#[derive(Clone)]
pub struct Context {
    pub client: Client,
    pub state: Option<Arc<State>>,
}

impl Context {
    pub fn new(client: Client) -> Self {
        Self { client, state: None }
    }

    pub fn with_state(mut self, state: Arc<State>) -> Self {
        self.state = Some(state);
        self
    }

    /// The application configuration, or an error if the context was built without state
    pub fn config(&self) -> Result<&AppConfig> {
        self.state
            .as_ref()
            .map(|state| &state.config)
            .ok_or(ControllerError::MissingStateError)
    }
}
