pub mod context;
pub mod defaults;
pub mod naming;
pub mod orchestrator;
pub mod owner;
pub mod reconciler;
pub mod requeue;
pub mod resources;
pub mod storagecluster;
pub mod store;
pub mod traits;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;
