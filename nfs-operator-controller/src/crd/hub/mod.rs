pub mod common;
pub mod storagecluster;
pub mod traits;
