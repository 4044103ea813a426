pub mod common;
pub mod storagecluster;
