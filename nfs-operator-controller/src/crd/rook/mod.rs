//! Client-side types for the Rook custom resources the operator manages.
//!
//! Only the fields the operator sets are modelled. The CRDs themselves are
//! installed by Rook, so these types are never part of `generate_crds`.

pub mod common;
pub mod nfs;
pub mod pool;
