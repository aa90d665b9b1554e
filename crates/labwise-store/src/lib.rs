//! labwise-store
//!
//! PostgREST row operations. Thin wrapper around the hosted store's HTTP
//! API, implementing the collaborator traits from `labwise-core`.

pub mod client;
pub mod interpretations;
pub mod quota;
pub mod reports;
