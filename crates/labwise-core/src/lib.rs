//! labwise-core
//!
//! Pure domain types, test-result classification, report assembly, and the
//! collaborator seams of the Labwise system. No HTTP dependency; this is
//! the shared vocabulary of the workspace.

pub mod assemble;
pub mod classify;
pub mod error;
pub mod models;
pub mod store;
pub mod submit;
