//! labwise-interpret
//!
//! LLM interpretation of assembled reports: prompt construction, response
//! decoding with documented defaults, and the idempotent fetch-or-generate
//! policy.

pub mod client;
pub mod decode;
pub mod error;
pub mod policy;
pub mod prompt;
