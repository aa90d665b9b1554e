//! labwise-export
//!
//! Deterministic JSON / CSV / PDF renderings of an assembled report.
//! Formatters consume the stored, already-derived statuses and never
//! reclassify.

pub mod csv;
pub mod error;
pub mod filename;
pub mod json;
pub mod pdf;
