//! Scan engine for jsonsift filter trees.
//!
//! [`FilterEngine`] owns a read-only dataset snapshot plus the two-phase
//! pending/applied filter state, and runs scans either inline or on a worker
//! thread with batched progress reporting. Evaluation semantics live in the
//! `jsonsift` crate; this one only drives them over whole datasets.

pub mod engine;
pub mod error;
pub mod scan;
pub mod task;

pub use engine::FilterEngine;
pub use error::EngineError;
pub use scan::{scan, ScanEvent, ScanOptions, ScanOutcome, ScanProgress};
