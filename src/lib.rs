//! Cycle prediction and symptom scoring for a personal health tracker.
//!
//! Every function here is pure over caller-supplied history: nothing is
//! persisted, inputs are never mutated, and malformed entries degrade to
//! safe defaults instead of errors.

pub mod aggregate;
pub mod cycle;
pub mod error;
pub mod import;
pub mod markers;
pub mod models;
pub mod report;
pub mod smi;
pub mod wellness;
