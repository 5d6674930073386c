//! rulepatch - turn static-analysis rule fixes into pull-request-ready patches.
//!
//! Given a target commit and a list of rule ids, each rule is applied by an
//! external repair tool on a fresh checkout, the fixed files are committed,
//! and the commit's diff becomes a patch record and optionally a PR.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod error;
pub mod history;
pub mod orchestrator;
pub mod ports;

#[cfg(test)]
mod test_support;

pub use orchestrator::{RepairOrchestrator, RunSettings};
