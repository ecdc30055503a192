//! A provider acceptance test harness.
//!
//! Test groups are generated from a matrix of providers and features, one
//! group per pair, tagged with the component `provider/<provider>/<feature>`.
//! A [`Runner`](runner::Runner) selects the requested components out of that
//! matrix and hands them to an [`ExecutionEngine`](engine::ExecutionEngine),
//! while its registry is published as the process wide
//! [active registry](registry::active).

pub mod config;
pub mod engine;
pub mod error;
pub mod factory;
pub mod formatter;
pub mod group;
pub mod ignore;
pub mod library;
pub mod outcome;
pub mod registry;
pub mod runner;
pub mod selector;

pub mod report;
pub use report::*;

#[cfg(test)]
mod test_support;

pub use config::{HarnessConfig, ProviderConfig};
pub use engine::{ExecutionEngine, RunOptions, SimpleEngine};
pub use error::{HarnessError, RunError};
pub use library::SharedLibrary;
pub use runner::Runner;
