//! DNS module.
//!
//! This module provides the measurement engine:
//! - Timed resolution trials against a specific resolver
//! - Per-pair sampling and per-provider evaluation
//! - Scan orchestration, ranking and progress reporting
//! - Core data types

pub mod evaluator;
pub mod progress;
pub mod sampler;
pub mod scan;
pub mod trial;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use evaluator::ProviderEvaluator;
pub use progress::{render_bar, ProgressBar, ProgressEvent, ScanProgress};
pub use sampler::AddressSampler;
pub use scan::{rank, ScanEvent, ScanState, Scanner};
pub use trial::{run_trial, DirectResolver, Resolve};
pub use types::*;
