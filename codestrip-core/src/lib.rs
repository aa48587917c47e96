//! Embeddable core library for codestrip.
//!
//! Provides a clap-free, I/O-abstracted transform runner and the two strip
//! pipelines, suitable for the standalone binaries or any other host.
//!
//! # Port traits
//!
//! All I/O is abstracted behind port traits in [`ports`]:
//! - [`SourcePort`](ports::SourcePort): read source artifacts
//! - [`WritePort`](ports::WritePort): write targets and reports
//! - [`ProgressPort`](ports::ProgressPort): console progress
//!
//! The [`adapters`] module provides default filesystem and console
//! implementations.
//!
//! # Entry points
//!
//! - [`run`](runner::run): one source through one rule set
//! - [`run_frontend`](pipeline::run_frontend) / [`run_server`](pipeline::run_server)
//! - [`run_artifacts`](pipeline::run_artifacts): any list of artifacts

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod runner;
pub mod settings;

pub use pipeline::{PipelineOutcome, ToolError};
pub use runner::{FileRun, RunOutcome};
