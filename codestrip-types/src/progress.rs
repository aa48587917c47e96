//! Progress events emitted while a pipeline runs.
//!
//! Events are rendered into human-readable console lines; they are not a
//! stable machine interface (use the run report for that).

use crate::report::FileReport;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A pipeline is about to process its artifacts.
    Started {
        pipeline: String,
        root: Utf8PathBuf,
        dry_run: bool,
    },
    /// One artifact reached a terminal status.
    File { file: Box<FileReport> },
    /// Dry-run preview of one artifact.
    Patch { target: String, patch: String },
    /// A pipeline finished; pattern rewrites are never guaranteed complete.
    Finished { pipeline: String, targets: Vec<String> },
}
