//! Port traits abstracting all I/O away from the runner.

use camino::Utf8Path;
use codestrip_types::progress::ProgressEvent;

/// Source artifacts.
pub trait SourcePort {
    /// Full text at `path`, or `None` when nothing exists there.
    fn read_source(&self, path: &Utf8Path) -> anyhow::Result<Option<String>>;
}

/// File-system writes. Implementations create missing parent directories.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
}

/// Receives progress events as artifacts are processed.
pub trait ProgressPort {
    fn emit(&self, event: ProgressEvent);
}

/// The ports a pipeline runs against.
#[derive(Clone, Copy)]
pub struct Ports<'a> {
    pub source: &'a dyn SourcePort,
    pub writer: &'a dyn WritePort,
    pub progress: &'a dyn ProgressPort,
}
