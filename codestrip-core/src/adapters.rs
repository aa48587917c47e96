//! Default filesystem-backed port implementations.

use crate::ports::{ProgressPort, SourcePort, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use codestrip_render::render_progress;
use codestrip_types::progress::ProgressEvent;
use std::collections::BTreeMap;
use std::io;
use std::sync::Mutex;
use tracing::debug;

/// Reads UTF-8 sources from disk.
#[derive(Debug, Clone, Default)]
pub struct FsSourcePort;

impl SourcePort for FsSourcePort {
    fn read_source(&self, path: &Utf8Path) -> anyhow::Result<Option<String>> {
        match fs_err::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = path.as_str(), "source does not exist");
                Ok(None)
            }
            Err(err) => Err(err).with_context(|| format!("read {}", path)),
        }
    }
}

/// Filesystem write operations. Targets are fully overwritten.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs_err::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs_err::write(path, contents).with_context(|| format!("write {}", path))
    }
}

/// Prints each event to stdout with its status icon.
#[derive(Debug, Clone, Default)]
pub struct ConsoleProgress;

impl ProgressPort for ConsoleProgress {
    fn emit(&self, event: ProgressEvent) {
        println!("{}", render_progress(&event));
    }
}

/// In-memory sources for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    files: BTreeMap<Utf8PathBuf, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> Self {
        self.files.insert(path.into(), text.into());
        self
    }
}

impl SourcePort for InMemorySource {
    fn read_source(&self, path: &Utf8Path) -> anyhow::Result<Option<String>> {
        Ok(self.files.get(path).cloned())
    }
}

/// Collects events instead of printing them.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl ProgressPort for RecordingProgress {
    fn emit(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
