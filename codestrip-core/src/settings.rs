//! Clap-free settings for the strip pipelines.

use camino::{Utf8Path, Utf8PathBuf};

pub const DEFAULT_SCRIPT_SOURCE: &str = "original/public/app.js";
pub const DEFAULT_SCRIPT_TARGET: &str = "public/app.js";
pub const DEFAULT_MARKUP_SOURCE: &str = "original/public/index.html";
pub const DEFAULT_MARKUP_TARGET: &str = "public/index.html";
pub const DEFAULT_SERVER_SOURCE: &str = "original/server.js";
pub const DEFAULT_SERVER_TARGET: &str = "server.js";

/// Behaviour shared by every artifact in a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Transform and diff, but write nothing.
    pub dry_run: bool,
    /// Every rule must match at least once or the target is not written.
    pub strict: bool,
}

/// Where one artifact is read from and written to, relative to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub source: Utf8PathBuf,
    pub target: Utf8PathBuf,
}

impl ArtifactPaths {
    pub fn new(source: impl Into<Utf8PathBuf>, target: impl Into<Utf8PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Both paths joined onto `root` (absolute paths are kept as-is).
    pub fn resolve(&self, root: &Utf8Path) -> Self {
        if root.as_str().is_empty() || root.as_str() == "." {
            return self.clone();
        }
        Self {
            source: root.join(&self.source),
            target: root.join(&self.target),
        }
    }
}

/// Settings for the frontend pipeline.
#[derive(Debug, Clone)]
pub struct FrontendSettings {
    pub root: Utf8PathBuf,
    pub script: ArtifactPaths,
    pub markup: ArtifactPaths,
    pub options: RunOptions,
}

impl Default for FrontendSettings {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            script: ArtifactPaths::new(DEFAULT_SCRIPT_SOURCE, DEFAULT_SCRIPT_TARGET),
            markup: ArtifactPaths::new(DEFAULT_MARKUP_SOURCE, DEFAULT_MARKUP_TARGET),
            options: RunOptions::default(),
        }
    }
}

/// Settings for the server pipeline.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub root: Utf8PathBuf,
    pub server: ArtifactPaths,
    pub options: RunOptions,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            root: Utf8PathBuf::from("."),
            server: ArtifactPaths::new(DEFAULT_SERVER_SOURCE, DEFAULT_SERVER_TARGET),
            options: RunOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_relative_and_keeps_absolute() {
        let paths = ArtifactPaths::new("original/server.js", "/srv/server.js");
        let resolved = paths.resolve(Utf8Path::new("repo"));
        assert_eq!(resolved.source, Utf8PathBuf::from("repo/original/server.js"));
        assert_eq!(resolved.target, Utf8PathBuf::from("/srv/server.js"));
        assert_eq!(paths.resolve(Utf8Path::new(".")), paths);
    }

    #[test]
    fn defaults_match_layout() {
        let frontend = FrontendSettings::default();
        assert_eq!(frontend.script.source.as_str(), DEFAULT_SCRIPT_SOURCE);
        assert_eq!(frontend.markup.target.as_str(), DEFAULT_MARKUP_TARGET);
        assert!(!frontend.options.dry_run);
        assert_eq!(ServerSettings::default().server.target.as_str(), DEFAULT_SERVER_TARGET);
    }
}
