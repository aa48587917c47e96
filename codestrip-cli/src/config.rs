//! Configuration file loading for codestrip.
//!
//! Discovers and loads `codestrip.toml` from the root directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use codestrip_core::settings::{ArtifactPaths, FrontendSettings, RunOptions, ServerSettings};
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "codestrip.toml";

/// Top-level configuration from codestrip.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodestripConfig {
    pub policy: PolicyConfig,
    pub frontend: FrontendConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Every rule must match at least once, or its target is not written.
    pub strict: bool,
}

/// Frontend artifact locations, relative to the root.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontendConfig {
    pub script_source: Option<Utf8PathBuf>,
    pub script_target: Option<Utf8PathBuf>,
    pub markup_source: Option<Utf8PathBuf>,
    pub markup_target: Option<Utf8PathBuf>,
}

/// Server artifact locations, relative to the root.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub source: Option<Utf8PathBuf>,
    pub target: Option<Utf8PathBuf>,
}

/// Discover the codestrip.toml config file.
///
/// Returns `None` if no config file is found.
pub fn discover_config(root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a codestrip.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<CodestripConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<CodestripConfig> {
    let config: CodestripConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the root, or return default if not found.
pub fn load_or_default(root: &Utf8Path) -> anyhow::Result<CodestripConfig> {
    match discover_config(root) {
        Some(path) => load_config(&path),
        None => Ok(CodestripConfig::default()),
    }
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: CodestripConfig,
}

impl ConfigMerger {
    pub fn new(config: CodestripConfig) -> Self {
        Self { config }
    }

    /// `--strict` turns strict mode on; it cannot turn a config `strict = true` off.
    pub fn merge_options(&self, cli_dry_run: bool, cli_strict: bool) -> RunOptions {
        RunOptions {
            dry_run: cli_dry_run,
            strict: cli_strict || self.config.policy.strict,
        }
    }

    pub fn merge_frontend_args(
        self,
        root: &Utf8Path,
        cli_dry_run: bool,
        cli_strict: bool,
    ) -> FrontendSettings {
        let options = self.merge_options(cli_dry_run, cli_strict);
        let defaults = FrontendSettings::default();
        let frontend = self.config.frontend;

        FrontendSettings {
            root: root.to_path_buf(),
            script: ArtifactPaths::new(
                frontend.script_source.unwrap_or(defaults.script.source),
                frontend.script_target.unwrap_or(defaults.script.target),
            ),
            markup: ArtifactPaths::new(
                frontend.markup_source.unwrap_or(defaults.markup.source),
                frontend.markup_target.unwrap_or(defaults.markup.target),
            ),
            options,
        }
    }

    pub fn merge_server_args(
        self,
        root: &Utf8Path,
        cli_dry_run: bool,
        cli_strict: bool,
    ) -> ServerSettings {
        let options = self.merge_options(cli_dry_run, cli_strict);
        let defaults = ServerSettings::default();
        let server = self.config.server;

        ServerSettings {
            root: root.to_path_buf(),
            server: ArtifactPaths::new(
                server.source.unwrap_or(defaults.server.source),
                server.target.unwrap_or(defaults.server.target),
            ),
            options,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codestrip_core::settings::{DEFAULT_MARKUP_SOURCE, DEFAULT_SERVER_TARGET};
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[policy]
strict = true

[frontend]
script_source = "legacy/app.js"
script_target = "dist/app.js"

[server]
source = "legacy/server.js"
target = "dist/server.js"
"#;

        let config = parse_config(contents).unwrap();
        assert!(config.policy.strict);
        assert_eq!(
            config.frontend.script_source.as_deref().map(Utf8Path::as_str),
            Some("legacy/app.js")
        );
        assert!(config.frontend.markup_source.is_none());
        assert_eq!(
            config.server.target.as_deref().map(Utf8Path::as_str),
            Some("dist/server.js")
        );
    }

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert!(!config.policy.strict);
        assert!(config.server.source.is_none());
    }

    #[test]
    fn test_parse_invalid_toml() {
        let err = parse_config("[policy\nstrict = ").unwrap_err();
        assert!(err.to_string().contains("invalid TOML"));
    }

    #[test]
    fn test_merge_frontend_keeps_defaults_for_unset_paths() {
        let config = parse_config("[frontend]\nscript_target = \"dist/app.js\"\n").unwrap();
        let settings =
            ConfigMerger::new(config).merge_frontend_args(Utf8Path::new("site"), true, false);

        assert_eq!(settings.root.as_str(), "site");
        assert_eq!(settings.script.target.as_str(), "dist/app.js");
        assert_eq!(settings.markup.source.as_str(), DEFAULT_MARKUP_SOURCE);
        assert!(settings.options.dry_run);
        assert!(!settings.options.strict);
    }

    #[test]
    fn test_merge_strict_is_ored() {
        let strict_file = parse_config("[policy]\nstrict = true\n").unwrap();
        let settings =
            ConfigMerger::new(strict_file).merge_server_args(Utf8Path::new("."), false, false);
        assert!(settings.options.strict);
        assert_eq!(settings.server.target.as_str(), DEFAULT_SERVER_TARGET);

        let merged = ConfigMerger::new(CodestripConfig::default()).merge_options(false, true);
        assert!(merged.strict);
    }

    #[test]
    fn test_load_or_default_without_file() {
        let temp = TempDir::new().unwrap();
        let root = Utf8Path::from_path(temp.path()).unwrap();
        let config = load_or_default(root).unwrap();
        assert!(!config.policy.strict);
    }

    #[test]
    fn test_load_or_default_reads_file() {
        let temp = TempDir::new().unwrap();
        let root = Utf8Path::from_path(temp.path()).unwrap();
        std::fs::write(
            root.join(CONFIG_FILE_NAME),
            "[server]\nsource = \"backend/index.js\"\n",
        )
        .unwrap();

        let config = load_or_default(root).unwrap();
        assert_eq!(
            config.server.source.as_deref().map(Utf8Path::as_str),
            Some("backend/index.js")
        );
    }

    #[test]
    fn test_load_config_reports_path_on_error() {
        let temp = TempDir::new().unwrap();
        let root = Utf8Path::from_path(temp.path()).unwrap();
        let path = root.join(CONFIG_FILE_NAME);
        std::fs::write(&path, "policy = 3").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(format!("{err:#}").contains(CONFIG_FILE_NAME));
    }
}
