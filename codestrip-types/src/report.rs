use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Machine-readable record of one orchestration run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub pipeline: String,
    pub dry_run: bool,
    pub strict: bool,

    #[serde(default)]
    pub files: Vec<FileReport>,

    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(tool: ToolInfo, pipeline: impl Into<String>, dry_run: bool, strict: bool) -> Self {
        Self {
            schema: crate::schema::CODESTRIP_REPORT_V1.to_string(),
            tool,
            pipeline: pipeline.into(),
            dry_run,
            strict,
            files: vec![],
            summary: RunSummary::default(),
        }
    }

    /// Append a file report and fold it into the summary.
    pub fn push(&mut self, file: FileReport) {
        self.summary.files_total += 1;
        match file.status {
            FileStatus::Written => self.summary.written += 1,
            FileStatus::Previewed => self.summary.previewed += 1,
            FileStatus::Skipped => self.summary.skipped += 1,
            FileStatus::Blocked => self.summary.blocked += 1,
            FileStatus::Missing => self.summary.missing += 1,
        }
        self.summary.rules_unmatched += file.unmatched_rules().count() as u64;
        self.files.push(file);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// Target overwritten with the transformed text.
    Written,
    /// Dry run: transformed but not written.
    Previewed,
    /// Optional source absent; nothing written.
    Skipped,
    /// Strict mode found unmatched rules; nothing written.
    Blocked,
    /// Required source absent; nothing written.
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    pub rule_set: String,
    pub source: String,
    pub target: String,
    pub status: FileStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_before: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256_after: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_before: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bytes_after: Option<u64>,

    #[serde(default)]
    pub changed: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleOutcome>,

    /// Rules whose zero matches blocked the write.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocked_by: Vec<String>,
}

impl FileReport {
    /// A report for a source that was never read.
    pub fn absent(
        rule_set: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        status: FileStatus,
    ) -> Self {
        Self {
            rule_set: rule_set.into(),
            source: source.into(),
            target: target.into(),
            status,
            sha256_before: None,
            sha256_after: None,
            bytes_before: None,
            bytes_after: None,
            changed: false,
            rules: vec![],
            blocked_by: vec![],
        }
    }

    pub fn unmatched_rules(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.rules.iter().filter(|r| r.matches == 0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub rule_id: String,
    pub matches: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub files_total: u64,
    pub written: u64,
    pub previewed: u64,
    pub skipped: u64,
    pub blocked: u64,
    pub missing: u64,
    pub rules_unmatched: u64,
}
