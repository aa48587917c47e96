use serde::{Deserialize, Serialize};

/// The syntax family a rule set is applied to.
///
/// - script: brace-delimited code (JavaScript-like); matching skips strings,
///   comments, template literals and regex literals
/// - markup: HTML-like text; matched as plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Script,
    Markup,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Script => "script",
            ArtifactKind::Markup => "markup",
        }
    }
}

/// How many occurrences of a rule's target are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchScope {
    First,
    All,
}

/// End of a `delete_region` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionEnd {
    /// The brace block opened by the first `{` after the start pattern,
    /// plus any `else` chain that follows it.
    Block,
    /// An explicit end marker, removed together with the region.
    Marker(String),
}

pub const DEFAULT_ROUTE_METHODS: &[&str] = &["get", "post", "put", "patch", "delete", "all", "use"];

fn default_route_methods() -> Vec<String> {
    DEFAULT_ROUTE_METHODS.iter().map(|m| m.to_string()).collect()
}

/// What a rule matches and how it rewrites the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleKind {
    /// Replace an exact literal (usually a flag assignment).
    ReplaceLiteral { find: String, replace: String },

    /// Remove everything from `start` through `end`.
    DeleteRegion { start: String, end: RegionEnd },

    /// Keep a function's signature, swap its body for `body` (a full `{ ... }` block).
    ReplaceFunctionBody { signature: String, body: String },

    /// Remove `import`/`require` bindings of `module`.
    StripDeclaration { module: String },

    /// Remove `receiver.method('<path_prefix>...', ...)` registrations.
    StripRouteRegistration {
        receiver: String,
        path_prefix: String,
        #[serde(default = "default_route_methods")]
        methods: Vec<String>,
    },

    /// Remove `key: value,` entries.
    StripConfigField { key: String },

    /// Remove statements that start with `prefix` (optionally after `await`).
    StripStatement { prefix: String },
}

impl RuleKind {
    /// Scope used when a rule does not set one explicitly.
    pub fn default_scope(&self) -> MatchScope {
        match self {
            RuleKind::ReplaceLiteral { .. } | RuleKind::ReplaceFunctionBody { .. } => {
                MatchScope::First
            }
            RuleKind::DeleteRegion { .. }
            | RuleKind::StripDeclaration { .. }
            | RuleKind::StripRouteRegistration { .. }
            | RuleKind::StripConfigField { .. }
            | RuleKind::StripStatement { .. } => MatchScope::All,
        }
    }

    /// Stable snake_case label, matching the serialized `type` tag.
    pub fn label(&self) -> &'static str {
        match self {
            RuleKind::ReplaceLiteral { .. } => "replace_literal",
            RuleKind::DeleteRegion { .. } => "delete_region",
            RuleKind::ReplaceFunctionBody { .. } => "replace_function_body",
            RuleKind::StripDeclaration { .. } => "strip_declaration",
            RuleKind::StripRouteRegistration { .. } => "strip_route_registration",
            RuleKind::StripConfigField { .. } => "strip_config_field",
            RuleKind::StripStatement { .. } => "strip_statement",
        }
    }
}

/// A single pure text transformation with a stated intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub intent: String,

    #[serde(flatten)]
    pub kind: RuleKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<MatchScope>,

    /// When set, a run that leaves this rule unmatched is a policy block.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub required: bool,
}

impl Rule {
    pub fn new(id: impl Into<String>, intent: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            id: id.into(),
            intent: intent.into(),
            kind,
            scope: None,
            required: false,
        }
    }

    pub fn with_scope(mut self, scope: MatchScope) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn effective_scope(&self) -> MatchScope {
        self.scope.unwrap_or_else(|| self.kind.default_scope())
    }
}

/// Ordered rules bound to one artifact kind. Later rules see the output of
/// earlier ones, so declaration order is part of the contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default = "default_ruleset_schema")]
    pub schema: String,

    pub name: String,

    pub kind: ArtifactKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub rules: Vec<Rule>,
}

fn default_ruleset_schema() -> String {
    crate::schema::CODESTRIP_RULESET_V1.to_string()
}

impl RuleSet {
    pub fn new(name: impl Into<String>, kind: ArtifactKind, rules: Vec<Rule>) -> Self {
        Self {
            schema: default_ruleset_schema(),
            name: name.into(),
            kind,
            description: None,
            rules,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }
}
