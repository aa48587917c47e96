//! Loading user-authored rule set files for `codestrip run`.

use anyhow::Context;
use camino::Utf8Path;
use codestrip_edit::validate_rule_set;
use codestrip_types::rule::RuleSet;
use codestrip_types::schema::CODESTRIP_RULESET_V1;
use fs_err as fs;

/// Read a rule set from a `.toml` or `.json` file and validate it.
pub fn load_rule_set(path: &Utf8Path) -> anyhow::Result<RuleSet> {
    let contents = fs::read_to_string(path).with_context(|| format!("read rule set {}", path))?;
    parse_rule_set(&contents, path.extension())
        .with_context(|| format!("load rule set {}", path))
}

/// Parse rule set text; JSON when `extension` is `json`, TOML otherwise.
pub fn parse_rule_set(contents: &str, extension: Option<&str>) -> anyhow::Result<RuleSet> {
    let set: RuleSet = match extension {
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(contents).context("invalid JSON")?
        }
        _ => toml::from_str(contents).context("invalid TOML")?,
    };
    if set.schema != CODESTRIP_RULESET_V1 {
        anyhow::bail!(
            "unsupported rule set schema `{}` (expected `{}`)",
            set.schema,
            CODESTRIP_RULESET_V1
        );
    }
    validate_rule_set(&set)?;
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use codestrip_types::rule::ArtifactKind;

    #[test]
    fn parses_toml_rule_set() {
        let set = parse_rule_set(
            r#"
name = "cleanup"
kind = "script"

[[rules]]
id = "billing-calls"
type = "strip_statement"
prefix = "billing."
required = true
"#,
            Some("toml"),
        )
        .unwrap();
        assert_eq!(set.name, "cleanup");
        assert_eq!(set.kind, ArtifactKind::Script);
        assert!(set.rules[0].required);
    }

    #[test]
    fn parses_json_rule_set() {
        let set = parse_rule_set(
            r#"{"name": "page", "kind": "markup", "rules": [
                {"id": "promo", "type": "delete_region", "start": "<!-- A -->", "end": {"marker": "<!-- B -->"}}
            ]}"#,
            Some("JSON"),
        )
        .unwrap();
        assert_eq!(set.kind, ArtifactKind::Markup);
        assert_eq!(set.rules.len(), 1);
    }

    #[test]
    fn rejects_unknown_schema() {
        let err = parse_rule_set(
            "schema = \"codestrip.ruleset.v9\"\nname = \"x\"\nkind = \"script\"\n",
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unsupported rule set schema"));
    }

    #[test]
    fn rejects_invalid_rules() {
        let err = parse_rule_set(
            r#"
name = "x"
kind = "script"

[[rules]]
id = "loop"
type = "replace_literal"
find = "a"
replace = "aa"
"#,
            None,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("replacement contains the pattern"));
    }
}
