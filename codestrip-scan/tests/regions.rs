//! Region-finding tests over realistic script fragments.

use codestrip_scan::{Scan, SpanKind, expand_to_lines};
use codestrip_types::rule::ArtifactKind;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn matching_close_skips_nested_blocks() {
    let text = "function f() { if (x) { return 1; } return 2; }";
    let scan = Scan::script(text);
    let open = text.find('{').unwrap();
    let close = scan.matching_close(open).expect("close");
    assert_eq!(close, text.len() - 1);
}

#[test]
fn matching_close_ignores_braces_in_literals_and_comments() {
    let text = "{ const s = '}'; /* } */ const t = `${'}'}`; // }\n const r = /}/; }";
    let scan = Scan::script(text);
    assert_eq!(scan.matching_close(0), Some(text.len() - 1));
}

#[test]
fn matching_close_rejects_non_delimiters() {
    let scan = Scan::script("a '{' b");
    assert_eq!(scan.matching_close(0), None);
    assert_eq!(scan.matching_close(3), None);
}

#[test]
fn unbalanced_block_has_no_close() {
    let scan = Scan::script("if (a) { b(); ");
    assert_eq!(scan.block_after(0), None);
}

#[test]
fn block_after_skips_parenthesised_braces() {
    let text = "if (check({ strict: true })) { go(); } rest();";
    let scan = Scan::script(text);
    let (open, close) = scan.block_after(0).expect("block");
    assert_eq!(&text[open..=close], "{ go(); }");
}

#[test]
fn block_after_stops_at_statement_end() {
    let scan = Scan::script("const x = 1; { other(); }");
    assert_eq!(scan.block_after(0), None);
}

#[test]
fn find_token_respects_identifier_boundaries() {
    let text = "fooBar(); foo(); x.foo(); // foo\nfoo";
    let scan = Scan::script(text);
    let first = scan.find_token("foo", 0).expect("first");
    assert_eq!(first, text.find("foo(); x").unwrap());
    let second = scan.find_token("foo", first + 1).expect("second");
    assert_eq!(second, text.len() - 3);
    assert_eq!(scan.find_token("foo", second + 1), None);
}

#[test]
fn find_code_skips_strings() {
    let text = "log('let a = 1'); let a = 1;";
    let scan = Scan::script(text);
    assert_eq!(scan.find_code("let a = 1", 0), Some(text.rfind("let a").unwrap()));
}

#[test]
fn statement_end_follows_semicolons_and_depth() {
    let text = "app.post('/x', (req, res) => {\n  if (a) { b(); }\n  res.send(1);\n});\nnext();";
    let scan = Scan::script(text);
    let end = scan.statement_end(0);
    assert_eq!(&text[..end], "app.post('/x', (req, res) => {\n  if (a) { b(); }\n  res.send(1);\n});");
}

#[test]
fn statement_end_uses_newline_without_semicolon() {
    let text = "const a = require('a')\nconst b = 2\n";
    let scan = Scan::script(text);
    assert_eq!(&text[..scan.statement_end(0)], "const a = require('a')");
}

#[test]
fn statement_end_continues_method_chains() {
    let text = "billing.start()\n  .then(done)\n  .catch(fail)\nother()";
    let scan = Scan::script(text);
    assert_eq!(
        &text[..scan.statement_end(0)],
        "billing.start()\n  .then(done)\n  .catch(fail)"
    );
}

#[test]
fn statement_end_stops_before_enclosing_brace() {
    let text = "{ billing.sync() }";
    let scan = Scan::script(text);
    let start = text.find("billing").unwrap();
    assert_eq!(&text[start..scan.statement_end(start)], "billing.sync() ");
}

#[test]
fn entry_end_consumes_trailing_comma() {
    let text = "{\n  key: { a: 1, b: 2 },\n  other: 3\n}";
    let scan = Scan::script(text);
    let start = text.find("key").unwrap();
    let end = scan.expression_end(start, b",;");
    assert_eq!(end.terminator, Some(b','));
    assert_eq!(&text[start..end.end], "key: { a: 1, b: 2 },");
}

#[test]
fn string_values_are_unquoted() {
    let scan = Scan::script("import x from \"stripe\"; require('./svc')");
    let values: Vec<&str> = scan.strings().map(|(_, v)| v).collect();
    assert_eq!(values, vec!["stripe", "./svc"]);
}

#[test]
fn markup_is_all_code() {
    let text = "<!-- START -->\n<div>{</div>\n<!-- END -->";
    let scan = Scan::new(text, ArtifactKind::Markup);
    assert_eq!(scan.spans().len(), 1);
    assert_eq!(scan.find_code("<!-- END -->", 0), text.find("<!-- END"));
}

#[test]
fn expand_to_lines_removes_region_lines() {
    let text = "a();\n  if (x) {\n    y();\n  }\nb();\n";
    let start = text.find("if").unwrap();
    let end = text.find("  }\n").unwrap() + 3;
    let (s, e) = expand_to_lines(text, start, end);
    assert_eq!(format!("{}{}", &text[..s], &text[e..]), "a();\nb();\n");
}

#[test]
fn prev_token_skips_comments_and_reports_literal_ends() {
    let text = "a = 'x' /* c */ // d\n  b";
    let scan = Scan::script(text);
    let b = text.rfind('b').unwrap();
    assert_eq!(scan.prev_token(b), Some((text.find("' ").unwrap(), b'\'')));
    assert_eq!(scan.prev_token(0), None);
}

#[test]
fn matching_open_mirrors_matching_close() {
    let text = "if (f(a, [b]) && '(') { x(); }";
    let scan = Scan::script(text);
    let open = text.find('(').unwrap();
    let close = scan.matching_close(open).expect("close");
    assert_eq!(scan.matching_open(close), Some(open));
    assert_eq!(scan.matching_open(open), None);
}

#[test]
fn statement_starts() {
    let cases = [
        ("x();", true),
        ("a();\nx();", true),
        ("f() {\n  x();", true),
        ("}\nx();", true),
        ("setup()\nx();", true),
        ("const a =\n  x();", false),
        ("list.map((i) =>\n  x(i));", false),
        ("call(a,\n  x());", false),
        ("if (ok) x();", false),
        ("if (ok)\n  x();", false),
        ("for (;;)\n  x();", false),
        ("else\n  x();", false),
        ("return y; // done\nx();", true),
    ];
    for (text, expected) in cases {
        let scan = Scan::script(text);
        let pos = text.rfind("x(").unwrap();
        assert_eq!(scan.starts_statement(pos), expected, "{text:?}");
    }
}

#[test]
fn find_comment_matches_comment_starts_only() {
    let text = "s = '// MARK';\n// MARK here\n";
    let scan = Scan::script(text);
    assert_eq!(scan.find_comment("// MARK", 0), text.find("// MARK here"));
    assert_eq!(scan.find_code("// MARK", 0), None);
}

proptest! {
    #[test]
    fn lex_covers_arbitrary_input(text in "[a-z{}()\\[\\]'\"`/*\\\\ \n;=$]{0,64}") {
        let spans = Scan::script(&text).spans().to_vec();
        let mut cursor = 0;
        for span in &spans {
            prop_assert_eq!(span.start, cursor);
            prop_assert!(span.end > span.start);
            cursor = span.end;
        }
        prop_assert_eq!(cursor, text.len());
    }

    #[test]
    fn matching_close_lands_on_code_closer(body in "[a-z;{}() ]{0,32}") {
        let text = format!("{{{body}}}");
        let scan = Scan::script(&text);
        if let Some(close) = scan.matching_close(0) {
            prop_assert!(
                matches!(text.as_bytes()[close], b'}' | b')' | b']'),
                "byte at close index is not a closing delimiter"
            );
            prop_assert!(scan.span_at(close).is_some_and(|s| s.kind == SpanKind::Code));
        }
    }
}
