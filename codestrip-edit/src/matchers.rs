//! One finder per rule kind.
//!
//! Every finder takes a search cursor and returns the next match at or after
//! it as an [`Edit`]. Finders never fail; a candidate whose surroundings do
//! not fit (unbalanced braces, wrong argument, not at the start of a
//! statement) is skipped and the search moves on.

use codestrip_scan::{Scan, expand_to_lines, line_end, line_start};
use codestrip_types::rule::{RegionEnd, RuleKind};

/// Lines walked upward from a module string looking for its `import`/`require` head.
const MAX_DECLARATION_LINES: usize = 64;

const DECLARATION_HEADS: &[&str] = &["import", "export", "const", "let", "var", "require"];

/// Replace `[start, end)` with `replacement`. `anchor` is where the pattern matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub anchor: usize,
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

impl Edit {
    fn delete(anchor: usize, (start, end): (usize, usize)) -> Self {
        Self {
            anchor,
            start,
            end,
            replacement: String::new(),
        }
    }
}

pub(crate) fn next_edit(scan: &Scan<'_>, kind: &RuleKind, from: usize) -> Option<Edit> {
    match kind {
        RuleKind::ReplaceLiteral { find, replace } => replace_literal(scan, find, replace, from),
        RuleKind::DeleteRegion { start, end } => delete_region(scan, start, end, from),
        RuleKind::ReplaceFunctionBody { signature, body } => {
            replace_function_body(scan, signature, body, from)
        }
        RuleKind::StripDeclaration { module } => strip_declaration(scan, module, from),
        RuleKind::StripRouteRegistration {
            receiver,
            path_prefix,
            methods,
        } => strip_route(scan, receiver, path_prefix, methods, from),
        RuleKind::StripConfigField { key } => strip_config_field(scan, key, from),
        RuleKind::StripStatement { prefix } => strip_statement(scan, prefix, from),
    }
}

fn replace_literal(scan: &Scan<'_>, find: &str, replace: &str, from: usize) -> Option<Edit> {
    let pos = scan.find_code(find, from)?;
    Some(Edit {
        anchor: pos,
        start: pos,
        end: pos + find.len(),
        replacement: replace.to_string(),
    })
}

fn delete_region(scan: &Scan<'_>, start: &str, end: &RegionEnd, from: usize) -> Option<Edit> {
    let text = scan.text();
    let mut cursor = from;
    loop {
        let pos = find_marker(scan, start, cursor, true)?;
        let after = pos + start.len();
        let region_end = match end {
            RegionEnd::Marker(marker) => {
                // Without an end marker there is no region; never delete to EOF.
                let m = find_marker(scan, marker, after, false)?;
                Some(m + marker.len())
            }
            RegionEnd::Block => scan
                .block_after(after)
                .map(|(_, close)| else_chain_end(scan, close + 1)),
        };
        if let Some(region_end) = region_end {
            return Some(Edit::delete(pos, expand_to_lines(text, pos, region_end)));
        }
        cursor = after;
    }
}

/// Next occurrence of a region marker, either in code or opening a comment
/// such as `// PAYMENT-START`. `whole_token` applies identifier boundaries
/// to code matches.
fn find_marker(scan: &Scan<'_>, needle: &str, from: usize, whole_token: bool) -> Option<usize> {
    let in_code = if whole_token {
        scan.find_token(needle, from)
    } else {
        scan.find_code(needle, from)
    };
    match (in_code, scan.find_comment(needle, from)) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Extend past any `else` / `else if (...) { }` branches following a block.
fn else_chain_end(scan: &Scan<'_>, mut end: usize) -> usize {
    loop {
        let Some((pos, _)) = scan.next_token(end) else {
            return end;
        };
        if !scan.is_code(pos) || !scan.word_at(pos, "else") {
            return end;
        }
        let after_else = pos + "else".len();
        let branch_end = match scan.next_token(after_else) {
            Some((q, b'{')) => scan.matching_close(q).map(|c| c + 1),
            Some((q, _)) if scan.is_code(q) && scan.word_at(q, "if") => {
                scan.block_after(q + "if".len()).map(|(_, c)| c + 1)
            }
            Some((q, _)) => Some(scan.statement_end(q)),
            None => None,
        };
        match branch_end {
            Some(e) => end = e,
            None => return end,
        }
    }
}

fn replace_function_body(
    scan: &Scan<'_>,
    signature: &str,
    body: &str,
    from: usize,
) -> Option<Edit> {
    let mut cursor = from;
    loop {
        let pos = scan.find_token(signature, cursor)?;
        let after = pos + signature.len();
        if let Some((open, close)) = function_body(scan, after) {
            return Some(Edit {
                anchor: pos,
                start: open,
                end: close + 1,
                replacement: body.to_string(),
            });
        }
        cursor = after;
    }
}

/// Locate `(params) {` / `(params) => {` / `(params): T {` after a signature.
fn function_body(scan: &Scan<'_>, mut pos: usize) -> Option<(usize, usize)> {
    let text = scan.text();
    // Skip what sits between the signature and the parameter list (`= async`, a name).
    let open_paren = loop {
        let (p, c) = scan.next_token(pos)?;
        if !scan.is_code(p) {
            return None;
        }
        match c {
            b'(' => break p,
            b'=' if !text[p..].starts_with("=>") => pos = p + 1,
            _ => pos = p + scan.ident_at(p)?.len(),
        }
    };
    let close_paren = scan.matching_close(open_paren)?;
    let (q, c) = scan.next_token(close_paren + 1)?;
    if !scan.is_code(q) {
        return None;
    }
    let open = match c {
        b'{' => q,
        b'=' if text[q..].starts_with("=>") => match scan.next_token(q + 2)? {
            (b, b'{') if scan.is_code(b) => b,
            _ => return None,
        },
        b':' => scan.block_after(q + 1)?.0,
        _ => return None,
    };
    Some((open, scan.matching_close(open)?))
}

fn strip_declaration(scan: &Scan<'_>, module: &str, from: usize) -> Option<Edit> {
    let text = scan.text();
    scan.strings()
        .filter(|(span, value)| span.start >= from && *value == module)
        .find_map(|(span, _)| {
            let head = declaration_head(scan, span.start)?;
            let lead = text[head..span.start].trim_end();
            let is_specifier = lead.ends_with("from")
                || lead.ends_with("require(")
                || lead.ends_with("import");
            if !is_specifier {
                return None;
            }
            let end = scan.statement_end(head);
            if end < span.end {
                return None;
            }
            Some(Edit::delete(span.start, expand_to_lines(text, head, end)))
        })
}

/// First token of the statement owning the string at `pos`, if that statement
/// starts with a declaration keyword.
fn declaration_head(scan: &Scan<'_>, pos: usize) -> Option<usize> {
    let text = scan.text();
    let mut line = line_start(text, pos);
    for _ in 0..MAX_DECLARATION_LINES {
        if let Some(first) = first_token_on_line(text, line)
            && scan.is_code(first)
            && DECLARATION_HEADS.iter().any(|w| scan.word_at(first, w))
        {
            return Some(first);
        }
        if line == 0 {
            return None;
        }
        let prev = line_start(text, line - 1);
        if text[prev..line - 1].trim_end().ends_with(';') {
            return None;
        }
        line = prev;
    }
    None
}

fn first_token_on_line(text: &str, line: usize) -> Option<usize> {
    let le = line_end(text, line);
    let content = &text[line..le];
    let ws = content.len() - content.trim_start().len();
    (line + ws < le).then_some(line + ws)
}

fn strip_route(
    scan: &Scan<'_>,
    receiver: &str,
    path_prefix: &str,
    methods: &[String],
    from: usize,
) -> Option<Edit> {
    let text = scan.text();
    let mut cursor = from;
    loop {
        let pos = scan.find_token(receiver, cursor)?;
        cursor = pos + receiver.len();
        if !scan.starts_statement(pos) {
            continue;
        }
        if route_path(scan, cursor, methods).is_some_and(|path| path.starts_with(path_prefix)) {
            let end = scan.statement_end(pos);
            return Some(Edit::delete(pos, expand_to_lines(text, pos, end)));
        }
    }
}

/// For `.method('path'` following a receiver, the path literal's contents.
fn route_path<'a>(scan: &Scan<'a>, after_receiver: usize, methods: &[String]) -> Option<&'a str> {
    let (dot, c) = scan.next_token(after_receiver)?;
    if c != b'.' || !scan.is_code(dot) {
        return None;
    }
    let (m, _) = scan.next_token(dot + 1)?;
    let method = scan.ident_at(m)?;
    if !methods.iter().any(|allowed| allowed == method) {
        return None;
    }
    let (paren, c) = scan.next_token(m + method.len())?;
    if c != b'(' || !scan.is_code(paren) {
        return None;
    }
    let (arg, _) = scan.next_token(paren + 1)?;
    scan.string_at(arg)
}

fn strip_config_field(scan: &Scan<'_>, key: &str, from: usize) -> Option<Edit> {
    let text = scan.text();
    let bare = field_key_positions(scan, key, from);
    let quoted = scan
        .strings()
        .filter(|(span, value)| span.start >= from && *value == key)
        .map(|(span, _)| (span.start, span.end));
    let mut candidates: Vec<(usize, usize)> = bare.chain(quoted).collect();
    candidates.sort_unstable();

    candidates.into_iter().find_map(|(pos, key_end)| {
        if first_token_on_line(text, line_start(text, pos)) != Some(pos) {
            return None;
        }
        let (colon, c) = scan.next_token(key_end)?;
        if c != b':' || !scan.is_code(colon) || text[colon..].starts_with("::") {
            return None;
        }
        let end = scan.expression_end(pos, b",").end;
        Some(Edit::delete(pos, expand_to_lines(text, pos, end)))
    })
}

fn field_key_positions<'s>(
    scan: &'s Scan<'_>,
    key: &'s str,
    from: usize,
) -> impl Iterator<Item = (usize, usize)> + 's {
    let mut cursor = from;
    std::iter::from_fn(move || {
        let pos = scan.find_token(key, cursor)?;
        cursor = pos + key.len();
        Some((pos, cursor))
    })
}

fn strip_statement(scan: &Scan<'_>, prefix: &str, from: usize) -> Option<Edit> {
    let text = scan.text();
    let mut cursor = from;
    loop {
        let pos = scan.find_token(prefix, cursor)?;
        cursor = pos + prefix.len();
        let ls = line_start(text, pos);
        let lead = text[ls..pos].trim();
        if lead.is_empty() || lead == "await" {
            let Some(start) = first_token_on_line(text, ls) else {
                continue;
            };
            if !scan.starts_statement(start) {
                continue;
            }
            let end = scan.statement_end(start);
            return Some(Edit::delete(pos, expand_to_lines(text, start, end)));
        }
    }
}
