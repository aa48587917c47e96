//! Line arithmetic over byte offsets.

/// Offset of the first byte of the line containing `pos`.
pub fn line_start(text: &str, pos: usize) -> usize {
    text[..pos].rfind('\n').map_or(0, |p| p + 1)
}

/// Offset of the `\n` ending the line containing `pos`, or `text.len()`.
pub fn line_end(text: &str, pos: usize) -> usize {
    text[pos..].find('\n').map_or(text.len(), |p| p + pos)
}

/// Offset just past the newline ending the line containing `pos`.
pub fn next_line_start(text: &str, pos: usize) -> usize {
    let end = line_end(text, pos);
    if end < text.len() { end + 1 } else { end }
}

/// Grow a removal range `[start, end)` so it does not leave debris behind.
///
/// When the range owns its lines (only whitespace before `start` on the first
/// line and after `end` on the last), the whole lines are removed including
/// the trailing newline. Otherwise only the horizontal whitespace on the
/// dangling side is absorbed.
pub fn expand_to_lines(text: &str, start: usize, end: usize) -> (usize, usize) {
    let ls = line_start(text, start);
    let le = line_end(text, end);
    let lead_blank = text[ls..start].trim().is_empty();
    let trail_blank = text[end..le].trim().is_empty();

    match (lead_blank, trail_blank) {
        (true, true) => (ls, if le < text.len() { le + 1 } else { le }),
        (true, false) => {
            let rest = &text[end..le];
            let ws = rest.len() - rest.trim_start().len();
            (start, end + ws)
        }
        (false, true) => {
            let before = &text[ls..start];
            let ws = before.len() - before.trim_end().len();
            (start - ws, le)
        }
        (false, false) => (start, end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_bounds() {
        let text = "ab\ncd\nef";
        assert_eq!(line_start(text, 4), 3);
        assert_eq!(line_end(text, 4), 5);
        assert_eq!(next_line_start(text, 4), 6);
        assert_eq!(line_end(text, 7), 8);
        assert_eq!(next_line_start(text, 7), 8);
    }

    #[test]
    fn owned_lines_are_removed_whole() {
        let text = "a\n  drop();\nb\n";
        let start = text.find("drop").unwrap();
        let end = start + "drop();".len();
        let (s, e) = expand_to_lines(text, start, end);
        assert_eq!(format!("{}{}", &text[..s], &text[e..]), "a\nb\n");
    }

    #[test]
    fn shared_line_keeps_neighbours() {
        let text = "keep(); drop();\n";
        let start = text.find("drop").unwrap();
        let (s, e) = expand_to_lines(text, start, text.len() - 1);
        assert_eq!(format!("{}{}", &text[..s], &text[e..]), "keep();\n");

        let text = "drop(); keep();\n";
        let (s, e) = expand_to_lines(text, 0, "drop();".len());
        assert_eq!(format!("{}{}", &text[..s], &text[e..]), "keep();\n");
    }

    #[test]
    fn last_line_without_newline() {
        let text = "a\ndrop();";
        let (s, e) = expand_to_lines(text, 2, text.len());
        assert_eq!(&text[..s], "a\n");
        assert_eq!(e, text.len());
    }
}
