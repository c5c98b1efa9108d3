use std::borrow::Cow;

/// Drops every `\r` so CRLF and CR line endings read as `\n`.
#[must_use]
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace('\r', ""))
    } else {
        Cow::Borrowed(text)
    }
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Splits a document into raw block texts.
///
/// Blocks are separated by one or more blank lines. A blank run followed by a
/// line starting with a space or `}` does not separate: indented bodies and
/// multi-line meta keep their inner blank lines.
#[must_use]
pub fn text_to_str_blocks(text: &str) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }

    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut blank_run: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if is_blank(line) {
            blank_run.push(line);
            continue;
        }
        if !blank_run.is_empty() {
            if line.starts_with(' ') || line.starts_with('}') {
                current.append(&mut blank_run);
            } else {
                blocks.push(current.join("\n"));
                current.clear();
                blank_run.clear();
            }
        }
        current.push(line);
    }
    blocks.push(current.join("\n"));
    blocks
}

/// First line and the rest (without the separating newline).
#[must_use]
pub fn split_first_line(text: &str) -> (&str, &str) {
    text.split_once('\n').unwrap_or((text, ""))
}

/// Prefixes every non-blank line with `size` spaces.
#[must_use]
pub fn indent(text: &str, size: usize) -> String {
    let pad = " ".repeat(size);
    text.split('\n')
        .map(|line| {
            if is_blank(line) {
                line.to_string()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Removes the indentation shared by all non-blank lines.
#[must_use]
pub fn dedent(text: &str) -> String {
    let common = text
        .split('\n')
        .filter(|line| !is_blank(line))
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.split('\n')
        .map(|line| line.get(common..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parses canonically written integers only: `42` and `-7`, not `007` or `+7`.
#[must_use]
pub fn try_parse_int(text: &str) -> Option<i64> {
    let number: i64 = text.parse().ok()?;
    (number.to_string() == text).then_some(number)
}
