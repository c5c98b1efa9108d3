//! YAML reading and a 4-space block-style writer.
//!
//! `serde_yaml` emits 2-space indentation; meta and object blocks are written
//! with 4, so collections are laid out here and only scalars go through
//! `serde_yaml` for quoting.

use serde_yaml::{Mapping, Value};

use super::str::indent;

pub const YAML_INDENT: usize = 4;

/// Parses a YAML document; blank input is `null`.
pub fn parse_yaml(text: &str) -> Result<Value, serde_yaml::Error> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(text)
}

/// Block-style dump ending with a newline.
#[must_use]
pub fn dump_yaml(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Mapping(map) if !map.is_empty() => write_mapping(&mut out, map, 0),
        Value::Sequence(seq) if !seq.is_empty() => write_sequence(&mut out, seq, 0),
        Value::String(s) if s.contains('\n') => {
            let (header, body) = block_scalar(s);
            out.push_str(&header);
            out.push('\n');
            write_block_body(&mut out, body, YAML_INDENT);
        }
        scalar => {
            out.push_str(&scalar_to_yaml(scalar));
            out.push('\n');
        }
    }
    out
}

/// Dump without surrounding whitespace, as used inside object blocks.
#[must_use]
pub fn stringify_yaml(value: &Value) -> String {
    dump_yaml(value).trim().to_string()
}

/// `@name` followed by the indented body. Strings are written as-is, anything
/// else as YAML.
#[must_use]
pub fn to_str_object_block(name: &str, content: &Value) -> String {
    let body = match content {
        Value::String(s) => s.clone(),
        other => stringify_yaml(other),
    };
    format!("@{name}\n{}", indent(&body, YAML_INDENT))
}

fn write_mapping(out: &mut String, map: &Mapping, level: usize) {
    let pad = " ".repeat(level * YAML_INDENT);
    for (key, value) in map {
        let key = scalar_to_yaml(key);
        match value {
            Value::Mapping(inner) if !inner.is_empty() => {
                out.push_str(&format!("{pad}{key}:\n"));
                write_mapping(out, inner, level + 1);
            }
            Value::Sequence(inner) if !inner.is_empty() => {
                out.push_str(&format!("{pad}{key}:\n"));
                write_sequence(out, inner, level + 1);
            }
            Value::String(s) if s.contains('\n') => {
                let (header, body) = block_scalar(s);
                out.push_str(&format!("{pad}{key}: {header}\n"));
                write_block_body(out, body, (level + 1) * YAML_INDENT);
            }
            scalar => out.push_str(&format!("{pad}{key}: {}\n", scalar_to_yaml(scalar))),
        }
    }
}

fn write_sequence(out: &mut String, seq: &[Value], level: usize) {
    let pad = " ".repeat(level * YAML_INDENT);
    for item in seq {
        match item {
            Value::Mapping(_) | Value::Sequence(_) if !is_empty_collection(item) => {
                // Nested collection starts on the dash line; following lines
                // line up with its first key.
                let nested = dump_yaml(item);
                for (i, line) in nested.lines().enumerate() {
                    if i == 0 {
                        out.push_str(&format!("{pad}- {line}\n"));
                    } else if line.is_empty() {
                        out.push('\n');
                    } else {
                        out.push_str(&format!("{pad}  {line}\n"));
                    }
                }
            }
            Value::String(s) if s.contains('\n') => {
                let (header, body) = block_scalar(s);
                out.push_str(&format!("{pad}- {header}\n"));
                write_block_body(out, body, (level + 1) * YAML_INDENT);
            }
            scalar => out.push_str(&format!("{pad}- {}\n", scalar_to_yaml(scalar))),
        }
    }
}

fn is_empty_collection(value: &Value) -> bool {
    match value {
        Value::Mapping(map) => map.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        _ => false,
    }
}

/// Literal block header (`|`, `|-`, `|+`) and the body it introduces.
fn block_scalar(s: &str) -> (String, &str) {
    let (chomp, body) = if s.ends_with("\n\n") {
        ("+", &s[..s.len() - 1])
    } else if let Some(body) = s.strip_suffix('\n') {
        ("", body)
    } else {
        ("-", s)
    };
    // Leading spaces would be read as indentation without an explicit width.
    let width = if body.starts_with(' ') {
        YAML_INDENT.to_string()
    } else {
        String::new()
    };
    (format!("|{width}{chomp}"), body)
}

fn write_block_body(out: &mut String, body: &str, column: usize) {
    let pad = " ".repeat(column);
    for line in body.split('\n') {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(&format!("{pad}{line}\n"));
        }
    }
}

/// Single-line YAML for a scalar (or an empty collection).
#[must_use]
pub fn scalar_to_yaml(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Mapping(map) if map.is_empty() => "{}".to_string(),
        Value::Sequence(seq) if seq.is_empty() => "[]".to_string(),
        Value::String(s) => match serde_yaml::to_string(value) {
            Ok(dumped) if !dumped.trim_end().contains('\n') => dumped.trim_end().to_string(),
            _ => double_quoted(s),
        },
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| "null".to_string()),
    }
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
