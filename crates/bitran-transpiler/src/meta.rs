//! Element meta syntax.
//!
//! Inline form, on one line: `{ #id .class +flag -flag key key=value key="a b" }`.
//! Block form, for nested values: a `{` line, an indented YAML mapping, a `}`
//! line. Either form may lead a block; the inline form may also trail an
//! inliner directly.

use std::sync::LazyLock;

use bitran_core::ElementMeta;
use regex::Regex;
use serde_yaml::Value;

use crate::utils::{
    str::{dedent, indent, try_parse_int},
    yaml::{YAML_INDENT, dump_yaml, parse_yaml},
};

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:[^\s"]+|"[^"]*")+"#).expect("meta token regex")
});

static LEADING_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)\A(?:\{(.*)\}\n|\{([\s\S]*?)^\}\n)").expect("leading meta regex")
});

static TRAILING_META: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\A\{([^\n}]+)\}").expect("inline meta regex"));

/// Parses the text between the braces. Multi-line content is YAML and must
/// be a mapping; anything malformed yields empty meta.
#[must_use]
pub fn parse_meta(text: &str) -> ElementMeta {
    if !text.contains('\n') {
        return parse_line_meta(text);
    }
    match parse_yaml(&dedent(text)) {
        Ok(Value::Mapping(mapping)) => ElementMeta::from(mapping),
        Ok(_) => ElementMeta::new(),
        Err(err) => {
            log::debug!("ignoring malformed block meta: {err}");
            ElementMeta::new()
        }
    }
}

/// Parses inline meta tokens.
#[must_use]
pub fn parse_line_meta(text: &str) -> ElementMeta {
    let mut meta = ElementMeta::new();
    for token in TOKEN.find_iter(text).map(|m| m.as_str()) {
        let mut chars = token.chars();
        let first = chars.next();
        let rest = chars.as_str();
        match first {
            Some('#') if !rest.is_empty() => meta.set_id(rest),
            Some('.') if !rest.is_empty() => meta.add_class(rest),
            Some('+') if !rest.is_empty() => {
                meta.insert(rest, true);
            }
            Some('-') if !rest.is_empty() => {
                meta.insert(rest, false);
            }
            // A prefix with nothing after it names nothing.
            Some('#' | '.' | '+' | '-') | None => {}
            Some(_) => match token.split_once('=') {
                None => {
                    meta.insert(token, Value::Null);
                }
                Some(("", _)) => {}
                Some((key, raw)) => {
                    meta.insert(key, parse_value(raw));
                }
            },
        }
    }
    meta
}

fn parse_value(raw: &str) -> Value {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        return Value::String(raw[1..raw.len() - 1].to_string());
    }
    match try_parse_int(raw) {
        Some(number) => Value::Number(number.into()),
        None => Value::String(raw.to_string()),
    }
}

/// Splits a leading meta block off `text`.
///
/// Only the very start of `text` is inspected, and meta that makes up the
/// whole text is left alone. Without meta, returns empty meta and `text`.
#[must_use]
pub fn detach_meta(text: &str) -> (ElementMeta, &str) {
    let Some(captures) = LEADING_META.captures(text) else {
        return (ElementMeta::new(), text);
    };
    let Some(whole) = captures.get(0) else {
        return (ElementMeta::new(), text);
    };
    if whole.end() == text.len() {
        return (ElementMeta::new(), text);
    }
    let content = captures
        .get(1)
        .or_else(|| captures.get(2))
        .map_or("", |m| m.as_str());
    (parse_meta(content), &text[whole.end()..])
}

/// Splits inline meta off the start of the text following an inliner.
#[must_use]
pub fn detach_inline_meta(text: &str) -> Option<(ElementMeta, &str)> {
    let captures = TRAILING_META.captures(text)?;
    let whole = captures.get(0)?;
    let content = captures.get(1).map_or("", |m| m.as_str());
    Some((parse_line_meta(content), &text[whole.end()..]))
}

/// Writes meta back out.
///
/// With `complex_allowed`, the block form is used when a value cannot be
/// written inline: a nested value, or a string containing `"`. Otherwise the
/// inline form, which leaves such values out. Empty meta writes as the empty
/// string.
#[must_use]
pub fn stringify_meta(meta: &ElementMeta, complex_allowed: bool) -> String {
    if complex_allowed && meta.props().any(|(_, value)| !fits_inline(value)) {
        return stringify_block_meta(meta);
    }
    stringify_line_meta(meta)
}

fn fits_inline(value: &Value) -> bool {
    match value {
        Value::Mapping(_) | Value::Sequence(_) | Value::Tagged(_) => false,
        Value::String(s) => !s.contains('"'),
        Value::Null | Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Scalar ids, including ones YAML read as numbers or booleans.
fn id_token(meta: &ElementMeta) -> Option<String> {
    match meta.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn stringify_block_meta(meta: &ElementMeta) -> String {
    let dump = dump_yaml(&Value::Mapping(meta.as_mapping().clone()));
    format!("{{\n{}}}", indent(&dump, YAML_INDENT))
}

fn stringify_line_meta(meta: &ElementMeta) -> String {
    let mut parts = Vec::new();

    if let Some(id) = id_token(meta) {
        parts.push(format!("#{id}"));
    }
    parts.extend(meta.classes().into_iter().map(|class| format!(".{class}")));

    for (key, value) in meta.props() {
        let Some(key) = key.as_str() else { continue };
        if !fits_inline(value) {
            if value.is_string() {
                log::warn!("meta value of `{key}` contains `\"` and cannot be written inline");
            }
            continue;
        }
        let part = match value {
            Value::Bool(true) => format!("+{key}"),
            Value::Bool(false) => format!("-{key}"),
            Value::Null => key.to_string(),
            Value::Number(number) if is_zero(number) => key.to_string(),
            Value::Number(number) => format!("{key}={number}"),
            Value::String(s) if s.is_empty() => key.to_string(),
            Value::String(s) if needs_quotes(s) => format!("{key}=\"{s}\""),
            Value::String(s) => format!("{key}={s}"),
            Value::Sequence(_) | Value::Mapping(_) | Value::Tagged(_) => continue,
        };
        parts.push(part);
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!("{{ {} }}", parts.join(" "))
    }
}

fn is_zero(number: &serde_yaml::Number) -> bool {
    number.as_f64().is_some_and(|n| n == 0.0 || n.is_nan())
}

/// Strings that would not survive an unquoted round trip.
fn needs_quotes(s: &str) -> bool {
    s.chars()
        .any(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
        || try_parse_int(s).is_some()
}
