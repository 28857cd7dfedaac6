//! Handling for hand-written `globs` values
//!
//! Rule authors routinely write `globs: src/**/*.{ts,tsx}` without quotes.
//! That line is not valid YAML (`*` opens an alias, `{` a flow mapping), so
//! the parser runs [`quote_unquoted_globs`] first and puts the original text
//! back afterwards. The renderer runs [`unquote_globs_line`] on its output so
//! the field keeps the unquoted style authors expect. No other field is
//! touched by either pass.
//!
//! A trailing `# comment` on the line is not part of the value, and a value
//! that already is a well-formed flow sequence such as `["*.ts", "*.tsx"]`
//! is left for the YAML parser.

use regex::Regex;
use serde_yaml_ng::Value;
use std::sync::OnceLock;

/// Metadata key holding the comma-joined glob list in both dialects
pub const GLOBS_KEY: &str = "globs";

/// Characters that make an unquoted value ambiguous or invalid YAML
const SPECIAL_CHARS: &[char] = &[
    '*', '{', '}', '[', ']', ':', ',', '?', '&', '!', '|', '>', '%', '@', '`',
];

static GLOBS_LINE_REGEX: OnceLock<Regex> = OnceLock::new();
static RENDERED_GLOBS_REGEX: OnceLock<Regex> = OnceLock::new();

fn globs_line_regex() -> &'static Regex {
    GLOBS_LINE_REGEX.get_or_init(|| {
        Regex::new(r"^globs[ \t]*:[ \t]+(\S.*?)[ \t]*$").expect("Invalid globs line regex")
    })
}

fn rendered_globs_regex() -> &'static Regex {
    RENDERED_GLOBS_REGEX.get_or_init(|| {
        Regex::new(r#"^globs: (?:'(.*)'|"(.*)")$"#).expect("Invalid rendered globs regex")
    })
}

/// A metadata block prepared for structural parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotedBlock {
    /// Block text with the `globs` value quoted where needed
    pub text: String,
    /// The value exactly as written, if it had to be quoted
    pub original: Option<String>,
}

/// Whether a bare `globs` value must be quoted before YAML can read it
///
/// Values that are already quoted, or written as a valid flow sequence, are
/// left for the YAML parser. A value holding a comment marker never counts,
/// since written bare it would lose everything after the marker.
pub fn needs_quoting(value: &str) -> bool {
    if value.is_empty() || value.trim() != value || comment_start(value).is_some() {
        return false;
    }
    if value.starts_with(['\'', '"']) || is_flow_sequence(value) {
        return false;
    }
    value.contains(SPECIAL_CHARS)
}

/// A `[...]` value that YAML reads as a list
fn is_flow_sequence(value: &str) -> bool {
    value.starts_with('[')
        && value.ends_with(']')
        && matches!(serde_yaml_ng::from_str::<Value>(value), Ok(Value::Sequence(_)))
}

/// Offset of a `#` that opens a YAML comment in a plain value
fn comment_start(value: &str) -> Option<usize> {
    value
        .char_indices()
        .find(|&(index, c)| c == '#' && (index == 0 || value[..index].ends_with([' ', '\t'])))
        .map(|(index, _)| index)
}

/// The value with any trailing comment removed
fn strip_comment(value: &str) -> &str {
    match comment_start(value) {
        Some(index) => value[..index].trim_end(),
        None => value,
    }
}

/// Quote a top-level unquoted `globs` value so the block parses as YAML
///
/// Only unindented lines are considered, so a `globs` key nested inside
/// another mapping is left alone.
pub fn quote_unquoted_globs(block: &str) -> QuotedBlock {
    let regex = globs_line_regex();
    let mut original = None;
    let mut lines = Vec::new();

    for line in block.split('\n') {
        let rewritten = match regex.captures(line) {
            Some(captures) if original.is_none() => {
                let written = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
                let value = strip_comment(written);
                if needs_quoting(value) {
                    original = Some(value.to_string());
                    Some(format!("{}: {}", GLOBS_KEY, single_quote(value)))
                } else {
                    None
                }
            }
            _ => None,
        };
        lines.push(rewritten.unwrap_or_else(|| line.to_string()));
    }

    QuotedBlock {
        text: lines.join("\n"),
        original,
    }
}

/// Strip the quotes the YAML emitter put around a `globs` value
///
/// The quotes are only removed when [`quote_unquoted_globs`] would add them
/// back on the next parse, which keeps render and parse inverse to each
/// other.
pub fn unquote_globs_line(rendered: &str) -> String {
    let regex = rendered_globs_regex();
    let mut lines = Vec::new();

    for line in rendered.split('\n') {
        let unquoted = regex.captures(line).and_then(|captures| {
            let value = if let Some(single) = captures.get(1) {
                single.as_str().replace("''", "'")
            } else {
                let double = captures.get(2)?.as_str();
                if double.contains('\\') {
                    return None;
                }
                double.to_string()
            };
            needs_quoting(&value).then(|| format!("{}: {}", GLOBS_KEY, value))
        });
        lines.push(unquoted.unwrap_or_else(|| line.to_string()));
    }

    lines.join("\n")
}

fn single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
