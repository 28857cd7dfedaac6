//! YAML front matter parsing and rendering for rule files
//!
//! A rule file may open with a metadata block delimited by `---` lines,
//! followed by a free-text body that the converter never interprets.
//!
//! # Format
//! ```markdown
//! ---
//! description: TypeScript conventions
//! globs: src/**/*.ts
//! alwaysApply: false
//! ---
//! Prefer `unknown` over `any`.
//! ```

use crate::error::ParseError;
use crate::globs::{self, GLOBS_KEY};
use indexmap::IndexMap;
use serde_yaml_ng::{Mapping, Value};
use std::path::Path;

/// Line that opens and closes a metadata block
pub const DELIMITER: &str = "---";

/// UTF-8 byte-order mark some editors write at the start of a file
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Ordered metadata entries, in the order they were written
pub type Metadata = IndexMap<String, Value>;

/// A rule file split into its metadata and body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    /// Parsed metadata entries (empty if the file has no block)
    pub metadata: Metadata,
    /// Everything after the closing delimiter line
    pub body: String,
}

/// Parse the metadata block and body of a rule file
///
/// Text that does not start with a `---` line has no metadata and is
/// returned whole as the body.
pub fn parse_frontmatter(content: &str) -> Result<ParsedDocument, ParseError> {
    parse_frontmatter_at(content, None)
}

/// Parse like [`parse_frontmatter`], naming `path` in any error
pub fn parse_frontmatter_at(
    content: &str,
    path: Option<&Path>,
) -> Result<ParsedDocument, ParseError> {
    let Some(after_opening) = strip_opening_delimiter(content) else {
        return Ok(ParsedDocument {
            metadata: Metadata::new(),
            body: content.to_string(),
        });
    };

    let (block, body) = split_at_closing_delimiter(after_opening).ok_or_else(|| {
        ParseError::new("metadata block opened with '---' is never closed")
            .at_line(1)
            .with_path(path)
    })?;

    let metadata = parse_metadata(block).map_err(|e| e.with_path(path))?;

    Ok(ParsedDocument {
        metadata,
        body: body.to_string(),
    })
}

/// Render metadata and body back into rule file text
///
/// Empty metadata produces just the body. The output always ends with
/// exactly one newline added to a body lacking one, and uses `\n` line
/// endings throughout.
pub fn render_frontmatter(metadata: &Metadata, body: &str) -> Result<String, ParseError> {
    let mut body = normalize_line_endings(body);
    if !body.ends_with('\n') {
        body.push('\n');
    }

    if metadata.is_empty() {
        return Ok(body);
    }

    let mapping: Mapping = metadata
        .iter()
        .map(|(key, value)| (Value::String(key.clone()), value.clone()))
        .collect();
    let rendered = serde_yaml_ng::to_string(&mapping).map_err(|e| {
        ParseError::new("metadata could not be rendered as YAML").with_detail(e.to_string())
    })?;
    let rendered = globs::unquote_globs_line(&rendered);

    let mut output = String::with_capacity(rendered.len() + body.len() + 8);
    output.push_str(DELIMITER);
    output.push('\n');
    output.push_str(&rendered);
    if !rendered.ends_with('\n') {
        output.push('\n');
    }
    output.push_str(DELIMITER);
    output.push('\n');
    output.push_str(&body);
    Ok(output)
}

fn strip_opening_delimiter(content: &str) -> Option<&str> {
    let content = content.strip_prefix(BYTE_ORDER_MARK).unwrap_or(content);
    content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
}

/// Split at the first line consisting solely of `---`
///
/// Returns the block before that line and the body after its line ending.
fn split_at_closing_delimiter(text: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let bare = line.strip_suffix('\n').unwrap_or(line);
        let bare = bare.strip_suffix('\r').unwrap_or(bare);
        if bare == DELIMITER {
            return Some((&text[..offset], &text[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

fn parse_metadata(block: &str) -> Result<Metadata, ParseError> {
    let normalized = normalize_line_endings(block);
    if normalized.trim().is_empty() {
        return Ok(Metadata::new());
    }

    let quoted = globs::quote_unquoted_globs(&normalized);
    let value: Value = serde_yaml_ng::from_str(&quoted.text).map_err(|e| {
        let error =
            ParseError::new("metadata is not valid YAML").with_detail(e.to_string());
        match e.location() {
            // The opening delimiter occupies line 1
            Some(location) => error.at_line(location.line() + 1),
            None => error,
        }
    })?;

    let mut metadata = match value {
        Value::Null => Metadata::new(),
        Value::Mapping(mapping) => into_metadata(mapping)?,
        other => {
            return Err(ParseError::new(format!(
                "metadata must be a list of 'key: value' entries, found {}",
                describe_value(&other)
            ))
            .at_line(2))
        }
    };

    if let Some(original) = quoted.original {
        if let Some(value) = metadata.get_mut(GLOBS_KEY) {
            *value = Value::String(original);
        }
    }

    Ok(metadata)
}

/// Turn `\r\n` and lone `\r` line endings into `\n`
fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn into_metadata(mapping: Mapping) -> Result<Metadata, ParseError> {
    let mut metadata = Metadata::with_capacity(mapping.len());
    for (key, value) in mapping {
        match key {
            Value::String(key) => {
                metadata.insert(key, value);
            }
            other => {
                return Err(ParseError::new(format!(
                    "metadata keys must be strings, found {}",
                    describe_value(&other)
                )))
            }
        }
    }
    Ok(metadata)
}

fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a plain string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frontmatter_with_yaml() {
        let content = "---\ndescription: Style guide\nalwaysApply: true\n---\nUse tabs.\n";

        let result = parse_frontmatter(content).unwrap();
        assert_eq!(result.metadata.len(), 2);
        assert_eq!(
            result.metadata.get("description").and_then(|v| v.as_str()),
            Some("Style guide")
        );
        assert_eq!(
            result.metadata.get("alwaysApply").and_then(|v| v.as_bool()),
            Some(true)
        );
        assert_eq!(result.body, "Use tabs.\n");
    }

    #[test]
    fn test_parse_frontmatter_no_yaml() {
        let content = "Just a body.\nNo metadata here.";

        let result = parse_frontmatter(content).unwrap();
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, content);
    }

    #[test]
    fn test_parse_frontmatter_not_at_start() {
        let content = "\n---\ntrigger: manual\n---\nBody";

        let result = parse_frontmatter(content).unwrap();
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, content);
    }

    #[test]
    fn test_parse_frontmatter_empty_input() {
        let result = parse_frontmatter("").unwrap();
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, "");
    }

    #[test]
    fn test_parse_frontmatter_empty_block() {
        let result = parse_frontmatter("---\n---\nBody text\n").unwrap();
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, "Body text\n");
    }

    #[test]
    fn test_parse_frontmatter_comment_only_block() {
        let result = parse_frontmatter("---\n# nothing yet\n---\nBody").unwrap();
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn test_parse_frontmatter_metadata_only() {
        let result = parse_frontmatter("---\ntrigger: manual\n---").unwrap();
        assert_eq!(result.metadata.len(), 1);
        assert_eq!(result.body, "");

        let result = parse_frontmatter("---\ntrigger: manual\n---\n").unwrap();
        assert_eq!(result.body, "");
    }

    #[test]
    fn test_parse_frontmatter_strips_only_one_newline() {
        let result = parse_frontmatter("---\ntrigger: manual\n---\n\n\nBody\n").unwrap();
        assert_eq!(result.body, "\n\nBody\n");
    }

    #[test]
    fn test_parse_frontmatter_crlf() {
        let content = "---\r\ndescription: Windows file\r\n---\r\nBody\r\n";
        let result = parse_frontmatter(content).unwrap();
        assert_eq!(
            result.metadata.get("description").and_then(|v| v.as_str()),
            Some("Windows file")
        );
        assert_eq!(result.body, "Body\r\n");
    }

    #[test]
    fn test_parse_frontmatter_preserves_key_order() {
        let content = "---\nzeta: 1\nalpha: 2\nmiddle: 3\n---\n";
        let result = parse_frontmatter(content).unwrap();
        let keys: Vec<&str> = result.metadata.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "middle"]);
    }

    #[test]
    fn test_parse_frontmatter_unquoted_globs() {
        let content = "---\nglobs: src/**/*.{ts,tsx}, *.d.ts\nalwaysApply: false\n---\nBody";
        let result = parse_frontmatter(content).unwrap();
        assert_eq!(
            result.metadata.get("globs").and_then(|v| v.as_str()),
            Some("src/**/*.{ts,tsx}, *.d.ts")
        );
    }

    #[test]
    fn test_parse_frontmatter_quoted_globs_untouched() {
        let content = "---\nglobs: \"*.rs\"\n---\n";
        let result = parse_frontmatter(content).unwrap();
        assert_eq!(
            result.metadata.get("globs").and_then(|v| v.as_str()),
            Some("*.rs")
        );
    }

    #[test]
    fn test_parse_frontmatter_malformed_reports_line() {
        let content = "---\ndescription: ok\nthis line has no separator\nother: 1\n---\nBody";
        let error = parse_frontmatter(content).unwrap_err();
        assert!(error.detail.is_some());
        let line = error.line.expect("line number");
        assert!((2..=5).contains(&line), "unexpected line {}", line);
    }

    #[test]
    fn test_parse_frontmatter_malformed_with_path() {
        let content = "---\ninvalid yaml: [\n---\nContent\n";
        let error = parse_frontmatter_at(content, Some(Path::new("rules/broken.mdc"))).unwrap_err();
        assert!(error.to_string().contains("rules/broken.mdc"));
        assert_eq!(error.path.as_deref(), Some(Path::new("rules/broken.mdc")));
    }

    #[test]
    fn test_parse_frontmatter_bare_scalar_block() {
        let error = parse_frontmatter("---\njust words\n---\n").unwrap_err();
        assert!(error.cause.contains("key: value"));
    }

    #[test]
    fn test_parse_frontmatter_non_string_key() {
        let error = parse_frontmatter("---\n1: one\n---\n").unwrap_err();
        assert!(error.cause.contains("keys must be strings"));
    }

    #[test]
    fn test_parse_frontmatter_unclosed_block() {
        let error = parse_frontmatter("---\ntrigger: manual\nBody without end").unwrap_err();
        assert!(error.cause.contains("never closed"));
        assert_eq!(error.line, Some(1));
    }

    #[test]
    fn test_render_empty_metadata_adds_single_newline() {
        let metadata = Metadata::new();
        assert_eq!(render_frontmatter(&metadata, "Body").unwrap(), "Body\n");
        assert_eq!(render_frontmatter(&metadata, "Body\n").unwrap(), "Body\n");
        assert_eq!(render_frontmatter(&metadata, "").unwrap(), "\n");
    }

    #[test]
    fn test_render_with_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("trigger".to_string(), Value::String("manual".to_string()));
        metadata.insert("owner".to_string(), Value::String("platform".to_string()));

        let output = render_frontmatter(&metadata, "Body\n").unwrap();
        assert_eq!(output, "---\ntrigger: manual\nowner: platform\n---\nBody\n");
    }

    #[test]
    fn test_render_empty_body_ends_with_one_blank_line() {
        let mut metadata = Metadata::new();
        metadata.insert("alwaysApply".to_string(), Value::Bool(true));

        let output = render_frontmatter(&metadata, "").unwrap();
        assert_eq!(output, "---\nalwaysApply: true\n---\n\n");
        assert!(!output.ends_with("\n\n\n"));
    }

    #[test]
    fn test_render_quotes_ambiguous_strings() {
        let mut metadata = Metadata::new();
        metadata.insert("version".to_string(), Value::String("1.0".to_string()));
        metadata.insert("enabled".to_string(), Value::String("true".to_string()));

        let output = render_frontmatter(&metadata, "").unwrap();
        let reparsed = parse_frontmatter(&output).unwrap();
        assert_eq!(reparsed.metadata, metadata);
    }

    #[test]
    fn test_render_leaves_globs_unquoted() {
        let mut metadata = Metadata::new();
        metadata.insert("trigger".to_string(), Value::String("glob".to_string()));
        metadata.insert("globs".to_string(), Value::String("*.ts,*.tsx".to_string()));

        let output = render_frontmatter(&metadata, "Body").unwrap();
        assert!(output.contains("\nglobs: *.ts,*.tsx\n"));
    }

    #[test]
    fn test_render_normalizes_line_endings() {
        let output = render_frontmatter(&Metadata::new(), "a\r\nb\r\n").unwrap();
        assert_eq!(output, "a\nb\n");
    }

    #[test]
    fn test_render_normalizes_lone_carriage_returns() {
        let output = render_frontmatter(&Metadata::new(), "a\rb\r").unwrap();
        assert_eq!(output, "a\nb\n");

        let output = render_frontmatter(&Metadata::new(), "a\r\n\rb").unwrap();
        assert_eq!(output, "a\n\nb\n");
        assert!(!output.contains('\r'));
    }

    #[test]
    fn test_parse_frontmatter_lone_carriage_return_in_block() {
        let result = parse_frontmatter("---\ndescription: Old Mac\rowner: me\n---\nBody").unwrap();
        assert_eq!(
            result.metadata.get("description").and_then(|v| v.as_str()),
            Some("Old Mac")
        );
        assert_eq!(
            result.metadata.get("owner").and_then(|v| v.as_str()),
            Some("me")
        );
    }

    #[test]
    fn test_parse_frontmatter_after_byte_order_mark() {
        let result = parse_frontmatter("\u{feff}---\nalwaysApply: true\n---\nBody").unwrap();
        assert_eq!(
            result.metadata.get("alwaysApply").and_then(|v| v.as_bool()),
            Some(true)
        );
        assert_eq!(result.body, "Body");
    }

    #[test]
    fn test_byte_order_mark_without_block_stays_in_body() {
        let content = "\u{feff}Plain notes";
        let result = parse_frontmatter(content).unwrap();
        assert!(result.metadata.is_empty());
        assert_eq!(result.body, content);
    }

    #[test]
    fn test_render_then_parse_round_trip() {
        let mut metadata = Metadata::new();
        metadata.insert("description".to_string(), Value::String("Lint: strict".to_string()));
        metadata.insert("globs".to_string(), Value::String("src/**/*.{js,jsx}".to_string()));
        metadata.insert("alwaysApply".to_string(), Value::Bool(false));

        let output = render_frontmatter(&metadata, "Body\n").unwrap();
        let reparsed = parse_frontmatter(&output).unwrap();
        assert_eq!(reparsed.metadata, metadata);
        assert_eq!(reparsed.body, "Body\n");
    }
}
