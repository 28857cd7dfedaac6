//! Rule dialects and dialect detection
//!
//! Cursor rules (`.mdc`) switch on with a boolean `alwaysApply` flag and
//! optional `description`/`globs`. Windsurf rules (`.md`) carry a required
//! `trigger` enum. The `trigger` key is the only marker unique to one
//! dialect, so detection looks for it first and only falls back to the
//! weaker Cursor signals once it is ruled out.

use crate::frontmatter::{parse_frontmatter, Metadata};
use crate::globs::GLOBS_KEY;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metadata key of the Windsurf activation policy
pub const TRIGGER_KEY: &str = "trigger";
/// Metadata key of the Cursor always-on flag
pub const ALWAYS_APPLY_KEY: &str = "alwaysApply";
/// Metadata key of the free-text description shared by both dialects
pub const DESCRIPTION_KEY: &str = "description";

/// How many characters of raw text the trigger fast path inspects
pub const FAST_PATH_WINDOW: usize = 512;

const TRIGGER_MARKER: &str = "trigger:";

/// A rule file metadata convention
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Flag based: `alwaysApply`, `description`, `globs`
    Cursor,
    /// Trigger based: `trigger`, `description`, `globs`
    Windsurf,
}

impl Dialect {
    /// Lowercase name used in messages and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Cursor => "cursor",
            Dialect::Windsurf => "windsurf",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cursor" => Ok(Dialect::Cursor),
            "windsurf" => Ok(Dialect::Windsurf),
            other => Err(format!(
                "unknown dialect '{}' (expected 'cursor' or 'windsurf')",
                other
            )),
        }
    }
}

/// Decide which dialect `text` is written in
///
/// Pass `metadata` when the text has already been parsed to avoid parsing it
/// twice. Returns `None` when neither dialect can be established, including
/// when the metadata block does not parse.
pub fn detect_dialect(text: &str, metadata: Option<&Metadata>) -> Option<Dialect> {
    if leading_window(text).contains(TRIGGER_MARKER) {
        return Some(Dialect::Windsurf);
    }

    match metadata {
        Some(metadata) => detect_from_metadata(metadata),
        None => parse_frontmatter(text)
            .ok()
            .and_then(|document| detect_from_metadata(&document.metadata)),
    }
}

fn detect_from_metadata(metadata: &Metadata) -> Option<Dialect> {
    if metadata.contains_key(TRIGGER_KEY) {
        return Some(Dialect::Windsurf);
    }
    if metadata
        .get(ALWAYS_APPLY_KEY)
        .is_some_and(|value| value.is_bool())
    {
        return Some(Dialect::Cursor);
    }
    if metadata.contains_key(DESCRIPTION_KEY) || metadata.contains_key(GLOBS_KEY) {
        return Some(Dialect::Cursor);
    }
    None
}

/// The first [`FAST_PATH_WINDOW`] characters of `text`
fn leading_window(text: &str) -> &str {
    match text.char_indices().nth(FAST_PATH_WINDOW) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}
