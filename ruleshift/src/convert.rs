//! Single-document conversion
//!
//! [`convert`] is the entry point collaborators call once per rule file:
//! parse, settle the source dialect, map the fields, render. It performs no
//! I/O and keeps no state, so calls can run in parallel freely.

use crate::dialect::{detect_dialect, Dialect};
use crate::error::{ConvertError, Result};
use crate::frontmatter::{parse_frontmatter_at, render_frontmatter};
use crate::mapping::{map_cursor_metadata, map_windsurf_metadata};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Which way a conversion goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Cursor `.mdc` rules to Windsurf `.md` rules
    CursorToWindsurf,
    /// Windsurf `.md` rules to Cursor `.mdc` rules
    WindsurfToCursor,
}

impl Direction {
    /// Dialect the input must be written in
    pub fn source(self) -> Dialect {
        match self {
            Direction::CursorToWindsurf => Dialect::Cursor,
            Direction::WindsurfToCursor => Dialect::Windsurf,
        }
    }

    /// Dialect the output is written in
    pub fn target(self) -> Dialect {
        match self {
            Direction::CursorToWindsurf => Dialect::Windsurf,
            Direction::WindsurfToCursor => Dialect::Cursor,
        }
    }

    /// The direction converting from `source`
    pub fn from_source(source: Dialect) -> Self {
        match source {
            Dialect::Cursor => Direction::CursorToWindsurf,
            Dialect::Windsurf => Direction::WindsurfToCursor,
        }
    }

    /// The opposite direction
    pub fn reverse(self) -> Self {
        Self::from_source(self.target())
    }

    /// Kebab-case name used on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::CursorToWindsurf => "cursor-to-windsurf",
            Direction::WindsurfToCursor => "windsurf-to-cursor",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cursor-to-windsurf" => Ok(Direction::CursorToWindsurf),
            "windsurf-to-cursor" => Ok(Direction::WindsurfToCursor),
            other => Err(format!(
                "unknown direction '{}' (expected 'cursor-to-windsurf' or 'windsurf-to-cursor')",
                other
            )),
        }
    }
}

/// Result of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// Dialect the input was treated as
    pub source: Dialect,
    /// Whether `source` was supplied by the caller rather than detected
    pub forced: bool,
    /// Converted rule file text
    pub output: String,
}

/// Convert one rule file's text in the given direction
///
/// `forced` skips detection and treats the text as that dialect. `path` is
/// only used to give errors context.
///
/// # Examples
/// ```
/// use ruleshift::{convert, Direction};
///
/// let cursor = "---\nalwaysApply: true\n---\nAlways use tabs.\n";
/// let windsurf = convert(cursor, Direction::CursorToWindsurf, None, None).unwrap();
/// assert_eq!(windsurf, "---\ntrigger: always_on\n---\nAlways use tabs.\n");
/// ```
pub fn convert(
    text: &str,
    direction: Direction,
    forced: Option<Dialect>,
    path: Option<&Path>,
) -> Result<String> {
    convert_document(text, direction, forced, path).map(|conversion| conversion.output)
}

/// Convert like [`convert`], also reporting which dialect the input was
pub fn convert_document(
    text: &str,
    direction: Direction,
    forced: Option<Dialect>,
    path: Option<&Path>,
) -> Result<Conversion> {
    let document = parse_frontmatter_at(text, path)?;

    let source = match forced {
        Some(dialect) => dialect,
        None => detect_dialect(text, Some(&document.metadata)).ok_or_else(|| {
            ConvertError::Undetermined {
                path: path.map(Path::to_path_buf),
            }
        })?,
    };

    if source != direction.source() {
        return Err(ConvertError::Mismatch {
            expected: direction.source(),
            found: source,
            forced: forced.is_some(),
            path: path.map(Path::to_path_buf),
        });
    }

    let metadata = match direction {
        Direction::CursorToWindsurf => map_cursor_metadata(document.metadata),
        Direction::WindsurfToCursor => {
            map_windsurf_metadata(document.metadata).map_err(|source| ConvertError::Mapping {
                source,
                path: path.map(Path::to_path_buf),
            })?
        }
    };

    let output = render_frontmatter(&metadata, &document.body).map_err(|e| e.with_path(path))?;

    Ok(Conversion {
        source,
        forced: forced.is_some(),
        output,
    })
}
