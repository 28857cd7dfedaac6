//! # ruleshift
//!
//! Converts AI coding assistant rule files between the Cursor dialect
//! (`alwaysApply`, `description`, `globs`) and the Windsurf dialect
//! (`trigger`, `description`, `globs`).
//!
//! ## Modules
//!
//! - [`frontmatter`] - Split rule files into metadata and body, and render them back
//! - [`dialect`] - Decide which dialect a file is written in
//! - [`mapping`] - Translate activation fields between dialects
//! - [`convert`] - One-call conversion of a single document
//! - [`batch`] - Read, convert and write files and directory trees
//!
//! ## Example
//!
//! ```
//! use ruleshift::{convert, Direction};
//!
//! let windsurf = "---\ntrigger: glob\nglobs: src/**/*.ts\n---\nUse strict mode.\n";
//! let cursor = convert(windsurf, Direction::WindsurfToCursor, None, None).unwrap();
//! assert_eq!(
//!     cursor,
//!     "---\nglobs: src/**/*.ts\nalwaysApply: false\n---\nUse strict mode.\n"
//! );
//! ```

#![warn(missing_docs)]

pub mod batch;
pub mod convert;
pub mod dialect;
pub mod error;
pub mod frontmatter;
pub mod globs;
pub mod mapping;

pub use batch::{
    convert_file, convert_tree, BatchError, BatchOptions, BatchReport, Extensions, FileOutcome,
    FileReport, SkipReason,
};
pub use convert::{convert, convert_document, Conversion, Direction};
pub use dialect::{detect_dialect, Dialect};
pub use error::{ConvertError, ErrorKind, MappingError, ParseError, Result};
pub use frontmatter::{
    parse_frontmatter, parse_frontmatter_at, render_frontmatter, Metadata, ParsedDocument,
};
pub use mapping::{
    cursor_to_windsurf, map_cursor_metadata, map_windsurf_metadata, windsurf_to_cursor,
    CursorFrontmatter, Trigger, WindsurfFrontmatter,
};
