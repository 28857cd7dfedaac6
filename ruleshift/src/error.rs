//! Error types for rule conversion
//!
//! Every failure the engine can produce falls into one of three kinds:
//! a structurally invalid metadata block ([`ParseError`]), a dialect that
//! could not be determined or does not match the requested direction, or a
//! trigger whose companion field is missing ([`MappingError`]).
//! [`ConvertError`] ties them together and exposes a stable [`ErrorKind`]
//! code for callers that branch on the failure type.

use crate::Dialect;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Machine-checkable classification of a conversion failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The metadata block is not valid YAML or not a key/value mapping
    Parse,
    /// The source dialect is unknown or disagrees with the direction
    Detection,
    /// Trigger and companion fields cannot be mapped
    Mapping,
}

impl ErrorKind {
    /// Stable short code suitable for scripts and golden tests
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Parse => "E_PARSE",
            ErrorKind::Detection => "E_DETECT",
            ErrorKind::Mapping => "E_MAPPING",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The metadata block of a rule file could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    /// What went wrong, in plain words
    pub cause: String,
    /// 1-based line counted from the opening `---`, when known
    pub line: Option<usize>,
    /// Message reported by the YAML parser, if it produced one
    pub detail: Option<String>,
    /// File the text came from, for context only
    pub path: Option<PathBuf>,
}

impl ParseError {
    /// Create an error with only a cause
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
            line: None,
            detail: None,
            path: None,
        }
    }

    /// Attach a line number
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Attach the underlying parser message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach the source path if one is known
    pub fn with_path(mut self, path: Option<&Path>) -> Self {
        self.path = path.map(Path::to_path_buf);
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid metadata block")?;
        if let Some(path) = &self.path {
            write!(f, " in {}", path.display())?;
        }
        if let Some(line) = self.line {
            write!(f, " at line {}", line)?;
        }
        write!(f, ": {}", self.cause)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// Windsurf trigger fields that cannot be expressed in the Cursor dialect
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// `trigger: glob` without a `globs` field
    #[error("trigger 'glob' requires a 'globs' field but none was found")]
    MissingGlobs,

    /// `trigger: model_decision` without a `description` field
    #[error("trigger 'model_decision' requires a 'description' field but none was found")]
    MissingDescription,

    /// The trigger value is not one of the four known activation policies
    #[error(
        "unrecognized trigger '{0}' (expected one of: manual, always_on, model_decision, glob)"
    )]
    UnknownTrigger(String),

    /// No trigger field at all
    #[error("rule has no 'trigger' field")]
    MissingTrigger,
}

/// Any failure from a single conversion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Metadata block failed to parse
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// No forced dialect and detection was inconclusive
    #[error(
        "could not determine the rule dialect{}; pass an explicit source dialect to convert it",
        describe_path(.path)
    )]
    Undetermined {
        /// File the text came from
        path: Option<PathBuf>,
    },

    /// The source dialect is not the one the direction converts from
    #[error(
        "dialect mismatch{}: expected {expected} but {} {found}",
        describe_path(.path),
        found_verb(.forced)
    )]
    Mismatch {
        /// Dialect the direction requires as input
        expected: Dialect,
        /// Dialect the text was detected as, or forced to
        found: Dialect,
        /// Whether `found` came from the caller rather than detection
        forced: bool,
        /// File the text came from
        path: Option<PathBuf>,
    },

    /// Field mapping failed
    #[error("{}", mapping_message(.source, .path))]
    Mapping {
        /// The mapping failure
        source: MappingError,
        /// File the text came from
        path: Option<PathBuf>,
    },
}

impl ConvertError {
    /// Classification of this failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::Parse(_) => ErrorKind::Parse,
            ConvertError::Undetermined { .. } | ConvertError::Mismatch { .. } => {
                ErrorKind::Detection
            }
            ConvertError::Mapping { .. } => ErrorKind::Mapping,
        }
    }

    /// Short stable code, see [`ErrorKind::code`]
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Path the failing text came from, if the caller supplied one
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConvertError::Parse(err) => err.path.as_deref(),
            ConvertError::Undetermined { path }
            | ConvertError::Mismatch { path, .. }
            | ConvertError::Mapping { path, .. } => path.as_deref(),
        }
    }
}

impl From<MappingError> for ConvertError {
    fn from(source: MappingError) -> Self {
        ConvertError::Mapping { source, path: None }
    }
}

fn describe_path(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" for {}", path.display()),
        None => String::new(),
    }
}

fn found_verb(forced: &bool) -> &'static str {
    if *forced {
        "was forced to"
    } else {
        "detected"
    }
}

fn mapping_message(source: &MappingError, path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!("cannot map {}: {}", path.display(), source),
        None => format!("cannot map rule: {}", source),
    }
}
