//! Converting files and directory trees
//!
//! This module is the file-system side of the converter: it reads rule
//! files, runs [`convert_document`] on each one and writes the results next
//! to the sources or under a separate output root. Each file is an
//! independent conversion, so trees are processed in parallel unless the
//! caller asks to stop at the first failure.

use crate::convert::{convert_document, Direction};
use crate::dialect::Dialect;
use crate::error::ConvertError;
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Default file extension of Cursor rules
pub const DEFAULT_CURSOR_EXTENSION: &str = "mdc";
/// Default file extension of Windsurf rules
pub const DEFAULT_WINDSURF_EXTENSION: &str = "md";

/// Errors from file and directory conversion
#[derive(Debug, Error)]
pub enum BatchError {
    /// A rule file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A converted file could not be written
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Destination that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The directory tree could not be walked
    #[error("failed to walk {}: {message}", .path.display())]
    Walk {
        /// Root being walked
        path: PathBuf,
        /// Walker error message
        message: String,
    },

    /// The file's content could not be converted
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// Fail-fast mode stopped at this file
    #[error("batch stopped at {}: {source}", .path.display())]
    Aborted {
        /// File that failed
        path: PathBuf,
        /// Why it failed
        source: Box<BatchError>,
    },
}

impl BatchError {
    /// Stable short code, matching [`ConvertError::code`] for conversion failures
    pub fn code(&self) -> &'static str {
        match self {
            BatchError::Read { .. } | BatchError::Write { .. } | BatchError::Walk { .. } => {
                "E_IO"
            }
            BatchError::Convert(error) => error.code(),
            BatchError::Aborted { source, .. } => source.code(),
        }
    }
}

/// File extensions used to find sources and name outputs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extensions {
    /// Extension of Cursor rule files, without the dot
    pub cursor: String,
    /// Extension of Windsurf rule files, without the dot
    pub windsurf: String,
}

impl Extensions {
    /// Extension for files written in `dialect`
    pub fn for_dialect(&self, dialect: Dialect) -> &str {
        match dialect {
            Dialect::Cursor => &self.cursor,
            Dialect::Windsurf => &self.windsurf,
        }
    }

    /// Guess the direction from a source file's extension
    ///
    /// Cursor's extension is checked first, so it wins if both are equal.
    pub fn infer_direction(&self, path: &Path) -> Option<Direction> {
        if has_extension(path, &self.cursor) {
            Some(Direction::CursorToWindsurf)
        } else if has_extension(path, &self.windsurf) {
            Some(Direction::WindsurfToCursor)
        } else {
            None
        }
    }
}

impl Default for Extensions {
    fn default() -> Self {
        Self {
            cursor: DEFAULT_CURSOR_EXTENSION.to_string(),
            windsurf: DEFAULT_WINDSURF_EXTENSION.to_string(),
        }
    }
}

/// How a tree conversion should behave
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Conversion direction for every file
    pub direction: Direction,
    /// Treat every file as this dialect instead of detecting
    pub forced: Option<Dialect>,
    /// Root for converted files; defaults to alongside the sources
    pub output_dir: Option<PathBuf>,
    /// Replace outputs that already exist
    pub overwrite: bool,
    /// Stop at the first failing file
    pub fail_fast: bool,
    /// Convert without writing anything
    pub dry_run: bool,
    /// Source and target file extensions
    pub extensions: Extensions,
}

impl BatchOptions {
    /// Options with defaults for everything but the direction
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            forced: None,
            output_dir: None,
            overwrite: false,
            fail_fast: false,
            dry_run: false,
            extensions: Extensions::default(),
        }
    }
}

/// Why a file was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The output file exists and overwriting is off
    OutputExists,
    /// The file is already written in the target dialect
    AlreadyConverted,
}

/// What happened to one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Converted and written (or would be, in a dry run)
    Converted {
        /// Where the output went
        output: PathBuf,
        /// Dialect the source was treated as
        source: Dialect,
    },
    /// Not converted, for a benign reason
    Skipped {
        /// Why
        reason: SkipReason,
    },
    /// Conversion or I/O failed
    Failed {
        /// Stable error code
        code: String,
        /// Human-readable message
        message: String,
    },
}

/// Outcome for a single file in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// Source file
    pub path: PathBuf,
    /// What happened to it
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

/// Aggregated result of converting a tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// Files converted
    pub converted: usize,
    /// Files skipped
    pub skipped: usize,
    /// Files that failed
    pub errored: usize,
    /// Per-file outcomes in path order
    pub files: Vec<FileReport>,
}

impl BatchReport {
    /// Whether any file failed
    pub fn has_errors(&self) -> bool {
        self.errored > 0
    }

    fn record(&mut self, path: PathBuf, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Converted { .. } => self.converted += 1,
            FileOutcome::Skipped { .. } => self.skipped += 1,
            FileOutcome::Failed { .. } => self.errored += 1,
        }
        self.files.push(FileReport { path, outcome });
    }
}

/// Read a rule file and convert it
///
/// The path is carried into any conversion error.
pub fn convert_file(
    path: &Path,
    direction: Direction,
    forced: Option<Dialect>,
) -> Result<String, BatchError> {
    let text = read_file(path)?;
    let conversion = convert_document(&text, direction, forced, Some(path))?;
    debug!(
        path = %path.display(),
        source = %conversion.source,
        forced = conversion.forced,
        "Converted rule file"
    );
    Ok(conversion.output)
}

/// Convert every rule file under `root`
///
/// Only files with the direction's source extension are considered. In
/// fail-fast mode the first failure is returned as
/// [`BatchError::Aborted`]; otherwise failures are recorded in the report.
pub fn convert_tree(root: &Path, options: &BatchOptions) -> Result<BatchReport, BatchError> {
    let source_extension = options.extensions.for_dialect(options.direction.source());
    let files = discover_rule_files(root, source_extension)?;
    info!(
        root = %root.display(),
        direction = %options.direction,
        files = files.len(),
        "Converting rule files"
    );

    let mut report = BatchReport::default();

    if options.fail_fast {
        for path in files {
            match process_file(&path, root, options) {
                Ok(outcome) => report.record(path, outcome),
                Err(error) => {
                    warn!(path = %path.display(), code = error.code(), "{}", error);
                    return Err(BatchError::Aborted {
                        path,
                        source: Box::new(error),
                    });
                }
            }
        }
    } else {
        let outcomes: Vec<(PathBuf, FileOutcome)> = files
            .into_par_iter()
            .map(|path| {
                let outcome = match process_file(&path, root, options) {
                    Ok(outcome) => outcome,
                    Err(error) => {
                        warn!(path = %path.display(), code = error.code(), "{}", error);
                        FileOutcome::Failed {
                            code: error.code().to_string(),
                            message: error.to_string(),
                        }
                    }
                };
                (path, outcome)
            })
            .collect();

        for (path, outcome) in outcomes {
            report.record(path, outcome);
        }
    }

    info!(
        converted = report.converted,
        skipped = report.skipped,
        errored = report.errored,
        "Batch conversion finished"
    );
    Ok(report)
}

/// Where the converted form of `path` goes
pub fn output_path(path: &Path, root: &Path, options: &BatchOptions) -> PathBuf {
    let target_extension = options.extensions.for_dialect(options.direction.target());
    let relative = match path.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf()),
    };

    let base = match &options.output_dir {
        Some(dir) => dir.clone(),
        None if root.is_file() => root.parent().map(Path::to_path_buf).unwrap_or_default(),
        None => root.to_path_buf(),
    };

    base.join(relative).with_extension(target_extension)
}

fn process_file(
    path: &Path,
    root: &Path,
    options: &BatchOptions,
) -> Result<FileOutcome, BatchError> {
    let output = output_path(path, root, options);
    if output.exists() && !options.overwrite {
        debug!(path = %path.display(), output = %output.display(), "Output exists, skipping");
        return Ok(FileOutcome::Skipped {
            reason: SkipReason::OutputExists,
        });
    }

    let text = read_file(path)?;
    let conversion = match convert_document(&text, options.direction, options.forced, Some(path)) {
        Ok(conversion) => conversion,
        Err(ConvertError::Mismatch {
            found,
            forced: false,
            ..
        }) if found == options.direction.target() => {
            debug!(path = %path.display(), dialect = %found, "Already converted, skipping");
            return Ok(FileOutcome::Skipped {
                reason: SkipReason::AlreadyConverted,
            });
        }
        Err(error) => return Err(error.into()),
    };

    if options.dry_run {
        debug!(path = %path.display(), output = %output.display(), "Dry run, not writing");
    } else {
        write_file(&output, &conversion.output)?;
        debug!(path = %path.display(), output = %output.display(), "Wrote converted rule");
    }

    Ok(FileOutcome::Converted {
        output,
        source: conversion.source,
    })
}

fn discover_rule_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>, BatchError> {
    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        let entry = entry.map_err(|e| BatchError::Walk {
            path: root.to_path_buf(),
            message: e.to_string(),
        })?;
        if entry.file_type().is_file() && has_extension(entry.path(), extension) {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = files.len(), "Discovered rule files");
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn read_file(path: &Path) -> Result<String, BatchError> {
    std::fs::read_to_string(path).map_err(|source| BatchError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), BatchError> {
    let write_error = |source: std::io::Error| BatchError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, content).map_err(write_error)
}
