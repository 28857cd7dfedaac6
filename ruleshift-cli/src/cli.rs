//! Command line definition for `ruleshift`
//!
//! Only depends on `clap`, `std` and the core library's dialect types.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use ruleshift::{Dialect, Direction};

/// Path argument meaning standard input or output
pub const STDIO_PATH: &str = "-";

/// Rule dialect accepted by `--from`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    /// Cursor rules (alwaysApply, description, globs)
    Cursor,
    /// Windsurf rules (trigger, description, globs)
    Windsurf,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Cursor => Dialect::Cursor,
            DialectArg::Windsurf => Dialect::Windsurf,
        }
    }
}

/// Conversion direction accepted by `--direction`
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DirectionArg {
    /// Cursor .mdc rules to Windsurf .md rules
    CursorToWindsurf,
    /// Windsurf .md rules to Cursor .mdc rules
    WindsurfToCursor,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::CursorToWindsurf => Direction::CursorToWindsurf,
            DirectionArg::WindsurfToCursor => Direction::WindsurfToCursor,
        }
    }
}

/// ruleshift - convert AI assistant rule files between Cursor and Windsurf
#[derive(Parser, Debug)]
#[command(name = "ruleshift")]
#[command(version)]
#[command(about = "Convert rule file front matter between Cursor and Windsurf")]
pub struct Cli {
    /// Enable debug output to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Read settings from this file instead of .ruleshift.{toml,yaml,yml}
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a single rule file
    Convert(ConvertArgs),
    /// Convert every rule file under a directory
    Batch(BatchArgs),
    /// Print the dialect a rule file is written in
    Detect(DetectArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Rule file to convert, or - for stdin
    #[arg(default_value = STDIO_PATH)]
    pub input: PathBuf,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Conversion direction; inferred from the input extension when omitted
    #[arg(long, value_enum)]
    pub direction: Option<DirectionArg>,

    /// Treat the input as this dialect instead of detecting it
    #[arg(long, value_enum, value_name = "DIALECT")]
    pub from: Option<DialectArg>,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Directory to search for rule files
    pub dir: PathBuf,

    /// Conversion direction
    #[arg(long, value_enum)]
    pub direction: DirectionArg,

    /// Write converted files under this directory instead of beside the sources
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Treat every file as this dialect instead of detecting it
    #[arg(long, value_enum, value_name = "DIALECT")]
    pub from: Option<DialectArg>,

    /// Replace converted files that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Stop at the first file that fails
    #[arg(long)]
    pub fail_fast: bool,

    /// Report what would be converted without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Rule file to inspect, or - for stdin
    #[arg(default_value = STDIO_PATH)]
    pub input: PathBuf,
}

/// Whether `path` stands for stdin or stdout
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}
