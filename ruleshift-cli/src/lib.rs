//! ruleshift command line
//!
//! - `ruleshift convert [INPUT|-]`: convert one rule file to stdout or `-o`
//! - `ruleshift batch <DIR> --direction D`: convert a directory tree
//! - `ruleshift detect [INPUT|-]`: print `cursor`, `windsurf` or `undetermined`
//!
//! Settings come from [`config::Settings`]; see that module for sources.

pub mod cli;
pub mod commands;
pub mod config;

pub use cli::{Cli, Commands};
pub use config::{ConfigError, Settings};

use ruleshift::{BatchError, ConvertError};

/// Code reported for configuration problems
pub const CONFIG_ERROR_CODE: &str = "E_CONFIG";
/// Code reported for I/O and usage problems
pub const GENERAL_ERROR_CODE: &str = "E_IO";

/// Stable code for an error surfaced by a command
///
/// Looks through the context chain for a library or config error and falls
/// back to [`GENERAL_ERROR_CODE`].
pub fn error_code(error: &anyhow::Error) -> &'static str {
    for cause in error.chain() {
        if let Some(convert) = cause.downcast_ref::<ConvertError>() {
            return convert.code();
        }
        if let Some(batch) = cause.downcast_ref::<BatchError>() {
            return batch.code();
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return CONFIG_ERROR_CODE;
        }
    }
    GENERAL_ERROR_CODE
}
