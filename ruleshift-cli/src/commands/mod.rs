//! Subcommand implementations
//!
//! Each command returns the process exit code on success; errors are turned
//! into a message and exit code by the binary.

pub mod batch;
pub mod convert;
pub mod detect;

use crate::cli::is_stdio;
use anyhow::Context;
use std::io::Read;
use std::path::Path;

/// Read a rule file, or stdin when `path` is `-`
pub(crate) fn read_input(path: &Path) -> anyhow::Result<String> {
    if is_stdio(path) {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read standard input")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
