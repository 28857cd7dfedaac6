//! `ruleshift convert`

use super::read_input;
use crate::cli::{is_stdio, ConvertArgs};
use crate::config::Settings;
use anyhow::{bail, Context};
use ruleshift::{convert, convert_file, Dialect, Direction};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Convert one file or stdin, writing to `--output` or stdout
pub fn run(args: ConvertArgs, settings: &Settings) -> anyhow::Result<i32> {
    let direction = resolve_direction(&args, settings)?;
    let forced = args.from.map(Dialect::from);
    debug!(input = %args.input.display(), %direction, ?forced, "Converting rule");

    let output = if is_stdio(&args.input) {
        let text = read_input(&args.input)?;
        convert(&text, direction, forced, None)?
    } else {
        convert_file(&args.input, direction, forced)?
    };

    match args.output.as_deref() {
        Some(path) if !is_stdio(path) => write_output(path, &output)?,
        _ => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(output.as_bytes())
                .context("failed to write standard output")?;
            stdout.flush().context("failed to write standard output")?;
        }
    }
    Ok(0)
}

fn resolve_direction(args: &ConvertArgs, settings: &Settings) -> anyhow::Result<Direction> {
    if let Some(direction) = args.direction {
        return Ok(direction.into());
    }
    if is_stdio(&args.input) {
        bail!("--direction is required when reading from standard input");
    }
    match settings.extensions().infer_direction(&args.input) {
        Some(direction) => Ok(direction),
        None => bail!(
            "cannot infer a direction from {} (expected a .{} or .{} file); pass --direction",
            args.input.display(),
            settings.cursor_extension,
            settings.windsurf_extension
        ),
    }
}

fn write_output(path: &Path, content: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(output = %path.display(), "Wrote converted rule");
    Ok(())
}
