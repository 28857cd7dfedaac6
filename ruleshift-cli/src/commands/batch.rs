//! `ruleshift batch`

use crate::cli::BatchArgs;
use crate::config::Settings;
use anyhow::Context;
use ruleshift::{convert_tree, BatchOptions, BatchReport, Dialect, FileOutcome, SkipReason};
use std::io::Write;

/// Convert a directory tree and print a report
///
/// Exits with 1 when any file failed, even though the batch itself ran.
pub fn run(args: BatchArgs, settings: &Settings) -> anyhow::Result<i32> {
    let options = build_options(&args, settings);
    let report = convert_tree(&args.dir, &options)?;

    let mut stdout = std::io::stdout().lock();
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        writeln!(stdout, "{}", json).context("failed to write standard output")?;
    } else {
        write_summary(&mut stdout, &report, options.dry_run)
            .context("failed to write standard output")?;
    }

    Ok(if report.has_errors() { 1 } else { 0 })
}

fn build_options(args: &BatchArgs, settings: &Settings) -> BatchOptions {
    let mut options = BatchOptions::new(args.direction.into());
    options.forced = args.from.map(Dialect::from);
    options.output_dir = args.out.clone();
    options.overwrite = args.overwrite || settings.overwrite;
    options.fail_fast = args.fail_fast || settings.fail_fast;
    options.dry_run = args.dry_run;
    options.extensions = settings.extensions();
    options
}

fn write_summary(out: &mut impl Write, report: &BatchReport, dry_run: bool) -> std::io::Result<()> {
    for file in &report.files {
        let path = file.path.display();
        match &file.outcome {
            FileOutcome::Converted { output, .. } => {
                let verb = if dry_run { "would convert" } else { "converted" };
                writeln!(out, "{} {} -> {}", verb, path, output.display())?;
            }
            FileOutcome::Skipped { reason } => {
                let why = match reason {
                    SkipReason::OutputExists => "output exists",
                    SkipReason::AlreadyConverted => "already converted",
                };
                writeln!(out, "skipped {} ({})", path, why)?;
            }
            FileOutcome::Failed { code, message } => {
                writeln!(out, "failed {} [{}]: {}", path, code, message)?;
            }
        }
    }
    writeln!(
        out,
        "{} converted, {} skipped, {} errored",
        report.converted, report.skipped, report.errored
    )
}
