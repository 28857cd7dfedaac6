//! `ruleshift detect`

use super::read_input;
use crate::cli::DetectArgs;
use ruleshift::{detect_dialect, Dialect};

/// Printed when neither dialect can be established
pub const UNDETERMINED: &str = "undetermined";

/// Print the dialect of one file or stdin
pub fn run(args: DetectArgs) -> anyhow::Result<i32> {
    let text = read_input(&args.input)?;
    let dialect = detect_dialect(&text, None);
    tracing::debug!(input = %args.input.display(), ?dialect, "Detected dialect");
    println!("{}", describe(dialect));
    Ok(0)
}

fn describe(dialect: Option<Dialect>) -> &'static str {
    dialect.map_or(UNDETERMINED, Dialect::as_str)
}
