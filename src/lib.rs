#![warn(clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,   // Rust naming conventions
    clippy::missing_errors_doc,        // one crate-wide error enum, self-describing
    clippy::missing_panics_doc,        // non-test code does not panic
    clippy::must_use_candidate,        // pure helpers are marked where it matters
)]

pub mod cache;
pub mod error;
pub mod explain;
pub mod extract;
pub mod flags;
pub mod format;
pub mod highlight;
pub mod library;
pub mod playground;
pub mod serve;
pub mod types;

use error::PatternError;
use flags::FlagSet;
use playground::View;
use types::{Status, TextStats};

/// The one-shot public API behind the CLI's default action:
/// parse flags → evaluate → render the text report.
pub fn run(
    pattern: &str,
    flag_codes: &str,
    text: &str,
    color: bool,
) -> Result<String, PatternError> {
    let flags = FlagSet::parse(flag_codes)?;
    let view = evaluate(pattern, &flags, text)?;
    Ok(format::report(&view, color))
}

/// Evaluate one (pattern, flags, text) triple outside any session.
/// Empty pattern or text short-circuits to an Idle view; compile and
/// runtime failures surface as errors for the caller's exit path.
pub fn evaluate(pattern: &str, flags: &FlagSet, text: &str) -> Result<View, PatternError> {
    let (status, matches) = if pattern.is_empty() || text.is_empty() {
        (Status::Idle, Vec::new())
    } else {
        (Status::Valid, extract::extract(pattern, flags, text)?)
    };
    let segments = highlight::segment(text, &matches);
    Ok(View {
        status,
        error: None,
        pattern: pattern.to_string(),
        flags: flags.to_string(),
        stats: TextStats::of(text),
        matches,
        segments,
        tokens: explain::tokenize(pattern),
        debounce_pending: false,
    })
}
