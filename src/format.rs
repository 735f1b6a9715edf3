use std::fmt::Write;

use owo_colors::OwoColorize;

use crate::playground::View;
use crate::types::{HighlightSegment, Preset, Token};

/// Build the full evaluation report:
/// header, match summary, text statistics, highlighted text, details.
/// An error view renders the header and the message, nothing else.
pub fn report(view: &View, color: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# /{}/{}", view.pattern, view.flags);

    if let Some(error) = &view.error {
        let _ = writeln!(out, "{error}");
        return out;
    }

    let _ = writeln!(out, "{}", summary(view.matches.len()));
    let _ = writeln!(
        out,
        "Characters: {} | Lines: {}",
        view.stats.chars, view.stats.lines
    );

    if view.matches.is_empty() {
        return out;
    }

    let _ = writeln!(out, "\n## Highlighted Text");
    let _ = writeln!(out, "{}", highlighted(&view.segments, color));

    let _ = writeln!(out, "\n## Match Details");
    let width = view
        .matches
        .last()
        .map_or(1, |m| m.index.to_string().len());
    for m in &view.matches {
        let _ = writeln!(
            out,
            "#{:<width$}  {:?}  {}-{}",
            m.index, m.value, m.start, m.end
        );
        for (slot, group) in m.groups.iter().enumerate() {
            let _ = writeln!(out, "    ${}: {group}", slot + 1);
        }
    }
    out
}

/// `Found N match(es)` or `No matches found`, singular/plural exact.
fn summary(count: usize) -> String {
    if count == 0 {
        "No matches found".to_string()
    } else {
        format!("Found {count} match{}", if count == 1 { "" } else { "es" })
    }
}

/// Render segments as one run of text. Matched spans go black-on-yellow
/// when color is on, guillemet-wrapped otherwise.
fn highlighted(segments: &[HighlightSegment], color: bool) -> String {
    let mut out = String::new();
    for seg in segments {
        if seg.matched {
            if color {
                let _ = write!(out, "{}", seg.text.black().on_yellow());
            } else {
                let _ = write!(out, "\u{ab}{}\u{bb}", seg.text);
            }
        } else {
            out.push_str(&seg.text);
        }
    }
    out
}

/// Token-by-token explanation, two aligned columns.
pub fn explanation(pattern: &str, tokens: &[Token]) -> String {
    if pattern.is_empty() {
        return "Enter a regex pattern to see its explanation\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "# Explanation: /{pattern}/");
    let width = tokens
        .iter()
        .map(|t| t.text.chars().count())
        .max()
        .unwrap_or(0);
    for token in tokens {
        let pad = width - token.text.chars().count();
        let _ = writeln!(out, "{}{:pad$}  {}", token.text, "", token.description);
    }
    out
}

/// The built-in library, one `##` section per category in
/// first-appearance order.
pub fn preset_listing(presets: &[Preset], categories: &[&str]) -> String {
    let mut out = String::from("# Pattern Library\n");
    for category in categories {
        let _ = writeln!(out, "\n## {category}");
        for preset in presets.iter().filter(|p| p.category == *category) {
            let _ = writeln!(out, "{} \u{2014} {}", preset.name, preset.description);
            let _ = writeln!(out, "  /{}/", preset.pattern);
        }
    }
    out
}
