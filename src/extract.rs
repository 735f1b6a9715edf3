use fancy_regex::{Captures, Match, Regex};

use crate::error::PatternError;
use crate::flags::FlagSet;
use crate::types::MatchRecord;

/// Hard cap on collected matches. Protects against pathological global
/// patterns producing unbounded output on large inputs.
pub const MAX_MATCHES: usize = 500;

/// Compile pattern plus flags into a matcher. The engine sees `i`/`m`/
/// `s` as an inline flag prefix; `g` and `y` only shape the iteration
/// below.
pub(crate) fn compile(pattern: &str, flags: &FlagSet) -> Result<Regex, PatternError> {
    let decorated = format!("{}{pattern}", flags.inline_prefix());
    Regex::new(&decorated).map_err(|e| PatternError::Compile {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

/// Find every occurrence of `pattern` in `text` under `flags`.
///
/// Without the global flag this is a single match attempt from the
/// start of the text, yielding zero or one record. With it, the search
/// advances an explicit byte cursor past each match, up to
/// [`MAX_MATCHES`] records. A zero-length match is recorded and then
/// the cursor is forced one step forward (to the next char boundary)
/// so the loop cannot stall. With the sticky flag a match that does
/// not begin exactly at the cursor counts as no match at all.
pub fn extract(
    pattern: &str,
    flags: &FlagSet,
    text: &str,
) -> Result<Vec<MatchRecord>, PatternError> {
    let matcher = compile(pattern, flags)?;
    run_matcher(&matcher, pattern, flags, text)
}

/// Iteration protocol shared by [`extract`] and the cached path.
pub(crate) fn run_matcher(
    matcher: &Regex,
    pattern: &str,
    flags: &FlagSet,
    text: &str,
) -> Result<Vec<MatchRecord>, PatternError> {
    let mut records = Vec::new();

    if !flags.global {
        if let Some(caps) = exec(matcher, pattern, text, 0)?
            && let Some(whole) = caps.get(0)
            && (!flags.sticky || whole.start() == 0)
        {
            records.push(record(1, &caps, whole));
        }
        return Ok(records);
    }

    let mut cursor = 0;
    while records.len() < MAX_MATCHES && cursor <= text.len() {
        let Some(caps) = exec(matcher, pattern, text, cursor)? else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };
        if flags.sticky && whole.start() != cursor {
            break;
        }
        records.push(record(records.len() + 1, &caps, whole));
        cursor = if whole.start() == whole.end() {
            next_boundary(text, whole.end())
        } else {
            whole.end()
        };
    }
    Ok(records)
}

fn exec<'t>(
    matcher: &Regex,
    pattern: &str,
    text: &'t str,
    pos: usize,
) -> Result<Option<Captures<'t>>, PatternError> {
    matcher
        .captures_from_pos(text, pos)
        .map_err(|e| PatternError::Exec {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// Unset capture slots are dropped, so group positions number the
/// groups that matched rather than the pattern's slots.
fn record(index: usize, caps: &Captures<'_>, whole: Match<'_>) -> MatchRecord {
    let groups = (1..caps.len())
        .filter_map(|slot| caps.get(slot))
        .map(|g| g.as_str().to_string())
        .collect();
    MatchRecord {
        index,
        value: whole.as_str().to_string(),
        start: whole.start(),
        end: whole.end(),
        groups,
    }
}

/// One code unit forward, rounded up to the next char boundary so byte
/// slicing stays valid. Past the end of the text this exceeds
/// `text.len()`, which terminates the search loop.
fn next_boundary(text: &str, pos: usize) -> usize {
    let mut next = pos + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(s: &str) -> FlagSet {
        FlagSet::parse(s).unwrap()
    }

    fn values(records: &[MatchRecord]) -> Vec<&str> {
        records.iter().map(|r| r.value.as_str()).collect()
    }

    #[test]
    fn non_global_single_attempt() {
        let records = extract("\\d+", &flags(""), "a12b34").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].index, 1);
        assert_eq!(records[0].value, "12");
        assert_eq!(records[0].start, 1);
        assert_eq!(records[0].end, 3);
    }

    #[test]
    fn global_collects_all_matches() {
        let records = extract("\\d+", &flags("g"), "a12b34").unwrap();
        assert_eq!(values(&records), ["12", "34"]);
        assert_eq!(records[0].index, 1);
        assert_eq!(records[1].index, 2);
        assert_eq!(records[1].start, 4);
        assert_eq!(records[1].end, 6);
    }

    #[test]
    fn zero_length_matches_terminate() {
        // Empty match at every position, including past the last char.
        let records = extract("a*", &flags("g"), "bb").unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.value.is_empty()));
        assert_eq!(records[2].start, 2);

        // Mixed zero and nonzero length.
        let records = extract("a*", &flags("g"), "aab").unwrap();
        assert_eq!(values(&records), ["aa", "", ""]);
    }

    #[test]
    fn match_count_is_capped() {
        let text = "a".repeat(10_000);
        let records = extract("a", &flags("g"), &text).unwrap();
        assert_eq!(records.len(), MAX_MATCHES);
    }

    #[test]
    fn compile_failure_reports_engine_message() {
        let err = extract("(", &flags("g"), "anything").unwrap_err();
        match err {
            PatternError::Compile { pattern, message } => {
                assert_eq!(pattern, "(");
                assert!(!message.is_empty());
            }
            other => panic!("expected compile error, got {other:?}"),
        }
    }

    #[test]
    fn unset_groups_are_filtered() {
        let records = extract("(a)|(b)", &flags("g"), "ab").unwrap();
        assert_eq!(records[0].groups, ["a"]);
        // Second alternative: slot 1 unset, slot 2 becomes position 0.
        assert_eq!(records[1].groups, ["b"]);
    }

    #[test]
    fn case_insensitive_flag_reaches_engine() {
        let records = extract("hello", &flags("i"), "say Hello").unwrap();
        assert_eq!(values(&records), ["Hello"]);
    }

    #[test]
    fn sticky_requires_match_at_cursor() {
        assert!(extract("a", &flags("y"), "ba").unwrap().is_empty());

        let records = extract("a", &flags("gy"), "aab").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].start, 1);
    }

    #[test]
    fn offsets_are_byte_offsets() {
        let records = extract("\\d+", &flags("g"), "αβ12").unwrap();
        assert_eq!(records[0].start, 4);
        assert_eq!(records[0].end, 6);
        assert_eq!(records[0].end - records[0].start, records[0].value.len());
    }

    #[test]
    fn zero_length_advance_respects_char_boundaries() {
        // Forced advancement over multi-byte chars must not split them.
        let records = extract("x*", &flags("g"), "éé").unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].start, 2);
        assert_eq!(records[2].start, 4);
    }

    #[test]
    fn backreference_patterns_are_supported() {
        let records = extract("(\\w)\\1", &flags("g"), "aabcc").unwrap();
        assert_eq!(values(&records), ["aa", "cc"]);
    }

    #[test]
    fn lookahead_patterns_are_supported() {
        let records = extract("\\d+(?= dollars)", &flags("g"), "10 dollars and 5 cents").unwrap();
        assert_eq!(values(&records), ["10"]);
    }
}
