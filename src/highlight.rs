use crate::types::{HighlightSegment, MatchRecord};

/// Partition `text` into alternating plain and matched spans for
/// display. Pure function; the concatenated segment texts always
/// reproduce `text` exactly, and zero-length matches yield zero-length
/// matched segments.
///
/// Matches are stable-sorted by start offset first; callers may hand
/// them over in any order. Offsets must be char-boundary byte offsets
/// into this same `text`, which holds for anything produced by
/// [`crate::extract::extract`] on it.
#[must_use]
pub fn segment(text: &str, matches: &[MatchRecord]) -> Vec<HighlightSegment> {
    if matches.is_empty() {
        return vec![HighlightSegment {
            text: text.to_string(),
            matched: false,
        }];
    }

    let mut sorted: Vec<&MatchRecord> = matches.iter().collect();
    sorted.sort_by_key(|m| m.start);

    let mut segments = Vec::new();
    let mut cursor = 0;
    for m in sorted {
        if m.start > cursor {
            segments.push(HighlightSegment {
                text: text[cursor..m.start].to_string(),
                matched: false,
            });
        }
        segments.push(HighlightSegment {
            text: text[m.start..m.end].to_string(),
            matched: true,
        });
        cursor = m.end;
    }
    if cursor < text.len() {
        segments.push(HighlightSegment {
            text: text[cursor..].to_string(),
            matched: false,
        });
    }
    segments
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::extract::extract;
    use crate::flags::FlagSet;

    fn matches_of(pattern: &str, text: &str) -> Vec<MatchRecord> {
        extract(pattern, &FlagSet::parse("g").unwrap(), text).unwrap()
    }

    fn rejoin(segments: &[HighlightSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn no_matches_is_one_plain_segment() {
        let segments = segment("hello world", &[]);
        assert_eq!(segments.len(), 1);
        assert!(!segments[0].matched);
        assert_eq!(segments[0].text, "hello world");
    }

    #[test]
    fn alternating_partition() {
        let text = "a12b34";
        let segments = segment(text, &matches_of("\\d+", text));
        let expected: Vec<(&str, bool)> =
            vec![("a", false), ("12", true), ("b", false), ("34", true)];
        let got: Vec<(&str, bool)> = segments
            .iter()
            .map(|s| (s.text.as_str(), s.matched))
            .collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn leading_match_has_no_empty_gap() {
        let text = "12ab";
        let segments = segment(text, &matches_of("\\d+", text));
        assert!(segments[0].matched);
        assert_eq!(segments[0].text, "12");
        assert_eq!(segments[1].text, "ab");
    }

    #[test]
    fn coverage_and_idempotence() {
        for (pattern, text) in [
            ("\\d+", "a12b34c"),
            ("\\w+", "Hello World! 123"),
            ("x", "no hits here"),
            ("a*", "bbaab"),
            ("é", "désolé"),
        ] {
            let matches = matches_of(pattern, text);
            let first = segment(text, &matches);
            assert_eq!(rejoin(&first), text, "coverage broken for {pattern:?}");
            assert_eq!(segment(text, &matches), first, "not idempotent");
        }
    }

    #[test]
    fn out_of_order_matches_are_sorted() {
        let text = "a12b34";
        let mut matches = matches_of("\\d+", text);
        matches.reverse();
        let segments = segment(text, &matches);
        assert_eq!(rejoin(&segments), text);
        assert_eq!(segments[1].text, "12");
    }

    #[test]
    fn zero_length_matches_keep_full_coverage() {
        let text = "bb";
        let segments = segment(text, &matches_of("a*", text));
        assert_eq!(rejoin(&segments), text);
        // Empty matched segments interleave with the real chars.
        assert!(segments.iter().any(|s| s.matched && s.text.is_empty()));
    }
}
