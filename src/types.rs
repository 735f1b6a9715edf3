use serde::Serialize;

/// One syntactic unit of a pattern, paired with a human-readable
/// description. Tokens are contiguous: concatenating `text` over a
/// tokenization reproduces the pattern exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub text: String,
    pub description: &'static str,
}

/// One occurrence of the pattern within the sample text.
///
/// Offsets are byte offsets into the text and always fall on char
/// boundaries, so `end - start == value.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    /// 1-based position in the result sequence.
    pub index: usize,
    pub value: String,
    pub start: usize,
    pub end: usize,
    /// Captured-group values with unset slots filtered out. Positions
    /// here number the groups that matched, not the pattern's slots.
    pub groups: Vec<String>,
}

/// A contiguous slice of the sample text, marked matched or plain.
/// Segments cover the text exactly once, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSegment {
    pub text: String,
    pub matched: bool,
}

/// Overall condition of a playground session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Empty pattern or empty text, nothing computed.
    Idle,
    /// Last extraction succeeded.
    Valid,
    /// Last compile or match attempt failed.
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Valid => write!(f, "valid"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Character and line counts of the sample text, shown alongside the
/// match report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TextStats {
    pub chars: usize,
    pub lines: usize,
}

impl TextStats {
    /// Lines are `\n`-separated parts, so even an empty text counts as
    /// one line.
    #[must_use]
    pub fn of(text: &str) -> Self {
        Self {
            chars: text.chars().count(),
            lines: text.split('\n').count(),
        }
    }
}

/// A canned pattern from the built-in library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub pattern: &'static str,
    pub description: &'static str,
    pub category: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_stats_counts() {
        assert_eq!(TextStats::of(""), TextStats { chars: 0, lines: 1 });
        assert_eq!(TextStats::of("a\nb"), TextStats { chars: 3, lines: 2 });
        // Trailing newline opens an empty final line.
        assert_eq!(TextStats::of("a\n"), TextStats { chars: 2, lines: 2 });
        // Chars, not bytes.
        assert_eq!(TextStats::of("héé"), TextStats { chars: 3, lines: 1 });
    }
}
