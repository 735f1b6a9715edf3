use serde::Serialize;

use crate::error::PatternError;

/// The six matching options, JS-style. Each flag is a named boolean, so
/// a flag string can never contain duplicates by construction; the
/// string form is always assembled in the fixed code order `g i m s u y`
/// no matter the order the flags were toggled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FlagSet {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
    pub dot_all: bool,
    pub unicode: bool,
    pub sticky: bool,
}

/// Code and display name of every flag, in the fixed key order.
pub const FLAG_LEGEND: [(char, &str); 6] = [
    ('g', "global"),
    ('i', "case-insensitive"),
    ('m', "multiline"),
    ('s', "dotAll"),
    ('u', "unicode"),
    ('y', "sticky"),
];

impl FlagSet {
    /// Parse a flag string such as `"gi"`. Unknown or repeated codes
    /// are rejected, matching what `new RegExp` would do.
    pub fn parse(s: &str) -> Result<Self, PatternError> {
        let mut flags = Self::default();
        for code in s.chars() {
            let slot = flags
                .slot(code)
                .ok_or(PatternError::Flag { code })?;
            if *slot {
                return Err(PatternError::Flag { code });
            }
            *slot = true;
        }
        Ok(flags)
    }

    /// Flip one flag by code.
    pub fn toggle(&mut self, code: char) -> Result<(), PatternError> {
        let slot = self.slot(code).ok_or(PatternError::Flag { code })?;
        *slot = !*slot;
        Ok(())
    }

    fn slot(&mut self, code: char) -> Option<&mut bool> {
        match code {
            'g' => Some(&mut self.global),
            'i' => Some(&mut self.ignore_case),
            'm' => Some(&mut self.multiline),
            's' => Some(&mut self.dot_all),
            'u' => Some(&mut self.unicode),
            'y' => Some(&mut self.sticky),
            _ => None,
        }
    }

    fn get(self, code: char) -> bool {
        match code {
            'g' => self.global,
            'i' => self.ignore_case,
            'm' => self.multiline,
            's' => self.dot_all,
            'u' => self.unicode,
            'y' => self.sticky,
            _ => false,
        }
    }

    /// Inline flag group prepended to the compiled pattern, e.g. `(?im)`.
    ///
    /// Only `i`, `m` and `s` translate to engine syntax. `u` adds
    /// nothing because the engine is Unicode-native, and `g`/`y` drive
    /// the extractor's iteration protocol rather than the compiled
    /// pattern.
    #[must_use]
    pub fn inline_prefix(self) -> String {
        let mut inline = String::new();
        if self.ignore_case {
            inline.push('i');
        }
        if self.multiline {
            inline.push('m');
        }
        if self.dot_all {
            inline.push('s');
        }
        if inline.is_empty() {
            String::new()
        } else {
            format!("(?{inline})")
        }
    }
}

impl std::fmt::Display for FlagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (code, _) in FLAG_LEGEND {
            if self.get(code) {
                write!(f, "{code}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_string_uses_fixed_order() {
        // Toggled in reverse order, still printed g-first.
        let mut flags = FlagSet::default();
        flags.toggle('i').unwrap();
        flags.toggle('g').unwrap();
        assert_eq!(flags.to_string(), "gi");

        let all = FlagSet::parse("yusmig").unwrap();
        assert_eq!(all.to_string(), "gimsuy");
    }

    #[test]
    fn parse_round_trip() {
        for s in ["", "g", "gi", "gimsuy", "ms"] {
            assert_eq!(FlagSet::parse(s).unwrap().to_string(), s);
        }
    }

    #[test]
    fn parse_rejects_unknown_and_duplicate() {
        assert!(matches!(
            FlagSet::parse("gx"),
            Err(PatternError::Flag { code: 'x' })
        ));
        assert!(matches!(
            FlagSet::parse("gg"),
            Err(PatternError::Flag { code: 'g' })
        ));
    }

    #[test]
    fn inline_prefix_covers_engine_flags_only() {
        assert_eq!(FlagSet::parse("ims").unwrap().inline_prefix(), "(?ims)");
        assert_eq!(FlagSet::parse("i").unwrap().inline_prefix(), "(?i)");
        // g, u and y never reach the compiled pattern.
        assert_eq!(FlagSet::parse("guy").unwrap().inline_prefix(), "");
        assert_eq!(FlagSet::default().inline_prefix(), "");
    }
}
