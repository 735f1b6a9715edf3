use memchr::memchr_iter;

use crate::types::Token;

/// Split a pattern into labeled syntactic tokens for explanatory display.
///
/// Total function: anything unrecognized degrades to a one-character
/// "special character or literal" token, so the scan always terminates
/// and the concatenated token texts reproduce the pattern exactly.
///
/// Single left-to-right pass, priority cascade:
/// 1. known two-character escapes (`\d`, `\b`, `\n`, ...)
/// 2. `[...]` character class up to the next unescaped `]`
/// 3. `(...)` group, tracking nested parenthesis depth
/// 4. `{...}` bounded quantifier up to the next `}`
/// 5. single-character metacharacters (`.` `^` `$` `*` `+` `?` `|`, lone `\`)
/// 6. maximal run of ASCII alphanumerics as one literal token
/// 7. fallback: one character
///
/// Bracketed constructs missing their closer fall through: an unclosed
/// `[` or `{` is tokenized via rules 5-7, an unclosed `(` consumes to
/// the end of the string.
#[must_use]
pub fn tokenize(pattern: &str) -> Vec<Token> {
    let bytes = pattern.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < pattern.len() {
        // Known escape sequences. `get` rejects a slice ending inside a
        // multi-byte char, which cannot be a table escape anyway.
        if bytes[i] == b'\\'
            && let Some(esc) = pattern.get(i..i + 2)
            && let Some(description) = escape_description(esc)
        {
            tokens.push(Token {
                text: esc.to_string(),
                description,
            });
            i += 2;
            continue;
        }

        // Character class up to the next unescaped `]`.
        if bytes[i] == b'['
            && let Some(close) = find_unescaped(pattern, i + 1, b']')
        {
            tokens.push(Token {
                text: pattern[i..=close].to_string(),
                description: "Character class (matches any character inside)",
            });
            i = close + 1;
            continue;
        }

        // Group with nested-depth tracking. Unbalanced groups consume
        // the rest of the pattern.
        if bytes[i] == b'(' {
            let mut depth = 1;
            let mut j = i + 1;
            while j < bytes.len() && depth > 0 {
                match bytes[j] {
                    b'(' => depth += 1,
                    b')' => depth -= 1,
                    _ => {}
                }
                j += 1;
            }
            let text = &pattern[i..j];
            let description = if text.starts_with("(?:") {
                "Non-capturing group"
            } else {
                "Capturing group"
            };
            tokens.push(Token {
                text: text.to_string(),
                description,
            });
            i = j;
            continue;
        }

        // Bounded quantifier `{m,n}`.
        if bytes[i] == b'{'
            && let Some(offset) = memchr::memchr(b'}', &bytes[i + 1..])
        {
            let close = i + 1 + offset;
            tokens.push(Token {
                text: pattern[i..=close].to_string(),
                description: "Quantifier (specific number of repetitions)",
            });
            i = close + 1;
            continue;
        }

        let Some(ch) = pattern[i..].chars().next() else {
            break;
        };

        // Single-character metacharacters.
        if let Some(description) = single_description(ch) {
            tokens.push(Token {
                text: ch.to_string(),
                description,
            });
            i += ch.len_utf8();
            continue;
        }

        // Maximal ASCII-alphanumeric run as one literal token.
        if ch.is_ascii_alphanumeric() {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_alphanumeric() {
                j += 1;
            }
            tokens.push(Token {
                text: pattern[i..j].to_string(),
                description: "Literal character(s)",
            });
            i = j;
            continue;
        }

        tokens.push(Token {
            text: ch.to_string(),
            description: "Special character or literal",
        });
        i += ch.len_utf8();
    }

    tokens
}

/// Documented two-character escape sequences.
fn escape_description(esc: &str) -> Option<&'static str> {
    match esc {
        "\\d" => Some("Digit (0-9)"),
        "\\D" => Some("Non-digit"),
        "\\w" => Some("Word character (letters, digits, underscore)"),
        "\\W" => Some("Non-word character"),
        "\\s" => Some("Whitespace (space, tab, newline)"),
        "\\S" => Some("Non-whitespace"),
        "\\b" => Some("Word boundary"),
        "\\B" => Some("Non-word boundary"),
        "\\n" => Some("Newline"),
        "\\r" => Some("Carriage return"),
        "\\t" => Some("Tab"),
        _ => None,
    }
}

/// Documented single-character metacharacters. A lone `\` lands here
/// when its escape is not in the table or nothing follows it.
fn single_description(ch: char) -> Option<&'static str> {
    match ch {
        '.' => Some("Any character (except newline)"),
        '^' => Some("Start of string/line"),
        '$' => Some("End of string/line"),
        '*' => Some("Zero or more times"),
        '+' => Some("One or more times"),
        '?' => Some("Zero or one time (optional)"),
        '|' => Some("Alternation (OR)"),
        '\\' => Some("Escape character"),
        _ => None,
    }
}

/// Position of the next `delim` at or after `from` that is not preceded
/// by an odd run of backslashes. Delimiters are ASCII, so the byte scan
/// is UTF-8 safe.
fn find_unescaped(pattern: &str, from: usize, delim: u8) -> Option<usize> {
    let bytes = pattern.as_bytes();
    if from >= bytes.len() {
        return None;
    }
    for offset in memchr_iter(delim, &bytes[from..]) {
        let pos = from + offset;
        let mut backslashes = 0;
        while backslashes < pos && bytes[pos - 1 - backslashes] == b'\\' {
            backslashes += 1;
        }
        if backslashes % 2 == 0 {
            return Some(pos);
        }
    }
    None
}
