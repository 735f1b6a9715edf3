//! Built-in pattern library.
//!
//! A small curated set of everyday patterns, grouped by category. The
//! table order is the display order, and categories are reported in
//! first-appearance order.

use crate::types::Preset;

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "Email",
        pattern: r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}",
        description: "Matches most common email addresses",
        category: "Common",
    },
    Preset {
        name: "URL",
        pattern: r"https?:\/\/(www\.)?[-a-zA-Z0-9@:%._\+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b([-a-zA-Z0-9()@:%_\+.~#?&//=]*)",
        description: "Matches HTTP and HTTPS URLs",
        category: "Common",
    },
    Preset {
        name: "Phone (International)",
        pattern: r"\+?[1-9]\d{1,14}",
        description: "Matches international phone numbers (E.164 format)",
        category: "Common",
    },
    Preset {
        name: "Username",
        pattern: r"^[a-zA-Z0-9_]{3,16}$",
        description: "Letters, digits, underscore, 3-16 characters",
        category: "Validation",
    },
    Preset {
        name: "Strong Password",
        pattern: r"^(?=.*[a-z])(?=.*[A-Z])(?=.*\d)(?=.*[@$!%*?&])[A-Za-z\d@$!%*?&]{8,}$",
        description: "Min 8 chars, uppercase, lowercase, digit, special char",
        category: "Validation",
    },
    Preset {
        name: "IPv4 Address",
        pattern: r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b",
        description: "Matches valid IPv4 addresses",
        category: "Network",
    },
    Preset {
        name: "Hex Color",
        pattern: r"#?([a-fA-F0-9]{6}|[a-fA-F0-9]{3})",
        description: "Matches hex color codes (#fff or #ffffff)",
        category: "Web",
    },
    Preset {
        name: "Date (YYYY-MM-DD)",
        pattern: r"\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])",
        description: "Matches dates in YYYY-MM-DD format",
        category: "Date/Time",
    },
    Preset {
        name: "Credit Card",
        pattern: r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b",
        description: "Matches credit card numbers (with optional separators)",
        category: "Financial",
    },
    Preset {
        name: "HTML Tag",
        pattern: r"<([a-z]+)([^<]+)*(?:>(.*)<\/\1>|\s+\/>)",
        description: "Matches HTML tags",
        category: "Web",
    },
];

// --- lookup ---

/// Every preset, in display order.
#[must_use]
pub fn all() -> &'static [Preset] {
    PRESETS
}

/// Exact name lookup, ASCII case-insensitive.
#[must_use]
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

/// Distinct categories in first-appearance order.
#[must_use]
pub fn categories() -> Vec<&'static str> {
    let mut seen = Vec::new();
    for preset in PRESETS {
        if !seen.contains(&preset.category) {
            seen.push(preset.category);
        }
    }
    seen
}

/// Best-effort suggestion for a failed lookup: a preset whose name
/// starts with the query, else one containing it.
#[must_use]
pub fn suggest(name: &str) -> Option<String> {
    let needle = name.to_lowercase();
    if needle.is_empty() {
        return None;
    }
    PRESETS
        .iter()
        .find(|p| p.name.to_lowercase().starts_with(&needle))
        .or_else(|| PRESETS.iter().find(|p| p.name.to_lowercase().contains(&needle)))
        .map(|p| p.name.to_string())
}
