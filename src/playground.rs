//! Stateful playground session: pattern, flags, sample text, and the
//! derived match results, with pattern edits debounced behind a 200 ms
//! window.
//!
//! The debounce is data, not a timer thread: a staged edit carries its
//! deadline, and the owning surface calls [`Playground::poll`] with the
//! current `Instant` before reading state. A fresh edit overwrites the
//! staged one and restarts the clock, so at most one application ever
//! results from a burst of edits.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::cache::CompiledCache;
use crate::error::PatternError;
use crate::explain::tokenize;
use crate::flags::FlagSet;
use crate::highlight::segment;
use crate::library;
use crate::types::{HighlightSegment, MatchRecord, Status, TextStats, Token};

/// How long a pattern edit sits before it is applied.
pub const DEBOUNCE: Duration = Duration::from_millis(200);

pub const DEFAULT_PATTERN: &str = r"\w+";
pub const DEFAULT_TEXT: &str = "Hello World! This is a test string with 123 numbers.";

/// A pattern edit waiting out its debounce window.
struct PendingEdit {
    value: String,
    due: Instant,
}

/// Composite read-only snapshot of a session. Everything a front end
/// needs to render one frame, in one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub pattern: String,
    pub flags: String,
    pub stats: TextStats,
    pub matches: Vec<MatchRecord>,
    pub segments: Vec<HighlightSegment>,
    pub tokens: Vec<Token>,
    pub debounce_pending: bool,
}

pub struct Playground {
    cache: CompiledCache,
    pattern: String,
    flags: FlagSet,
    text: String,
    pending: Option<PendingEdit>,
    status: Status,
    error: Option<String>,
    matches: Vec<MatchRecord>,
}

impl Playground {
    /// A session with the stock starting point: word matching over a
    /// short sample sentence, global flag on.
    #[must_use]
    pub fn new(cache: CompiledCache) -> Self {
        let mut session = Self {
            cache,
            pattern: DEFAULT_PATTERN.to_string(),
            flags: FlagSet {
                global: true,
                ..FlagSet::default()
            },
            text: DEFAULT_TEXT.to_string(),
            pending: None,
            status: Status::Idle,
            error: None,
            matches: Vec::new(),
        };
        session.recompute();
        session
    }

    // --- edits ---

    /// Stage a pattern edit to apply [`DEBOUNCE`] after `now`. A second
    /// edit inside the window replaces the first and restarts the
    /// clock; nothing is recomputed until the deadline passes.
    pub fn edit_pattern(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some(PendingEdit {
            value: value.into(),
            due: now + DEBOUNCE,
        });
    }

    /// Apply the staged edit if its deadline has passed. Returns true
    /// when an application (and recomputation) happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(pending) = &self.pending
            && now >= pending.due
        {
            self.apply_pending();
            return true;
        }
        false
    }

    /// Apply any staged edit without waiting out the window.
    pub fn flush(&mut self) -> bool {
        if self.pending.is_some() {
            self.apply_pending();
            return true;
        }
        false
    }

    fn apply_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.pattern = pending.value;
            self.recompute();
        }
    }

    /// Replace the sample text and recompute immediately. A staged
    /// pattern edit stays staged; matching uses the applied pattern.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.recompute();
    }

    /// Replace the whole flag set and recompute immediately.
    pub fn set_flags(&mut self, flags: FlagSet) {
        self.flags = flags;
        self.recompute();
    }

    /// Flip one flag by code and recompute immediately. Unknown codes
    /// leave the set untouched.
    pub fn toggle_flag(&mut self, code: char) -> Result<(), PatternError> {
        self.flags.toggle(code)?;
        self.recompute();
        Ok(())
    }

    /// Stage a library pattern as a debounced edit, same path as a
    /// hand-typed one.
    pub fn use_preset(&mut self, name: &str, now: Instant) -> Result<(), PatternError> {
        let Some(preset) = library::find(name) else {
            return Err(PatternError::UnknownPreset {
                name: name.to_string(),
                suggestion: library::suggest(name),
            });
        };
        self.edit_pattern(preset.pattern, now);
        Ok(())
    }

    // --- state ---

    fn recompute(&mut self) {
        self.matches.clear();
        self.error = None;
        if self.pattern.is_empty() || self.text.is_empty() {
            self.status = Status::Idle;
            return;
        }
        match self.cache.extract(&self.pattern, &self.flags, &self.text) {
            Ok(matches) => {
                self.matches = matches;
                self.status = Status::Valid;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.status = Status::Error;
            }
        }
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn flags(&self) -> FlagSet {
        self.flags
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    /// Drop cached matchers older than `max_age`. Long sessions shed
    /// every abandoned pattern this way.
    pub fn prune_cache(&self, max_age: Duration) {
        self.cache.prune(max_age);
    }

    /// Snapshot every derived model at once. Tokens describe the
    /// applied pattern, never a still-staged edit, so the explanation
    /// can never get ahead of the matches.
    #[must_use]
    pub fn view(&self) -> View {
        View {
            status: self.status,
            error: self.error.clone(),
            pattern: self.pattern.clone(),
            flags: self.flags.to_string(),
            stats: TextStats::of(&self.text),
            matches: self.matches.clone(),
            segments: segment(&self.text, &self.matches),
            tokens: tokenize(&self.pattern),
            debounce_pending: self.pending.is_some(),
        }
    }
}
