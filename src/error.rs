use std::path::PathBuf;

/// Every error rexpad can produce. Displayed as user-facing messages;
/// the playground controller catches these and turns them into its
/// error state instead of aborting.
#[derive(Debug)]
pub enum PatternError {
    /// Pattern plus flags failed to compile; `message` is the engine's
    /// diagnostic, verbatim.
    Compile { pattern: String, message: String },
    /// The engine gave up at match time (backtrack limit on a
    /// catastrophic pattern). Same user-visible handling as `Compile`.
    Exec { pattern: String, message: String },
    /// Unknown or duplicate flag code in a flag string.
    Flag { code: char },
    UnknownPreset {
        name: String,
        suggestion: Option<String>,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Compile { pattern, message } => {
                write!(f, "invalid pattern /{pattern}/: {message}")
            }
            Self::Exec { pattern, message } => {
                write!(f, "pattern /{pattern}/ failed while matching: {message}")
            }
            Self::Flag { code } => {
                write!(f, "invalid flag '{code}' (each of g i m s u y at most once)")
            }
            Self::UnknownPreset { name, suggestion } => {
                write!(f, "unknown preset \"{name}\"")?;
                if let Some(s) = suggestion {
                    write!(f, ", did you mean \"{s}\"?")?;
                }
                Ok(())
            }
            Self::Io { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for PatternError {}

impl PatternError {
    /// Process exit code for the one-shot CLI.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Compile { .. } | Self::Exec { .. } | Self::Flag { .. } => 3,
            Self::UnknownPreset { .. } | Self::Io { .. } => 2,
        }
    }
}
