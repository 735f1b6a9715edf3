use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use rexpad::error::PatternError;
use rexpad::explain::tokenize;
use rexpad::flags::{FLAG_LEGEND, FlagSet};
use rexpad::playground::{DEFAULT_PATTERN, DEFAULT_TEXT};
use rexpad::{format, library};

/// rexpad — a regular-expression playground for the terminal.
/// Evaluate a pattern against sample text and see every match with its
/// captured groups, the text with matches highlighted, and a
/// token-by-token explanation of the pattern.
#[derive(Parser)]
#[command(name = "rexpad", version, about)]
struct Cli {
    /// Regex pattern to evaluate. Defaults to a word matcher.
    pattern: Option<String>,

    /// Flag codes, any subset of "gimsuy".
    #[arg(long, default_value = "g", long_help = flags_long_help())]
    flags: String,

    /// Sample text to match against.
    #[arg(long)]
    text: Option<String>,

    /// Read the sample text from a file.
    #[arg(long, value_name = "PATH", conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Append a token-by-token explanation of the pattern.
    #[arg(long)]
    explain: bool,

    /// Evaluate a pattern from the built-in library instead.
    #[arg(long, value_name = "NAME", conflicts_with = "pattern")]
    preset: Option<String>,

    /// Print the built-in pattern library and exit.
    #[arg(long)]
    presets: bool,

    /// Machine-readable JSON output.
    #[arg(long)]
    json: bool,

    /// Run as a JSON-RPC 2.0 playground server on stdio.
    #[arg(long)]
    serve: bool,

    /// Print shell completions for the given shell.
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() {
    let cli = Cli::parse();

    // Shell completions
    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "rexpad", &mut io::stdout());
        return;
    }

    // Server mode: JSON-RPC on stdio
    if cli.serve {
        if let Err(e) = rexpad::serve::run() {
            eprintln!("serve error: {e}");
            process::exit(1);
        }
        return;
    }

    let is_tty = io::stdout().is_terminal();

    if cli.presets {
        let listing = format::preset_listing(library::all(), &library::categories());
        emit_output(&listing, is_tty);
        return;
    }

    match execute(&cli, is_tty) {
        Ok(output) => emit_output(&output, is_tty),
        Err(e) => {
            eprintln!("{e}");
            process::exit(e.exit_code());
        }
    }
}

fn execute(cli: &Cli, is_tty: bool) -> Result<String, PatternError> {
    let pattern = resolve_pattern(cli)?;
    let text = resolve_text(cli)?;

    if cli.json {
        let flags = FlagSet::parse(&cli.flags)?;
        let view = rexpad::evaluate(&pattern, &flags, &text)?;
        return Ok(serde_json::to_string_pretty(&view)
            .expect("view models are always serializable"));
    }

    let mut output = rexpad::run(&pattern, &cli.flags, &text, is_tty)?;
    if cli.explain {
        output.push('\n');
        output.push_str(&format::explanation(&pattern, &tokenize(&pattern)));
    }
    Ok(output)
}

fn resolve_pattern(cli: &Cli) -> Result<String, PatternError> {
    if let Some(name) = &cli.preset {
        let Some(preset) = library::find(name) else {
            return Err(PatternError::UnknownPreset {
                name: name.clone(),
                suggestion: library::suggest(name),
            });
        };
        return Ok(preset.pattern.to_string());
    }
    Ok(cli
        .pattern
        .clone()
        .unwrap_or_else(|| DEFAULT_PATTERN.to_string()))
}

/// Sample text precedence: --text, --file, piped stdin, stock sample.
fn resolve_text(cli: &Cli) -> Result<String, PatternError> {
    if let Some(text) = &cli.text {
        return Ok(text.clone());
    }
    if let Some(path) = &cli.file {
        return std::fs::read_to_string(path).map_err(|source| PatternError::Io {
            path: path.clone(),
            source,
        });
    }
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        let mut buf = String::new();
        stdin
            .lock()
            .read_to_string(&mut buf)
            .map_err(|source| PatternError::Io {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        return Ok(buf);
    }
    Ok(DEFAULT_TEXT.to_string())
}

/// Long help for --flags: the legend, one `code = name` pair per flag.
fn flags_long_help() -> String {
    let legend: Vec<String> = FLAG_LEGEND
        .into_iter()
        .map(|(code, name)| format!("{code} = {name}"))
        .collect();
    format!("Flag codes, any subset of \"gimsuy\": {}", legend.join(", "))
}

/// Write output to stdout. When TTY and output is long, pipe through $PAGER.
fn emit_output(output: &str, is_tty: bool) {
    let line_count = output.lines().count();

    if is_tty && line_count > terminal_height() {
        let pager = std::env::var("PAGER").unwrap_or_else(|_| "less".into());
        if let Ok(mut child) = process::Command::new(&pager)
            .arg("-R")
            .stdin(process::Stdio::piped())
            .spawn()
        {
            if let Some(ref mut stdin) = child.stdin.take() {
                let _ = stdin.write_all(output.as_bytes());
            }
            let _ = child.wait();
            return;
        }
    }

    println!("{output}");
}

fn terminal_height() -> usize {
    // LINES is set by some shells; otherwise assume a standard window.
    std::env::var("LINES")
        .ok()
        .and_then(|lines| lines.parse().ok())
        .unwrap_or(24)
}
