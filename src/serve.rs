use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::CompiledCache;
use crate::error::PatternError;
use crate::explain::tokenize;
use crate::extract::extract;
use crate::flags::FlagSet;
use crate::highlight::segment;
use crate::library;
use crate::playground::Playground;

/// Cached matchers older than this are dropped on the next prune.
const CACHE_TTL: Duration = Duration::from_secs(300);
/// Prune once per this many stdin lines.
const PRUNE_INTERVAL: u64 = 256;

/// JSON-RPC 2.0 server over stdio, line-delimited. One playground
/// session per process. Every incoming line advances the session's
/// debounce clock before anything else, so a staged pattern edit lands
/// as soon as traffic arrives past its deadline.
pub fn run() -> io::Result<()> {
    let mut session = Playground::new(CompiledCache::new());
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    let mut seen: u64 = 0;

    for line in stdin.lock().lines() {
        let line = line?;
        if let Some(response) = handle_line(&line, &mut session) {
            serde_json::to_writer(&mut stdout, &response)?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
        seen += 1;
        if seen % PRUNE_INTERVAL == 0 {
            session.prune_cache(CACHE_TTL);
        }
    }

    Ok(())
}

#[derive(Deserialize)]
struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    _jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

#[derive(Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

/// Handle one wire line. `None` for empty lines and notifications
/// (requests without an `id` are silently dropped per JSON-RPC spec,
/// though they still advance the debounce clock).
fn handle_line(line: &str, session: &mut Playground) -> Option<JsonRpcResponse> {
    if line.is_empty() {
        return None;
    }

    let req: JsonRpcRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            return Some(error_response(
                None,
                JsonRpcError {
                    code: -32700,
                    message: format!("parse error: {e}"),
                },
            ));
        }
    };

    session.poll(Instant::now());

    let id = req.id?;
    Some(match dispatch(&req.method, &req.params, session) {
        Ok(result) => JsonRpcResponse {
            jsonrpc: "2.0",
            id: Some(id),
            result: Some(result),
            error: None,
        },
        Err(error) => error_response(Some(id), error),
    })
}

fn error_response(id: Option<Value>, error: JsonRpcError) -> JsonRpcResponse {
    JsonRpcResponse {
        jsonrpc: "2.0",
        id,
        result: None,
        error: Some(error),
    }
}

// ---------------------------------------------------------------------------
// Method dispatch
// ---------------------------------------------------------------------------

fn dispatch(method: &str, params: &Value, session: &mut Playground) -> Result<Value, JsonRpcError> {
    match method {
        "ping" => Ok(serde_json::json!({})),

        "info" => Ok(serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "commit": env!("REXPAD_BUILD_COMMIT"),
        })),

        "state" => view(session),

        "set_pattern" => {
            let pattern = required_str(params, "pattern")?;
            session.edit_pattern(pattern, Instant::now());
            view(session)
        }

        "flush" => {
            session.flush();
            view(session)
        }

        "set_flags" => {
            let flags = FlagSet::parse(required_str(params, "flags")?).map_err(invalid_params)?;
            session.set_flags(flags);
            view(session)
        }

        "toggle_flag" => {
            let flag = required_str(params, "flag")?;
            let mut chars = flag.chars();
            let (Some(code), None) = (chars.next(), chars.next()) else {
                return Err(JsonRpcError {
                    code: -32602,
                    message: "flag must be a single character".to_string(),
                });
            };
            session.toggle_flag(code).map_err(invalid_params)?;
            view(session)
        }

        "set_text" => {
            session.set_text(required_str(params, "text")?);
            view(session)
        }

        "use_preset" => {
            let name = required_str(params, "name")?;
            session
                .use_preset(name, Instant::now())
                .map_err(invalid_params)?;
            view(session)
        }

        "presets" => Ok(serde_json::json!({
            "presets": library::all(),
            "categories": library::categories(),
        })),

        "eval" => eval(params),

        "explain" => {
            let pattern = required_str(params, "pattern")?;
            Ok(serde_json::json!({ "tokens": tokenize(pattern) }))
        }

        _ => Err(JsonRpcError {
            code: -32601,
            message: format!("method not found: {method}"),
        }),
    }
}

/// One-shot evaluation outside the session. Compile and runtime
/// failures come back in-band as an error status, like the session's
/// own Error state, so a probing client never kills its request.
fn eval(params: &Value) -> Result<Value, JsonRpcError> {
    let pattern = required_str(params, "pattern")?;
    let flag_str = params.get("flags").and_then(Value::as_str).unwrap_or("");
    let text = params.get("text").and_then(Value::as_str).unwrap_or("");
    let flags = FlagSet::parse(flag_str).map_err(invalid_params)?;

    if pattern.is_empty() || text.is_empty() {
        return Ok(serde_json::json!({
            "status": "idle",
            "matches": [],
            "segments": segment(text, &[]),
            "tokens": tokenize(pattern),
        }));
    }

    match extract(pattern, &flags, text) {
        Ok(matches) => Ok(serde_json::json!({
            "status": "valid",
            "matches": matches,
            "segments": segment(text, &matches),
            "tokens": tokenize(pattern),
        })),
        Err(e) => Ok(serde_json::json!({
            "status": "error",
            "error": e.to_string(),
            "matches": [],
            "segments": [],
            "tokens": tokenize(pattern),
        })),
    }
}

fn view(session: &Playground) -> Result<Value, JsonRpcError> {
    serde_json::to_value(session.view()).map_err(|e| JsonRpcError {
        code: -32603,
        message: format!("internal error: {e}"),
    })
}

fn required_str<'a>(params: &'a Value, key: &str) -> Result<&'a str, JsonRpcError> {
    params
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| JsonRpcError {
            code: -32602,
            message: format!("missing required parameter: {key}"),
        })
}

fn invalid_params(e: PatternError) -> JsonRpcError {
    JsonRpcError {
        code: -32602,
        message: e.to_string(),
    }
}
