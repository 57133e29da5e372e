//! # CLI
//!
//! This module defines the command-line interface of `standin` using `clap`.
//!
//! It is responsible for parsing user input and performing validation (e.g., ensuring headers are `key:value`);
use clap::{Args, Parser, Subcommand};
use standin_core::DebugMode;
use standin_core::http::Method;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "standin",
    version,
    about = "Call JSON APIs with a sample-data fallback"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Perform an API call through the debug shim
    ///
    /// The response envelope (`{code, data, msg}`) is unwrapped and its payload printed.
    /// Depending on the debug mode, sample data may be printed instead.
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// standin call http://localhost:8080 GET /users/1 --mode auto --sample '{"name": "sample"}'
    /// ```
    Call(CallArgs),

    /// Inspect or change the persisted configuration
    Config {
        #[command(subcommand)]
        sub: ConfigCommands,
    },
}

#[derive(Args)]
pub struct CallArgs {
    /// The base URL of the API (e.g. http://localhost:8080)
    pub url: String,

    /// HTTP method (GET, POST, ...)
    #[arg(value_parser = parse_method)]
    pub method: Method,

    /// Path appended to the base URL (e.g. /users/1)
    pub path: String,

    /// JSON body of the request
    #[arg(long, value_parser = parse_json)]
    pub body: Option<serde_json::Value>,

    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    #[arg(short = 'q', long = "query", value_parser = parse_query)]
    pub query: Vec<(String, String)>,

    /// Debug mode for this call (always, auto, option, never, shutdown).
    /// Ignored when the configured mode is `shutdown`.
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<DebugMode>,

    /// JSON value used as success sample data
    #[arg(long, value_parser = parse_json, conflicts_with = "sample_file")]
    pub sample: Option<serde_json::Value>,

    /// File containing the JSON success sample
    #[arg(long)]
    pub sample_file: Option<PathBuf>,

    /// Failure sample offered in option mode, as `code:message`
    #[arg(long, value_parser = parse_failure_sample)]
    pub failure_sample: Option<(String, String)>,

    /// Print the whole JSON body instead of unwrapping the envelope
    #[arg(long)]
    pub raw: bool,

    /// Request timeout in seconds (overrides the configured one)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Log when the request starts and ends
    #[arg(long)]
    pub timing: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the current configuration
    Show,
    /// Print the location of the configuration file
    Path,
    /// Set the process-level debug mode
    ///
    /// `shutdown` disables debugging entirely: `--mode` on a call is then ignored.
    SetMode {
        #[arg(value_parser = parse_mode)]
        mode: DebugMode,
    },
    /// Set the envelope field names and the success code
    SetKeys {
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        data: Option<String>,
        #[arg(long)]
        msg: Option<String>,
        #[arg(long)]
        success_code: Option<String>,
    },
}

fn parse_method(value: &str) -> Result<Method, String> {
    Method::from_bytes(value.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("Invalid HTTP method: '{value}'"))
}

fn parse_mode(value: &str) -> Result<DebugMode, String> {
    value.parse().map_err(|e| format!("{e}"))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    s.split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| "Format must be 'key:value'".to_string())
}

fn parse_query(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| "Format must be 'key=value'".to_string())
}

fn parse_failure_sample(s: &str) -> Result<(String, String), String> {
    let (code, msg) = s
        .split_once(':')
        .ok_or_else(|| "Format must be 'code:message'".to_string())?;

    if code.trim().is_empty() {
        return Err("Failure sample code cannot be empty".to_string());
    }

    Ok((code.trim().to_string(), msg.trim().to_string()))
}

fn parse_json(value: &str) -> Result<serde_json::Value, String> {
    serde_json::from_str(value).map_err(|e| format!("Invalid JSON: {e}"))
}
