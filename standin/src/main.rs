//! # Standin CLI Entry Point
//!
//! The main executable for the Standin tool. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Installs logging and parses command-line arguments using [`cli::Cli`].
//! 2. **Configuration**: Loads the persisted debug mode and envelope keys.
//! 3. **Execution**: Builds a `Standin` wrapper and runs the request through it.
//! 4. **Presentation**: Formats and prints the resulting data or error to standard output/error.
mod cli;
mod config;
mod formatter;
mod presenter;

use clap::Parser;
use cli::{CallArgs, Cli, Commands, ConfigCommands};
use config::{AppConfig, ConfigManager};
use formatter::{FormattedString, GenericError, SampleNotice, Unresolved};
use presenter::TerminalPresenter;
use serde_json::Value;
use standin_core::transport::HttpTransport;
use standin_core::{ApiError, ApiRequest, DebugSwitch, Resolution, Standin};
use std::process;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();
    let args = Cli::parse();

    match args.command {
        Commands::Call(call) => run_call(call).await,
        Commands::Config { sub } => run_config(sub),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn manager_or_exit() -> ConfigManager {
    match ConfigManager::new() {
        Ok(manager) => manager,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

fn load_or_exit(manager: &ConfigManager) -> AppConfig {
    match manager.load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    }
}

fn save_or_exit(manager: &ConfigManager, config: &AppConfig) {
    if let Err(err) = manager.save(config) {
        eprintln!("{}", FormattedString::from(err));
        process::exit(1);
    }
}

fn run_config(command: ConfigCommands) {
    let manager = manager_or_exit();

    match command {
        ConfigCommands::Show => {
            println!("{}", FormattedString::from(&load_or_exit(&manager)));
        }
        ConfigCommands::Path => println!("{}", manager.path().display()),
        ConfigCommands::SetMode { mode } => {
            let mut config = load_or_exit(&manager);
            config.mode = mode;
            save_or_exit(&manager, &config);
            println!("{}", FormattedString::from(&config));
        }
        ConfigCommands::SetKeys {
            code,
            data,
            msg,
            success_code,
        } => {
            let mut config = load_or_exit(&manager);
            let keys = &mut config.envelope;
            if let Some(code) = code {
                keys.code = code;
            }
            if let Some(data) = data {
                keys.data = data;
            }
            if let Some(msg) = msg {
                keys.msg = msg;
            }
            if let Some(success_code) = success_code {
                keys.success_code = success_code;
            }
            save_or_exit(&manager, &config);
            println!("{}", FormattedString::from(&config));
        }
    }
}

async fn run_call(args: CallArgs) {
    let config = load_or_exit(&manager_or_exit());

    let sample = match read_sample(&args) {
        Ok(sample) => sample,
        Err(err) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
    };

    let transport = match args.timeout.or(config.timeout_secs) {
        Some(secs) => match HttpTransport::with_timeout(&args.url, Duration::from_secs(secs)) {
            Ok(transport) => transport,
            Err(err) => {
                eprintln!(
                    "{}",
                    FormattedString::from(GenericError("Failed to build the HTTP client", err))
                );
                process::exit(1);
            }
        },
        None => HttpTransport::new(&args.url),
    };

    let mut request = ApiRequest::new(args.method, args.path);
    request.headers = args.headers;
    request.query = args.query;
    request.body = args.body;

    let slot: Arc<Mutex<Option<Result<Value, ApiError>>>> = Arc::default();
    let on_success = slot.clone();
    let on_failure = slot.clone();
    let keys = config.envelope.clone();
    let raw = args.raw;

    let mut builder = Standin::builder(
        move || sample.clone(),
        move |value| store(&on_success, Ok(value)),
    )
    .switch(DebugSwitch::new(config.mode))
    .handler(move |response| {
        if raw {
            response.json()
        } else {
            response.unwrap_payload(&keys)
        }
    })
    .on_failure(move |err| store(&on_failure, Err(err)))
    .presenter(TerminalPresenter)
    .timing(args.timing);

    if let Some(mode) = args.mode {
        builder = builder.mode(mode);
    }
    if let Some((code, msg)) = args.failure_sample {
        builder = builder.failure_sample(move || ApiError::Client {
            code: code.clone(),
            msg: msg.clone(),
        });
    }

    let standin = builder.build();
    tracing::debug!(mode = %standin.effective_mode(), "effective debug mode");

    let resolution = standin.run(&transport, &request).await;
    let outcome = slot.lock().ok().and_then(|mut slot| slot.take());

    match (resolution, outcome) {
        (Resolution::Substituted, Some(Ok(value))) => {
            eprintln!("{}", FormattedString::from(SampleNotice));
            println!("{}", FormattedString::from(value));
        }
        (_, Some(Ok(value))) => println!("{}", FormattedString::from(value)),
        (_, Some(Err(err))) => {
            eprintln!("{}", FormattedString::from(err));
            process::exit(1);
        }
        (Resolution::LogViewed, None) => {
            eprintln!(
                "{}",
                FormattedString::from(Unresolved("the error log was opened"))
            );
            process::exit(2);
        }
        (_, None) => {
            eprintln!(
                "{}",
                FormattedString::from(Unresolved("the debug prompt could not be shown"))
            );
            process::exit(2);
        }
    }
}

fn read_sample(args: &CallArgs) -> anyhow::Result<Value> {
    use anyhow::Context;

    if let Some(sample) = &args.sample {
        return Ok(sample.clone());
    }
    match &args.sample_file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Could not read sample file '{}'", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Sample file '{}' is not valid JSON", path.display()))
        }
        None => Ok(Value::Null),
    }
}

fn store(slot: &Mutex<Option<Result<Value, ApiError>>>, outcome: Result<Value, ApiError>) {
    if let Ok(mut slot) = slot.lock() {
        *slot = Some(outcome);
    }
}
