//! # Debug-Mode Policy
//!
//! The decision table applied once a request outcome is known. It is a pure function: it
//! never calls a callback or a sample producer, it only says what [`crate::Standin`] must do.
//!
//! | Mode               | No outcome, or no handler      | Handler `Ok(t)` | Handler `Err(e)`            |
//! |--------------------|--------------------------------|-----------------|-----------------------------|
//! | `Always`           | substitute                     | -               | -                           |
//! | `Auto`             | substitute                     | deliver `t`     | substitute                  |
//! | `Option`           | relay, cancel -> network error | deliver `t`     | relay, cancel -> `e`        |
//! | `Never`/`Shutdown` | fail with network error        | deliver `t`     | fail with `e`               |
//!
//! `Always` never reaches the network, so it never has an outcome to look at.
use crate::{ApiError, DebugMode};

/// What the engine must do with one run.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict<T, E> {
    /// Pass the handler's value to the success callback.
    Deliver(T),
    /// Pass a fresh success sample to the success callback.
    Substitute,
    /// Pass the error to the failure callback.
    Fail(E),
    /// Ask the user. `on_cancel` is what the failure callback receives if they decline.
    Relay { on_cancel: E },
}

/// Applies the decision table.
///
/// `exchange` is `None` when no response was obtained or no handler is configured, and the
/// handler's result otherwise.
pub fn evaluate<T, E>(mode: DebugMode, exchange: Option<Result<T, E>>) -> Verdict<T, E>
where
    E: From<ApiError>,
{
    match (mode, exchange) {
        (DebugMode::Always, _) => Verdict::Substitute,
        (_, Some(Ok(value))) => Verdict::Deliver(value),
        (DebugMode::Auto, _) => Verdict::Substitute,
        (DebugMode::Option, Some(Err(err))) => Verdict::Relay { on_cancel: err },
        // Cancelling a relay for a missing outcome falls back to the `Never` branch.
        (DebugMode::Option, None) => Verdict::Relay {
            on_cancel: ApiError::Network.into(),
        },
        (DebugMode::Never | DebugMode::Shutdown, Some(Err(err))) => Verdict::Fail(err),
        (DebugMode::Never | DebugMode::Shutdown, None) => Verdict::Fail(ApiError::Network.into()),
    }
}
