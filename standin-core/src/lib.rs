//! # Standin Core
//!
//! `standin-core` is the foundational library powering the Standin CLI. It wraps outgoing API
//! calls so that, when the backend fails or when a debug mode forces it, a caller-supplied
//! sample value reaches the success callback instead of the real result. Engineers can keep
//! exercising downstream logic without a working backend.
//!
//! ## Key Components
//!
//! * **[`Standin`]:** The main entry point. It is built once through a [`StandinBuilder`],
//!   issues the request through a [`Transport`] and applies the debug-mode policy to decide
//!   which callback runs and with what value.
//! * **[`DebugSwitch`] & [`DebugMode`]:** The shared debug setting. A switch set to
//!   [`DebugMode::Shutdown`] is locked and cannot be overridden by any instance.
//! * **[`RawResponse`] & [`Envelope`]:** Helpers to unwrap the `{code, data, msg}` envelope
//!   returned by the backend.
//! * **[`JsonAccess`]:** Typed extraction from `serde_json::Value` that fails with a uniform
//!   [`ApiError::Service`].
//!
//! ## Prompt relay
//!
//! In [`DebugMode::Option`] the engine does not render anything itself. It emits a
//! [`relay::Prompt`] to a [`relay::Presenter`] and applies the [`relay::Choice`] reported back.
//! [`relay::ChannelPresenter`] forwards prompts over a channel so any frontend can answer them.
//!
//! ## Re-exports
//!
//! This crate re-exports `http`, `reqwest` and `serde_json` to ensure that consumers
//! use compatible versions of these underlying dependencies.
pub mod error;
pub mod json;
pub mod mode;
pub mod policy;
pub mod relay;
pub mod response;
pub mod standin;
pub mod transport;

pub use error::ApiError;
pub use json::{JsonAccess, ObjectAccess};
pub use mode::{DebugMode, DebugSwitch};
pub use response::{Envelope, EnvelopeKeys, RawResponse};
pub use standin::{Resolution, Standin, StandinBuilder};
pub use transport::{ApiRequest, Transport};

// Re-exports
pub use http;
pub use reqwest;
pub use serde_json;

/// Type alias for the standard boxed error used by custom transports.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
