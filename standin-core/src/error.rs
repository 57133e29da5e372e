//! # API Errors
//!
//! The error taxonomy shared by the JSON accessors, the envelope unwrapper and the
//! debug-mode policy engine.
//!
//! * **`Service`**: the response (or a part of it) did not have the expected shape. It carries
//!   no detail about which key or type was wrong.
//! * **`Network`**: no response was obtained, or no handler was configured to read it.
//! * **`Client`**: the server answered with a well-formed envelope whose status code is not
//!   the expected success value. This is the only variant carrying diagnostic payload.

/// Errors produced while reading an API response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Service error: the response did not have the expected shape")]
    Service,
    #[error("Network error: no response was obtained")]
    Network,
    #[error("Client error: code='{code}' msg='{msg}'")]
    Client { code: String, msg: String },
}
