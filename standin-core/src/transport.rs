//! # Transport
//!
//! The HTTP exchange is an external collaborator of the policy engine. This module defines the
//! request value sent through it and the [`Transport`] trait any client can implement.
//!
//! A transport performs exactly one exchange per call: no retries and no cancellation. Every
//! [`TransportError`] is treated by [`crate::Standin`] as "no response obtained".
//!
//! [`http::HttpTransport`] is the `reqwest`-backed implementation.
pub mod http;

use crate::{BoxError, RawResponse};
use ::http::Method;
use ::http::header::{InvalidHeaderName, InvalidHeaderValue};
use futures_util::future::BoxFuture;

pub use self::http::HttpTransport;

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("Invalid header key '{key}': '{source}'")]
    InvalidHeaderKey {
        key: String,
        source: InvalidHeaderName,
    },
    #[error("Invalid header value for key '{key}': '{source}'")]
    InvalidHeaderValue {
        key: String,
        source: InvalidHeaderValue,
    },
    #[error("HTTP request failed: '{0}'")]
    Request(#[from] reqwest::Error),
    #[error("Transport failure: '{0}'")]
    Other(#[source] BoxError),
}

/// Download progress of a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Bytes received so far.
    pub received: u64,
    /// Expected body length, when the server announced one.
    pub total: Option<u64>,
}

/// Callback invoked every time a new chunk of the body arrives.
pub type ProgressFn = dyn Fn(Progress) + Send + Sync;

/// A request object describing one API call relative to the transport's base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path appended to the base URL (e.g. `/users/42`).
    pub path: String,
    /// Query string pairs.
    pub query: Vec<(String, String)>,
    /// Custom headers to attach to the request.
    pub headers: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Performs a single request/response exchange.
pub trait Transport: Send + Sync {
    /// Sends `request` and resolves once the whole response body has been received.
    ///
    /// # Returns
    ///
    /// * `Ok(RawResponse)` - The server answered, whatever the HTTP status.
    /// * `Err(TransportError)` - No response could be obtained.
    fn send<'a>(
        &'a self,
        request: &'a ApiRequest,
        progress: Option<&'a ProgressFn>,
    ) -> BoxFuture<'a, Result<RawResponse, TransportError>>;
}
