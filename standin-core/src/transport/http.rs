//! # HTTP Transport
//!
//! A [`Transport`] backed by `reqwest`.
//!
//! * **URL building**: the request path is joined to the base URL, collapsing duplicated slashes
//!   at the seam.
//! * **Headers**: string tuples are validated into a `HeaderMap` before anything is sent.
//! * **Progress**: when a progress callback is supplied the body is streamed chunk by chunk and
//!   the callback sees the running byte count.
use super::{ApiRequest, Progress, ProgressFn, Transport, TransportError};
use crate::RawResponse;
use bytes::BytesMut;
use futures_util::{StreamExt, future::BoxFuture};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport with a default `reqwest` client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a transport whose requests fail once `timeout` has elapsed.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a transport from an existing `reqwest` client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn execute(
        &self,
        request: &ApiRequest,
        progress: Option<&ProgressFn>,
    ) -> Result<RawResponse, TransportError> {
        let url = self.url(&request.path);
        let headers = build_headers(&request.headers)?;

        tracing::debug!(method = %request.method, %url, "sending request");

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();

        let body = match progress {
            None => response.bytes().await?,
            Some(progress) => {
                let total = response.content_length();
                let mut received = 0;
                let mut buffer = BytesMut::new();
                let mut stream = response.bytes_stream();
                while let Some(chunk) = stream.next().await {
                    let chunk = chunk?;
                    received += chunk.len() as u64;
                    buffer.extend_from_slice(&chunk);
                    progress(Progress { received, total });
                }
                buffer.freeze()
            }
        };

        tracing::debug!(%status, bytes = body.len(), "response received");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

impl Transport for HttpTransport {
    fn send<'a>(
        &'a self,
        request: &'a ApiRequest,
        progress: Option<&'a ProgressFn>,
    ) -> BoxFuture<'a, Result<RawResponse, TransportError>> {
        Box::pin(self.execute(request, progress))
    }
}

fn build_headers(headers: &[(String, String)]) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (k, v) in headers {
        let key = HeaderName::from_str(k).map_err(|source| TransportError::InvalidHeaderKey {
            key: k.clone(),
            source,
        })?;
        let val = HeaderValue::from_str(v).map_err(|source| TransportError::InvalidHeaderValue {
            key: k.clone(),
            source,
        })?;
        map.append(key, val);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let transport = HttpTransport::new("http://localhost:8080/api/");

        assert_eq!(transport.url("/users"), "http://localhost:8080/api/users");
        assert_eq!(transport.url("users"), "http://localhost:8080/api/users");
        assert_eq!(transport.url(""), "http://localhost:8080/api/");
    }

    #[test]
    fn test_invalid_headers() {
        let err = build_headers(&[("bad key".to_string(), "v".to_string())]).unwrap_err();
        assert!(matches!(err, TransportError::InvalidHeaderKey { key, .. } if key == "bad key"));

        let err = build_headers(&[("x-ok".to_string(), "line\nbreak".to_string())]).unwrap_err();
        assert!(matches!(err, TransportError::InvalidHeaderValue { key, .. } if key == "x-ok"));
    }

    #[test]
    fn test_repeated_headers_are_kept() {
        let map = build_headers(&[
            ("x-tag".to_string(), "a".to_string()),
            ("x-tag".to_string(), "b".to_string()),
        ])
        .unwrap();

        assert_eq!(map.get_all("x-tag").iter().count(), 2);
    }
}
