//! # Response Unwrapping
//!
//! Backends wrap every payload in an envelope such as `{"code": 200, "data": {...}, "msg": "ok"}`.
//! This module turns a [`RawResponse`] into that [`Envelope`] and, when the status code matches
//! the expected success value, into the inner payload.
//!
//! ## Errors
//!
//! * Body is not JSON, code missing or of an unsupported type, msg missing or not a string:
//!   [`ApiError::Service`].
//! * Code present but different from [`EnvelopeKeys::success_code`]:
//!   [`ApiError::Client`] with the actual code and message.
use crate::{ApiError, JsonAccess};
use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The outcome of one HTTP exchange, as handed to response handlers.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Field names of the envelope and the code value that means success.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EnvelopeKeys {
    pub code: String,
    pub data: String,
    pub msg: String,
    pub success_code: String,
}

impl Default for EnvelopeKeys {
    fn default() -> Self {
        Self {
            code: "code".to_string(),
            data: "data".to_string(),
            msg: "msg".to_string(),
            success_code: "200".to_string(),
        }
    }
}

/// The unwrapped envelope. `code` is always in string form.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub code: String,
    pub data: Value,
    pub msg: String,
}

impl Envelope {
    /// Reads the envelope fields out of an already parsed JSON document.
    ///
    /// The code may be a JSON integer or string. A missing data field yields `Value::Null`.
    pub fn from_json(json: &Value, keys: &EnvelopeKeys) -> Result<Self, ApiError> {
        let code = match json.get(&keys.code) {
            Some(Value::String(code)) => code.clone(),
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => n.to_string(),
            _ => return Err(ApiError::Service),
        };
        let msg = json.to_str_at(&keys.msg)?.to_string();
        let data = json.get(&keys.data).cloned().unwrap_or(Value::Null);

        Ok(Self { code, data, msg })
    }

    /// Returns the payload if the code matches `success_code`.
    pub fn into_payload(self, success_code: &str) -> Result<Value, ApiError> {
        if self.code == success_code {
            Ok(self.data)
        } else {
            Err(ApiError::Client {
                code: self.code,
                msg: self.msg,
            })
        }
    }
}

impl RawResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Parses the body as JSON.
    pub fn json(&self) -> Result<Value, ApiError> {
        serde_json::from_slice(&self.body).map_err(|_| ApiError::Service)
    }

    /// The body as text, with invalid UTF-8 sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parses the body and extracts the `(code, data, msg)` envelope.
    pub fn unwrap_envelope(&self, keys: &EnvelopeKeys) -> Result<Envelope, ApiError> {
        Envelope::from_json(&self.json()?, keys)
    }

    /// Extracts the envelope and returns its data field if the code means success.
    pub fn unwrap_payload(&self, keys: &EnvelopeKeys) -> Result<Value, ApiError> {
        self.unwrap_envelope(keys)?.into_payload(&keys.success_code)
    }

    /// Like [`RawResponse::unwrap_payload`], requiring the payload to be an object.
    pub fn payload_map(&self, keys: &EnvelopeKeys) -> Result<Map<String, Value>, ApiError> {
        match self.unwrap_payload(keys)? {
            Value::Object(map) => Ok(map),
            _ => Err(ApiError::Service),
        }
    }

    /// Like [`RawResponse::unwrap_payload`], building a `T` out of the payload object.
    pub fn payload_as<T: DeserializeOwned>(&self, keys: &EnvelopeKeys) -> Result<T, ApiError> {
        self.unwrap_payload(keys)?.instantiate()
    }
}
