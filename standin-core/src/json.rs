//! # JSON Accessors
//!
//! Typed extraction helpers for `serde_json::Value`, meant to be used inside response handlers.
//!
//! Every accessor either returns the requested view of the node or fails with
//! [`ApiError::Service`]. The error never says which key or type was wrong, and nothing is
//! recovered locally: handlers are expected to propagate it with `?` so the policy engine can
//! decide what to do.
//!
//! ```rust
//! use standin_core::JsonAccess;
//!
//! let json = serde_json::json!({ "items": [1, 2], "name": "standin" });
//! assert_eq!(json.to_array_at("items").unwrap().len(), 2);
//! assert_eq!(json.to_str_at("name").unwrap(), "standin");
//! assert!(json.to_int_at("name").is_err());
//! ```
use crate::ApiError;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Typed access to a JSON node, optionally keyed into one of its fields first.
pub trait JsonAccess {
    /// Returns the node as an array.
    fn to_array(&self) -> Result<&Vec<Value>, ApiError>;
    /// Returns the field `key` as an array.
    fn to_array_at(&self, key: &str) -> Result<&Vec<Value>, ApiError>;
    /// Returns the node as an integer.
    fn to_int(&self) -> Result<i64, ApiError>;
    /// Returns the field `key` as an integer.
    fn to_int_at(&self, key: &str) -> Result<i64, ApiError>;
    /// Returns the node as a string slice.
    fn to_str(&self) -> Result<&str, ApiError>;
    /// Returns the field `key` as a string slice.
    fn to_str_at(&self, key: &str) -> Result<&str, ApiError>;
    /// Returns the node as an object map.
    fn to_object(&self) -> Result<&Map<String, Value>, ApiError>;
    /// Returns the field `key` as an object map.
    fn to_object_at(&self, key: &str) -> Result<&Map<String, Value>, ApiError>;
    /// Builds a `T` from the node, which must be an object.
    fn instantiate<T: DeserializeOwned>(&self) -> Result<T, ApiError>;
    /// Builds a `T` from the field `key`, which must be an object.
    fn instantiate_at<T: DeserializeOwned>(&self, key: &str) -> Result<T, ApiError>;
}

impl JsonAccess for Value {
    fn to_array(&self) -> Result<&Vec<Value>, ApiError> {
        self.as_array().ok_or(ApiError::Service)
    }

    fn to_array_at(&self, key: &str) -> Result<&Vec<Value>, ApiError> {
        keyed(self, key)?.to_array()
    }

    fn to_int(&self) -> Result<i64, ApiError> {
        self.as_i64().ok_or(ApiError::Service)
    }

    fn to_int_at(&self, key: &str) -> Result<i64, ApiError> {
        keyed(self, key)?.to_int()
    }

    fn to_str(&self) -> Result<&str, ApiError> {
        self.as_str().ok_or(ApiError::Service)
    }

    fn to_str_at(&self, key: &str) -> Result<&str, ApiError> {
        keyed(self, key)?.to_str()
    }

    fn to_object(&self) -> Result<&Map<String, Value>, ApiError> {
        self.as_object().ok_or(ApiError::Service)
    }

    fn to_object_at(&self, key: &str) -> Result<&Map<String, Value>, ApiError> {
        keyed(self, key)?.to_object()
    }

    fn instantiate<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        self.to_object()?.instantiate()
    }

    fn instantiate_at<T: DeserializeOwned>(&self, key: &str) -> Result<T, ApiError> {
        self.to_object_at(key)?.instantiate()
    }
}

/// Access to a flattened, string-keyed JSON object map.
pub trait ObjectAccess {
    /// Returns the value stored under `key`.
    fn field(&self, key: &str) -> Result<&Value, ApiError>;
    /// Builds a `T` from the whole map.
    fn instantiate<T: DeserializeOwned>(&self) -> Result<T, ApiError>;
}

impl ObjectAccess for Map<String, Value> {
    fn field(&self, key: &str) -> Result<&Value, ApiError> {
        self.get(key).ok_or(ApiError::Service)
    }

    fn instantiate<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_value(Value::Object(self.clone())).map_err(|_| ApiError::Service)
    }
}

fn keyed<'a>(value: &'a Value, key: &str) -> Result<&'a Value, ApiError> {
    value.get(key).ok_or(ApiError::Service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct User {
        id: i64,
        name: String,
    }

    #[test]
    fn test_keyed_accessors() {
        let json = json!({
            "list": [1, 2, 3],
            "count": 3,
            "name": "abc",
            "user": { "id": 7, "name": "mayer" }
        });

        assert_eq!(json.to_array_at("list").unwrap().len(), 3);
        assert_eq!(json.to_int_at("count").unwrap(), 3);
        assert_eq!(json.to_str_at("name").unwrap(), "abc");
        assert_eq!(json.to_object_at("user").unwrap().len(), 2);
        assert_eq!(
            json.instantiate_at::<User>("user").unwrap(),
            User {
                id: 7,
                name: "mayer".to_string()
            }
        );
    }

    #[test]
    fn test_type_mismatch_is_service_error() {
        let json = json!({ "count": "3", "ratio": 0.5, "list": {} });

        assert_eq!(json.to_int_at("count"), Err(ApiError::Service));
        assert_eq!(json.to_int_at("ratio"), Err(ApiError::Service));
        assert_eq!(json.to_array_at("list"), Err(ApiError::Service));
        assert_eq!(json.to_str_at("list"), Err(ApiError::Service));
        assert_eq!(json.to_array(), Err(ApiError::Service));
    }

    #[test]
    fn test_missing_key_is_service_error() {
        let json = json!({});

        assert_eq!(json.to_str_at("missing"), Err(ApiError::Service));
        assert_eq!(json.to_object_at("missing"), Err(ApiError::Service));
        assert_eq!(
            json!([1]).to_int_at("anything"),
            Err(ApiError::Service),
            "keying into a non-object fails the same way"
        );
    }

    #[test]
    fn test_instantiate_requires_object_and_shape() {
        assert_eq!(json!([1, 2]).instantiate::<User>(), Err(ApiError::Service));
        assert_eq!(
            json!({ "id": "nope", "name": "x" }).instantiate::<User>(),
            Err(ApiError::Service)
        );
    }

    #[test]
    fn test_object_field() {
        let json = json!({ "a": 1 });
        let map = json.to_object().unwrap();

        assert_eq!(map.field("a").unwrap(), &json!(1));
        assert_eq!(map.field("b"), Err(ApiError::Service));
    }
}
