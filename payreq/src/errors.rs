//! Error types for the payreq framework.
//!
//! Four taxonomy errors cover every failure the framework raises itself.
//! They are raised at the violation site (construction, setter or
//! `get_params`) and always propagate to the caller.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Convenience result alias used throughout the crate.
pub type Result<T, E = PayreqError> = std::result::Result<T, E>;

/// The main error type for payreq operations.
#[derive(Debug, Error)]
pub enum PayreqError {
    /// A required or validated parameter is missing or invalid.
    #[error("{0}")]
    InvalidParameter(#[from] InvalidRequestParameterError),

    /// A locked parameter was changed to a different value.
    #[error("{0}")]
    ImmutableParameter(#[from] ImmutableParameterError),

    /// The framework was used in a structurally invalid way.
    #[error("{0}")]
    ServerRequest(#[from] ServerRequestError),

    /// A response was mutated after construction.
    #[error("{0}")]
    ServerResponse(#[from] ServerResponseError),

    /// The transport collaborator reported a failure.
    #[error("{0}")]
    Transport(#[from] TransportError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PayreqError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl PayreqError {
    /// Returns the stable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::InvalidParameter(e) => &e.code,
            Self::ImmutableParameter(_) => codes::IMMUTABLE_PARAMETER,
            Self::ServerRequest(_) => codes::SERVER_REQUEST,
            Self::ServerResponse(_) => codes::SERVER_RESPONSE,
            Self::Transport(e) => &e.code,
            Self::Config(_) => codes::CONFIG,
            Self::Serialization(_) => codes::SERIALIZATION,
            Self::Io(_) => codes::IO,
        }
    }

    /// Returns true for errors caused by caller-supplied input.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidParameter(_) | Self::ImmutableParameter(_))
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = match self {
            Self::InvalidParameter(e) => e.to_dict(),
            Self::ImmutableParameter(e) => e.to_dict(),
            Self::Transport(e) => e.to_dict(),
            _ => HashMap::new(),
        };
        map.insert("code".to_string(), serde_json::json!(self.code()));
        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map
    }
}

/// Error raised when a parameter is missing or fails validation.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct InvalidRequestParameterError {
    /// Error code identifying the failed check.
    pub code: String,
    /// The parameter the check ran against.
    pub field: Option<String>,
    /// Human-readable message.
    pub message: String,
    /// The offending value, when there is one.
    pub value: Option<serde_json::Value>,
}

impl InvalidRequestParameterError {
    /// Creates a new invalid parameter error.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            field: None,
            message: message.into(),
            value: None,
        }
    }

    /// Names the offending parameter.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attaches the offending value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Error for a parameter that has neither an explicit value nor a default.
    #[must_use]
    pub fn uninitialized(key: &str) -> Self {
        Self::new(
            codes::UNINITIALIZED_PARAM,
            format!("Parameter {key} has neither an explicit value nor a default"),
        )
        .with_field(key)
    }

    /// Error for required parameters left unset by `get_params`.
    #[must_use]
    pub fn missing(keys: &[String]) -> Self {
        Self::new(
            codes::MISSING_PARAMETERS,
            format!(
                "Request is missing required parameter(s): {}",
                keys.join(", ")
            ),
        )
        .with_value(serde_json::json!(keys))
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("code".to_string(), serde_json::json!(self.code));
        map.insert("message".to_string(), serde_json::json!(self.message));
        if let Some(ref field) = self.field {
            map.insert("field".to_string(), serde_json::json!(field));
        }
        if let Some(ref value) = self.value {
            map.insert("value".to_string(), value.clone());
        }
        map
    }
}

/// Error raised when a locked parameter would change value.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("The value of {key} is immutable and cannot be changed from {current} to {attempted}")]
pub struct ImmutableParameterError {
    /// The locked key.
    pub key: String,
    /// The value recorded when the key was locked.
    pub current: serde_json::Value,
    /// The rejected replacement.
    pub attempted: serde_json::Value,
}

impl ImmutableParameterError {
    /// Creates a new immutable parameter error.
    #[must_use]
    pub fn new(
        key: impl Into<String>,
        current: serde_json::Value,
        attempted: serde_json::Value,
    ) -> Self {
        Self {
            key: key.into(),
            current,
            attempted,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("key".to_string(), serde_json::json!(self.key));
        map.insert("current".to_string(), self.current.clone());
        map.insert("attempted".to_string(), self.attempted.clone());
        map
    }
}

/// Error raised on structural misuse of the framework.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Server request error: {message}")]
pub struct ServerRequestError {
    /// The error message.
    pub message: String,
}

impl ServerRequestError {
    /// Creates a new server request error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Error raised when a response is mutated.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Server response error: {message}")]
pub struct ServerResponseError {
    /// The error message.
    pub message: String,
}

impl ServerResponseError {
    /// Creates a new server response error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure reported by the transport collaborator.
///
/// The framework never constructs these on its own; it only forwards them.
#[derive(Debug, Clone, Error, PartialEq, Serialize, Deserialize)]
#[error("API error {code} (HTTP {http_status}): {message}")]
pub struct TransportError {
    /// Remote error code.
    pub code: String,
    /// Remote error message.
    pub message: String,
    /// HTTP status of the failed call.
    pub http_status: u16,
}

impl TransportError {
    /// Creates a new transport error.
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>, http_status: u16) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            http_status,
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("http_status".to_string(), serde_json::json!(self.http_status));
        map
    }
}

/// Stable error codes.
pub mod codes {
    /// Prefix shared by all invalid parameter codes.
    pub const INVALID_PARAMETER_PREFIX: &str = "invalid_request_parameter";
    /// Parameter accessed without explicit value or default.
    pub const UNINITIALIZED_PARAM: &str = "invalid_request_parameter_uninitialized_param";
    /// Required parameters missing at `get_params`.
    pub const MISSING_PARAMETERS: &str = "invalid_request_parameter_missing_parameters";
    /// External object id has the wrong shape.
    pub const OBJECT_ID: &str = "invalid_request_parameter_object_id";
    /// Redirect URL is malformed or off-site.
    pub const REDIRECT_URL: &str = "invalid_request_parameter_redirect_url";
    /// Date could not be parsed.
    pub const DATE: &str = "invalid_request_parameter_date";
    /// Currency is not supported.
    pub const CURRENCY: &str = "invalid_request_parameter_currency_not_available";
    /// Value below its lower bound.
    pub const LOWER_BOUND: &str = "invalid_request_parameter_lower_bound";
    /// Value is not a whole number.
    pub const INTEGER: &str = "invalid_request_parameter_integer";
    /// Route fragment contains forbidden tokens.
    pub const ROUTE: &str = "invalid_request_parameter_route";
    /// Identifier contains forbidden characters.
    pub const IDENTIFIER: &str = "invalid_request_parameter_identifier";
    /// A parameter value is not one of the accepted options.
    pub const OPTION: &str = "invalid_request_parameter_option";
    /// A locked parameter was changed.
    pub const IMMUTABLE_PARAMETER: &str = "immutable_parameter";
    /// Structural misuse.
    pub const SERVER_REQUEST: &str = "server_request";
    /// Response mutation.
    pub const SERVER_RESPONSE: &str = "server_response";
    /// Configuration failure.
    pub const CONFIG: &str = "config";
    /// Serialization failure.
    pub const SERIALIZATION: &str = "serialization";
    /// IO failure.
    pub const IO: &str = "io";
}
