//! Error types for the StAR MF gateway

use axum::http::StatusCode;
use thiserror::Error;

/// Class of validation rule a request field violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Field must be non-blank
    Required,
    /// Field must hold one of a fixed set of literals
    OneOf,
    /// Field exceeds its documented maximum length
    MaxLength,
    /// Field is mandatory because another field holds a sentinel value
    RequiredWhen,
    /// At least one of several fields must be present
    AtLeastOne,
    /// Numeric field must be strictly positive
    Positive,
    /// Field does not match its expected format
    Format,
}

impl Rule {
    /// Stable machine-readable name for the rule
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::OneOf => "one_of",
            Self::MaxLength => "max_length",
            Self::RequiredWhen => "required_when",
            Self::AtLeastOne => "at_least_one",
            Self::Positive => "positive",
            Self::Format => "format",
        }
    }
}

/// First violation found while validating an inbound request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Name of the offending field as the caller sent it
    pub field: &'static str,
    /// Rule that failed
    pub rule: Rule,
    /// Human-readable description
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, rule: Rule, message: impl Into<String>) -> Self {
        Self {
            field,
            rule,
            message: message.into(),
        }
    }
}

/// Failure to extract a typed response from a counterparty body
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The named result element is absent from the body
    #[error("result element not found: {element}")]
    ElementNotFound {
        /// Local name of the element that was searched for
        element: &'static str,
    },

    /// The pipe-delimited result carries fewer fields than the schema needs
    #[error("insufficient fields: got {got}, want at least {want}")]
    InsufficientFields {
        /// Number of fields present
        got: usize,
        /// Minimum number of fields required
        want: usize,
    },

    /// A JSON sub-API returned a body that does not match its schema
    #[error("malformed JSON response: {0}")]
    Json(#[from] serde_json::Error),
}

/// Outbound call failure, classified by where it happened
#[derive(Debug, Error)]
pub enum TransportError {
    /// Dial failure or timeout before a response arrived
    #[error("connection to {endpoint} failed: {source}")]
    Connection {
        /// Counterparty URL
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response started but its body could not be read
    #[error("reading response from {endpoint} failed: {source}")]
    Read {
        /// Counterparty URL
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// Counterparty answered with a non-success HTTP status
    #[error("counterparty returned HTTP {status}")]
    HttpStatus {
        /// HTTP status code
        status: u16,
        /// Raw response body, kept for logging
        body: String,
    },
}

/// Top-level error for a single gateway request
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Request rejected before any network call
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Outbound call failed
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Counterparty body could not be decoded
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Inbound body could not be parsed at all
    #[error("bad request: {message}")]
    BadRequest {
        /// What was wrong with the body
        message: String,
    },
}

impl GatewayError {
    /// HTTP status the gateway answers with for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Transport(_) | Self::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable error code carried in JSON error bodies
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Transport(_) => "COUNTERPARTY_UNAVAILABLE",
            Self::Decode(_) => "COUNTERPARTY_RESPONSE_INVALID",
        }
    }
}

/// Type alias for gateway results
pub type GatewayResult<T> = Result<T, GatewayError>;
