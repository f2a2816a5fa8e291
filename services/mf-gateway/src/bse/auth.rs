//! Password exchange (`getPassword`)

use serde::{Deserialize, Serialize};

use super::error_codes;
use super::pipeline::OrderType;
use super::soap;
use super::transport::WirePayload;
use super::validation::{max_len_labeled, required_with};
use crate::error::{DecodeError, Rule, ValidationError};

const OPERATION: &str = "getPassword";
const ACTION: &str = "http://bsestarmf.in/MFOrderEntry/getPassword";
const RESULT_ELEMENT: &str = "getPasswordResult";

/// Response code the counterparty uses for a successful exchange
pub const SUCCESS_CODE: &str = "100";

/// Credentials exchanged for an encrypted session password
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthRequest {
    /// Counterparty user id (max 5 characters)
    pub user_id: String,
    /// Plain-text member password (max 20 characters)
    pub password: String,
    /// Alphanumeric pass key (max 10 characters)
    pub pass_key: String,
}

/// Decoded `getPasswordResult`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthResult {
    pub response_code: String,
    /// Present when `response_code` is `100`
    pub encrypted_password: Option<String>,
    /// Counterparty error text, verbatim
    pub error_message: Option<String>,
    /// Human-readable explanation of `error_message`
    pub explanation: Option<String>,
}

impl AuthResult {
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.response_code == SUCCESS_CODE
    }
}

/// `getPassword` descriptor
#[derive(Debug, Clone, Copy)]
pub struct PasswordExchange;

impl OrderType for PasswordExchange {
    type Request = AuthRequest;
    type Response = AuthResult;

    const NAME: &'static str = "auth";

    fn reference(request: &AuthRequest) -> &str {
        &request.user_id
    }

    fn validate(request: &AuthRequest) -> Result<(), ValidationError> {
        required_with("user_id", &request.user_id, "USER ID SHOULD NOT BE BLANK")?;
        required_with("password", &request.password, "PASSWORD SHOULD NOT BE BLANK")?;
        required_with("pass_key", &request.pass_key, "PASSKEY SHOULD NOT BE BLANK")?;
        max_len_labeled("user_id", &request.user_id, 5, "User ID")?;
        max_len_labeled("password", &request.password, 20, "Password")?;
        max_len_labeled("pass_key", &request.pass_key, 10, "Pass Key")?;
        if !request.pass_key.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ValidationError::new(
                "pass_key",
                Rule::Format,
                "PassKey must be alphanumeric only (no special characters)",
            ));
        }
        Ok(())
    }

    fn encode(request: &AuthRequest, endpoint: &str) -> WirePayload {
        let body = soap::envelope(
            OPERATION,
            ACTION,
            endpoint,
            &[
                ("UserId", request.user_id.as_str()),
                ("Password", request.password.as_str()),
                ("PassKey", request.pass_key.as_str()),
            ],
        );
        WirePayload::soap(body, ACTION)
    }

    fn decode(raw: &str) -> Result<AuthResult, DecodeError> {
        let text = soap::element_text(raw, RESULT_ELEMENT).ok_or(DecodeError::ElementNotFound {
            element: RESULT_ELEMENT,
        })?;
        let text = soap::unescape(text);

        // The payload may itself contain pipes; only the first one separates.
        let (code, payload) = text
            .split_once('|')
            .ok_or(DecodeError::InsufficientFields { got: 1, want: 2 })?;
        let code = code.trim().to_string();
        let payload = payload.trim().to_string();

        if code == SUCCESS_CODE {
            return Ok(AuthResult {
                response_code: code,
                encrypted_password: Some(payload),
                error_message: None,
                explanation: None,
            });
        }

        let explanation = error_codes::explain_rejection(&code, &payload);
        Ok(AuthResult {
            response_code: code,
            encrypted_password: None,
            error_message: Some(payload),
            explanation: Some(explanation),
        })
    }

    fn is_success(response: &AuthResult) -> bool {
        response.is_success()
    }
}
