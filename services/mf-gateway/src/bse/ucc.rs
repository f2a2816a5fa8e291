//! Client (UCC) registration over the counterparty's JSON API

use serde::{Deserialize, Serialize};

use super::pipeline::OrderType;
use super::transport::WirePayload;
use super::validation::{all_required, one_of};
use crate::error::{DecodeError, ValidationError};

/// Registration or modification of a client master record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct UccRequest {
    pub user_id: String,
    pub member_code: String,
    pub password: String,
    /// NEW or MOD
    pub regn_type: String,
    /// Pipe-delimited client master record, passed through untouched
    pub param: String,
    pub filler1: String,
    pub filler2: String,
}

/// Counterparty reply; `Status` 0 is success, 1 failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UccResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub remarks: String,
    #[serde(default)]
    pub filler1: String,
    #[serde(default)]
    pub filler2: String,
    #[serde(rename = "success", default)]
    pub success: bool,
}

/// UCC registration descriptor
#[derive(Debug, Clone, Copy)]
pub struct UccRegistration;

impl OrderType for UccRegistration {
    type Request = UccRequest;
    type Response = UccResponse;

    const NAME: &'static str = "ucc";

    fn reference(request: &UccRequest) -> &str {
        &request.member_code
    }

    fn validate(request: &UccRequest) -> Result<(), ValidationError> {
        all_required(&[
            ("UserId", &request.user_id),
            ("MemberCode", &request.member_code),
            ("Password", &request.password),
            ("RegnType", &request.regn_type),
            ("Param", &request.param),
        ])?;
        one_of("RegnType", &request.regn_type, &["NEW", "MOD"])
    }

    fn encode(request: &UccRequest, _endpoint: &str) -> WirePayload {
        WirePayload::json(serde_json::to_string(request).unwrap_or_default())
    }

    fn decode(raw: &str) -> Result<UccResponse, DecodeError> {
        let mut response: UccResponse = serde_json::from_str(raw)?;
        response.success = response.status == "0";
        Ok(response)
    }

    fn is_success(response: &UccResponse) -> bool {
        response.success
    }
}
