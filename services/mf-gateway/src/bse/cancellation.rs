//! Enhanced SIP/XSIP cancellation over the counterparty's JSON API

use serde::{Deserialize, Deserializer, Serialize};

use super::pipeline::OrderType;
use super::sip::CEASE_CODE_OTHER;
use super::transport::WirePayload;
use super::validation::{all_required, max_lens, required, required_when};
use crate::error::{DecodeError, Rule, ValidationError};

/// Path of the SIP cancellation operation under the enhanced API base
pub const SIP_CANCELLATION_PATH: &str = "/SIP/SIPCancellation";
/// Path of the XSIP cancellation operation under the enhanced API base
pub const XSIP_CANCELLATION_PATH: &str = "/XSIP/XSIPCancellation";

/// Flag value the enhanced API uses for success
pub const SUCCESS_FLAG: &str = "0";

/// Cancellation of a registered SIP or XSIP
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CancellationRequest {
    pub login_id: String,
    pub member_code: String,
    pub password: String,
    pub client_code: String,
    /// Registration number to cancel
    pub regn_no: i64,
    pub int_ref_no: String,
    /// Reason code; `13` requires `remarks`
    pub cease_bse_code: String,
    pub remarks: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireRequest<'a> {
    login_id: &'a str,
    member_code: &'a str,
    password: &'a str,
    client_code: &'a str,
    regn_no: i64,
    int_ref_no: &'a str,
    cease_bse_code: &'a str,
    remarks: &'a str,
}

/// Counterparty reply to a cancellation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationResponse {
    #[serde(
        alias = "RegId",
        alias = "SIPRegId",
        alias = "XSIPRegId",
        alias = "sip_reg_id",
        alias = "xsip_reg_id",
        default,
        deserialize_with = "lenient_reg_id"
    )]
    pub reg_id: i64,
    #[serde(alias = "BSERemarks", default)]
    pub bse_remarks: String,
    /// `0` success, `1` failure
    #[serde(alias = "SuccessFlag", default)]
    pub success_flag: String,
    #[serde(alias = "IntRefNo", default)]
    pub int_ref_no: String,
    #[serde(default)]
    pub success: bool,
}

/// Registration numbers arrive as JSON numbers or numeric strings
fn lenient_reg_id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
        Null(()),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => super::soap::lenient_i64(&s),
        Raw::Null(()) => 0,
    })
}

fn validate(request: &CancellationRequest) -> Result<(), ValidationError> {
    all_required(&[
        ("login_id", &request.login_id),
        ("member_code", &request.member_code),
        ("password", &request.password),
        ("client_code", &request.client_code),
    ])?;
    if request.regn_no == 0 {
        return Err(ValidationError::new("regn_no", Rule::Required, "regn_no is required"));
    }
    required("cease_bse_code", &request.cease_bse_code)?;
    required_when(
        "remarks",
        &request.remarks,
        "cease_bse_code",
        &request.cease_bse_code,
        CEASE_CODE_OTHER,
    )?;
    max_lens(&[
        ("login_id", &request.login_id, 20),
        ("member_code", &request.member_code, 20),
        ("client_code", &request.client_code, 10),
        ("int_ref_no", &request.int_ref_no, 20),
        ("cease_bse_code", &request.cease_bse_code, 2),
        ("remarks", &request.remarks, 200),
    ])
}

fn encode(request: &CancellationRequest) -> WirePayload {
    let wire = WireRequest {
        login_id: &request.login_id,
        member_code: &request.member_code,
        password: &request.password,
        client_code: &request.client_code,
        regn_no: request.regn_no,
        int_ref_no: &request.int_ref_no,
        cease_bse_code: &request.cease_bse_code,
        remarks: &request.remarks,
    };
    // Serialising a struct of strings and an integer cannot fail.
    WirePayload::json(serde_json::to_string(&wire).unwrap_or_default())
}

fn decode(raw: &str) -> Result<CancellationResponse, DecodeError> {
    let mut response: CancellationResponse = serde_json::from_str(raw)?;
    response.success = response.success_flag == SUCCESS_FLAG;
    Ok(response)
}

/// Enhanced SIP cancellation descriptor
#[derive(Debug, Clone, Copy)]
pub struct SipCancellation;

/// Enhanced XSIP cancellation descriptor
#[derive(Debug, Clone, Copy)]
pub struct XsipCancellation;

macro_rules! cancellation_order_type {
    ($descriptor:ty, $name:literal) => {
        impl OrderType for $descriptor {
            type Request = CancellationRequest;
            type Response = CancellationResponse;

            const NAME: &'static str = $name;

            fn reference(request: &CancellationRequest) -> &str {
                &request.int_ref_no
            }

            fn validate(request: &CancellationRequest) -> Result<(), ValidationError> {
                validate(request)
            }

            fn encode(request: &CancellationRequest, _endpoint: &str) -> WirePayload {
                encode(request)
            }

            fn decode(raw: &str) -> Result<CancellationResponse, DecodeError> {
                decode(raw)
            }

            fn is_success(response: &CancellationResponse) -> bool {
                response.success
            }
        }
    };
}

cancellation_order_type!(SipCancellation, "enhanced_sip_cancellation");
cancellation_order_type!(XsipCancellation, "enhanced_xsip_cancellation");

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn request(code: &str, remarks: &str) -> CancellationRequest {
        CancellationRequest {
            login_id: "LOGIN1".to_string(),
            member_code: "M001".to_string(),
            password: "pw".to_string(),
            client_code: "CL001".to_string(),
            regn_no: 123_456,
            int_ref_no: "INT1".to_string(),
            cease_bse_code: code.to_string(),
            remarks: remarks.to_string(),
        }
    }

    #[rstest]
    #[case("13", "", false)]
    #[case("13", "investor request", true)]
    #[case("04", "", true)]
    fn cease_code_13_needs_remarks(#[case] code: &str, #[case] remarks: &str, #[case] ok: bool) {
        assert_eq!(SipCancellation::validate(&request(code, remarks)).is_ok(), ok);
    }

    #[test]
    fn zero_registration_is_rejected() {
        let mut req = request("04", "");
        req.regn_no = 0;
        assert_eq!(XsipCancellation::validate(&req).unwrap_err().field, "regn_no");
    }

    #[test]
    fn client_code_limited_to_ten() {
        let mut req = request("04", "");
        req.client_code = "CLIENT00001".to_string();
        let err = SipCancellation::validate(&req).unwrap_err();
        assert_eq!(err.field, "client_code");
        assert_eq!(err.rule, Rule::MaxLength);
    }

    #[test]
    fn encodes_pascal_case_json() {
        let payload = SipCancellation::encode(&request("13", "other"), "");
        let body: serde_json::Value = serde_json::from_str(&payload.body).unwrap();
        assert_eq!(body["LoginId"], "LOGIN1");
        assert_eq!(body["RegnNo"], 123_456);
        assert_eq!(body["CeaseBseCode"], "13");
        assert_eq!(payload.soap_action, None);
    }

    #[rstest]
    #[case(r#"{"SIPRegId":123456,"BSERemarks":"CANCELLED","SuccessFlag":"0","IntRefNo":"INT1"}"#, 123_456, true)]
    #[case(r#"{"XSIPRegId":"998","BSERemarks":"NOT FOUND","SuccessFlag":"1","IntRefNo":""}"#, 998, false)]
    #[case(r#"{"reg_id":null,"bse_remarks":"x","success_flag":"1"}"#, 0, false)]
    fn decodes_either_spelling(#[case] raw: &str, #[case] reg_id: i64, #[case] success: bool) {
        let resp = XsipCancellation::decode(raw).unwrap();
        assert_eq!(resp.reg_id, reg_id);
        assert_eq!(resp.success, success);
    }

    #[test]
    fn html_body_is_a_decode_error() {
        assert!(matches!(
            SipCancellation::decode("<html>maintenance</html>"),
            Err(DecodeError::Json(_))
        ));
    }
}
