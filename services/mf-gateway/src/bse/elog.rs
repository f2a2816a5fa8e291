//! Two-factor ELOG flow: request submission and loopback evaluation

use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::pipeline::OrderType;
use super::transport::WirePayload;
use super::validation::{all_required, one_of};
use crate::error::{DecodeError, Rule, ValidationError};

/// Status code for an accepted ELOG request
pub const STATUS_SUCCESS: &str = "100";
/// Status code for any ELOG failure, including gateway-side ones
pub const STATUS_FAILURE: &str = "101";

/// ELOG request, keyed exactly as the counterparty expects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElogRequest {
    pub userid: String,
    pub memberid: String,
    pub password: String,
    pub clientcode: String,
    /// 1, 2 or 3
    pub holder: String,
    /// NRM or RIA
    pub documenttype: String,
    pub intrefno: String,
    /// HTTPS URL the counterparty calls back after approval
    pub loopbackurl: String,
    /// Y to receive extra variables on the loopback
    pub allowloopbackmsg: String,
}

/// Counterparty ELOG reply, relayed to the caller unchanged
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElogResponse {
    pub statuscode: String,
    pub authurl: String,
    pub errordesc: String,
    pub intrefno: String,
}

impl ElogResponse {
    /// Failure body in the counterparty's own shape
    #[must_use]
    pub fn failure(message: impl Into<String>, intrefno: impl Into<String>) -> Self {
        Self {
            statuscode: STATUS_FAILURE.to_string(),
            authurl: String::new(),
            errordesc: message.into(),
            intrefno: intrefno.into(),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.statuscode == STATUS_SUCCESS
    }
}

/// ELOG request descriptor
#[derive(Debug, Clone, Copy)]
pub struct ElogSubmission;

impl OrderType for ElogSubmission {
    type Request = ElogRequest;
    type Response = ElogResponse;

    const NAME: &'static str = "elog";

    fn reference(request: &ElogRequest) -> &str {
        &request.intrefno
    }

    fn validate(request: &ElogRequest) -> Result<(), ValidationError> {
        all_required(&[
            ("userid", &request.userid),
            ("memberid", &request.memberid),
            ("password", &request.password),
            ("clientcode", &request.clientcode),
            ("holder", &request.holder),
            ("documenttype", &request.documenttype),
            ("loopbackurl", &request.loopbackurl),
            ("allowloopbackmsg", &request.allowloopbackmsg),
        ])?;
        one_of("holder", &request.holder, &["1", "2", "3"])?;
        one_of("documenttype", &request.documenttype, &["NRM", "RIA"])?;
        one_of("allowloopbackmsg", &request.allowloopbackmsg, &["Y", "N"])?;

        let url = Url::parse(&request.loopbackurl).map_err(|_| {
            ValidationError::new("loopbackurl", Rule::Format, "invalid loopback URL format")
        })?;
        if url.scheme() != "https" {
            return Err(ValidationError::new(
                "loopbackurl",
                Rule::Format,
                "loopback URL must use HTTPS",
            ));
        }
        Ok(())
    }

    fn encode(request: &ElogRequest, _endpoint: &str) -> WirePayload {
        WirePayload::json(serde_json::to_string(request).unwrap_or_default())
    }

    fn decode(raw: &str) -> Result<ElogResponse, DecodeError> {
        Ok(serde_json::from_str(raw)?)
    }

    fn is_success(response: &ElogResponse) -> bool {
        response.is_success()
    }
}

/// Outcome of a loopback callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackOutcome {
    pub status: String,
    pub elg_status: String,
    pub is_valid: bool,
    pub message: String,
    pub description: String,
    /// Unix seconds when the callback was evaluated
    pub timestamp: i64,
}

/// Describe a three-character holder approval bitmask
///
/// Position *i* holds `1` when holder *i* approved.
#[must_use]
pub fn describe_elg_status(elg_status: &str) -> String {
    let description = match elg_status {
        "111" => "All holders ELOG approved",
        "110" => "Primary and secondary holders ELOG approved",
        "101" => "Primary and third holders ELOG approved",
        "100" => "Only primary holder ELOG approved",
        "011" => "Secondary and third holders ELOG approved",
        "010" => "Only secondary holder ELOG approved",
        "001" => "Only third holder ELOG approved",
        "000" => "No holders ELOG approved",
        other if other.chars().count() == 3 => return format!("Custom ELG status: {other}"),
        _ => "Invalid ELG status format",
    };
    description.to_string()
}

/// Whether a callback represents a completed approval, and why
///
/// Only `SUCCESS` with the primary holder's bit set is valid.
#[must_use]
pub fn validate_elg_status(status: &str, elg_status: &str) -> (bool, &'static str) {
    match status {
        "SUCCESS" => {
            let primary_approved =
                elg_status.chars().count() == 3 && elg_status.starts_with('1');
            if primary_approved {
                (true, "ELOG authentication successful")
            } else {
                (false, "ELOG authentication failed: primary holder not approved")
            }
        }
        "FAILURE" => (false, "ELOG authentication failed"),
        "PENDING" => (false, "ELOG authentication pending"),
        _ => (false, "Unknown ELOG status"),
    }
}

/// Evaluate a loopback callback at `timestamp`
#[must_use]
pub fn evaluate_callback(status: &str, elg_status: &str, timestamp: i64) -> CallbackOutcome {
    let (is_valid, message) = validate_elg_status(status, elg_status);
    CallbackOutcome {
        status: status.to_string(),
        elg_status: elg_status.to_string(),
        is_valid,
        message: message.to_string(),
        description: describe_elg_status(elg_status),
        timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn request() -> ElogRequest {
        ElogRequest {
            userid: "12345".to_string(),
            memberid: "M001".to_string(),
            password: "pw".to_string(),
            clientcode: "CL001".to_string(),
            holder: "1".to_string(),
            documenttype: "NRM".to_string(),
            intrefno: "REF9".to_string(),
            loopbackurl: "https://callback.example.test/elog".to_string(),
            allowloopbackmsg: "Y".to_string(),
        }
    }

    #[test]
    fn valid_request_passes() {
        assert_eq!(ElogSubmission::validate(&request()), Ok(()));
    }

    #[rstest]
    #[case("http://callback.example.test/elog", "loopback URL must use HTTPS")]
    #[case("not a url", "invalid loopback URL format")]
    fn loopback_must_be_https(#[case] url: &str, #[case] message: &str) {
        let mut req = request();
        req.loopbackurl = url.to_string();
        assert_eq!(ElogSubmission::validate(&req).unwrap_err().message, message);
    }

    #[test]
    fn holder_range() {
        let mut req = request();
        req.holder = "4".to_string();
        assert_eq!(ElogSubmission::validate(&req).unwrap_err().field, "holder");
    }

    #[test]
    fn relays_counterparty_body() {
        let resp = ElogSubmission::decode(
            r#"{"statuscode":"100","authurl":"https://auth.example.test/x","errordesc":"","intrefno":"REF9"}"#,
        )
        .unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.authurl, "https://auth.example.test/x");
    }

    #[rstest]
    #[case("111", "All holders ELOG approved")]
    #[case("101", "Primary and third holders ELOG approved")]
    #[case("000", "No holders ELOG approved")]
    #[case("1x1", "Custom ELG status: 1x1")]
    #[case("11", "Invalid ELG status format")]
    #[case("", "Invalid ELG status format")]
    fn bitmask_descriptions(#[case] bits: &str, #[case] expected: &str) {
        assert_eq!(describe_elg_status(bits), expected);
    }

    #[test]
    fn primary_and_third_holder_is_valid() {
        let outcome = evaluate_callback("SUCCESS", "101", 1_700_000_000);
        assert!(outcome.is_valid);
        assert_eq!(outcome.description, "Primary and third holders ELOG approved");
        assert_eq!(outcome.message, "ELOG authentication successful");
    }

    #[rstest]
    #[case("SUCCESS", "011", false)]
    #[case("SUCCESS", "1", false)]
    #[case("FAILURE", "111", false)]
    #[case("PENDING", "100", false)]
    #[case("SOMETHING", "111", false)]
    #[case("SUCCESS", "100", true)]
    fn validity(#[case] status: &str, #[case] bits: &str, #[case] valid: bool) {
        assert_eq!(validate_elg_status(status, bits).0, valid);
    }
}
