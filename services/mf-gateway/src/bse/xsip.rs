//! XSIP registration and cancellation (`xsipOrderEntryParam`)

use serde::{Deserialize, Serialize};

use super::pipeline::OrderType;
use super::sip::{RecurringResponse, SipRequest};
use super::soap;
use super::transport::WirePayload;
use super::validation::{max_len, one_of, required};
use crate::error::{DecodeError, ValidationError};

const OPERATION: &str = "xsipOrderEntryParam";
const ACTION: &str = "http://bsestarmf.in/MFOrderEntry/xsipOrderEntryParam";
const RESULT_ELEMENT: &str = "xsipOrderEntryParamResult";

/// XSIP request: every SIP field plus the debit mandate
///
/// On cancellation the cease code travels in `filler3` and its remark in
/// `filler4`; `reg_id` carries the XSIP registration number.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct XsipRequest {
    #[serde(flatten)]
    pub order: SipRequest,
    /// Debit mandate registered with the counterparty
    pub mandate_id: String,
    pub brokerage: String,
}

/// `xsipOrderEntryParam` descriptor
#[derive(Debug, Clone, Copy)]
pub struct XsipOrder;

impl OrderType for XsipOrder {
    type Request = XsipRequest;
    type Response = RecurringResponse;

    const NAME: &'static str = "xsip";

    fn reference(request: &XsipRequest) -> &str {
        &request.order.unique_ref_no
    }

    fn validate(request: &XsipRequest) -> Result<(), ValidationError> {
        let order = &request.order;
        order.validate_common(
            "reg_id",
            ("filler3", &order.filler3),
            ("filler4", &order.filler4),
        )?;
        if order.is_new() {
            one_of("euin_declaration", &order.euin_declaration, &["Y", "N"])?;
            required("dpc", &order.dpc)?;
            required("mandate_id", &request.mandate_id)?;
        }
        max_len("mandate_id", &request.mandate_id, 20)
    }

    fn encode(request: &XsipRequest, endpoint: &str) -> WirePayload {
        let order = &request.order;
        let schedule = order.schedule_fields();
        let credentials = order.credential_fields();
        let middle = [
            ("FolioNo", order.folio_no.as_str()),
            ("FirstOrderFlag", order.first_order_flag.as_str()),
            ("Brokerage", request.brokerage.as_str()),
            ("MandateID", request.mandate_id.as_str()),
            ("SubberCode", order.sub_br_code.as_str()),
            ("Euin", order.euin.as_str()),
            ("EuinVal", order.euin_declaration.as_str()),
            ("DPC", order.dpc.as_str()),
            ("XsipRegID", order.reg_id.as_str()),
        ];

        let fields: Vec<(&str, &str)> = schedule
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .chain(middle)
            .chain(credentials.iter().map(|(name, value)| (*name, value.as_str())))
            .collect();

        WirePayload::soap(soap::envelope(OPERATION, ACTION, endpoint, &fields), ACTION)
    }

    fn decode(raw: &str) -> Result<RecurringResponse, DecodeError> {
        RecurringResponse::decode(raw, RESULT_ELEMENT)
    }

    fn is_success(response: &RecurringResponse) -> bool {
        response.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn registration() -> XsipRequest {
        serde_json::from_value(json!({
            "transaction_code": "NEW",
            "unique_ref_no": "XREF01",
            "scheme_code": "SCH02",
            "member_id": "M001",
            "client_code": "CL002",
            "user_id": "12345",
            "trans_mode": "D",
            "dp_transaction_mode": "C",
            "start_date": "05/03/2025",
            "frequency_type": "MONTHLY",
            "frequency_allowed": 1,
            "installment_amount": 2500,
            "no_of_installments": 24,
            "first_order_flag": "N",
            "euin_declaration": "Y",
            "dpc": "Y",
            "password": "ENC",
            "pass_key": "key1",
            "mandate_id": "MND778"
        }))
        .unwrap()
    }

    #[test]
    fn flattened_json_fills_the_common_record() {
        let req = registration();
        assert_eq!(req.order.installment_amount, Some(2500));
        assert_eq!(req.mandate_id, "MND778");
        assert_eq!(XsipOrder::validate(&req), Ok(()));
    }

    #[test]
    fn new_registration_requires_mandate() {
        let mut req = registration();
        req.mandate_id.clear();
        assert_eq!(XsipOrder::validate(&req).unwrap_err().field, "mandate_id");
    }

    #[test]
    fn cancellation_uses_filler3_and_filler4() {
        let mut req = registration();
        req.order.transaction_code = "CXL".to_string();
        req.order.reg_id = "7788".to_string();
        req.order.filler3 = "13".to_string();
        assert_eq!(XsipOrder::validate(&req).unwrap_err().field, "filler4");

        req.order.filler4 = "switching scheme".to_string();
        req.mandate_id.clear();
        assert_eq!(XsipOrder::validate(&req), Ok(()));
    }

    #[test]
    fn encodes_mandate_before_registration_id() {
        let payload = XsipOrder::encode(&registration(), "https://example.test/MFOrder.svc");
        let mandate = payload.body.find("<bses:MandateID>MND778</bses:MandateID>").unwrap();
        let reg = payload.body.find("<bses:XsipRegID>").unwrap();
        assert!(mandate < reg);
        assert_eq!(payload.soap_action.as_deref(), Some(ACTION));
    }

    #[test]
    fn decodes_xsip_result() {
        let raw = "<a:xsipOrderEntryParamResult>NEW|XREF01|M001|CL002|12345|3344|XSIP REGISTERED|Y</a:xsipOrderEntryParamResult>";
        let resp = XsipOrder::decode(raw).unwrap();
        assert_eq!(resp.reg_id, "3344");
        assert!(resp.success);
    }
}
