//! SOAP/XML personality for SIP and XSIP
//!
//! Callers post an envelope whose body holds one operation element with
//! the same positional children the counterparty expects. The request is
//! lifted into the JSON request types and run through the same pipelines,
//! so validation and wire encoding are shared with the JSON surface.

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{info, warn};

use crate::bse::sip::{RecurringResponse, SipRequest};
use crate::bse::soap;
use crate::bse::xsip::XsipRequest;
use crate::bse::{OrderPipeline, OrderType, SipOrder, XsipOrder};
use crate::error::{GatewayError, GatewayResult};

/// Inbound operation element, located by local name
struct Operation<'a> {
    inner: &'a str,
}

impl<'a> Operation<'a> {
    fn locate(raw: &'a str, names: &[&'static str]) -> GatewayResult<Self> {
        names
            .iter()
            .find_map(|name| soap::element_text(raw, name))
            .map(|inner| Self { inner })
            .ok_or_else(|| GatewayError::BadRequest {
                message: format!("SOAP body must contain a {} element", names[0]),
            })
    }

    /// First present child among `names`, unescaped; empty when absent
    fn text(&self, names: &[&str]) -> String {
        names
            .iter()
            .find_map(|name| soap::element_text(self.inner, name))
            .map(|text| soap::unescape(text).into_owned())
            .unwrap_or_default()
    }

    fn number(&self, name: &str) -> Option<i64> {
        let text = self.text(&[name]);
        text.parse().ok()
    }

    fn sip_request(&self, reg_names: &[&str]) -> SipRequest {
        SipRequest {
            transaction_code: self.text(&["TransactionCode", "TransCode"]),
            unique_ref_no: self.text(&["UniqueRefNo"]),
            scheme_code: self.text(&["SchemeCode"]),
            member_id: self.text(&["MemberCode", "MemberId"]),
            client_code: self.text(&["ClientCode"]),
            user_id: self.text(&["UserID", "UserId"]),
            internal_ref_no: self.text(&["InternalRefNo"]),
            trans_mode: self.text(&["TransMode"]),
            dp_transaction_mode: self.text(&["DpTxnMode"]),
            start_date: self.text(&["StartDate"]),
            frequency_type: self.text(&["FrequencyType"]),
            frequency_allowed: self.number("FrequencyAllowed"),
            installment_amount: self.number("InstallmentAmount"),
            no_of_installments: self.number("NoOfInstallment"),
            remarks: self.text(&["Remarks"]),
            folio_no: self.text(&["FolioNo"]),
            first_order_flag: self.text(&["FirstOrderFlag"]),
            sub_br_code: self.text(&["SubberCode", "SubBrCode"]),
            euin: self.text(&["Euin", "EUIN"]),
            euin_declaration: self.text(&["EuinVal", "EUINFlag"]),
            dpc: self.text(&["DPC"]),
            reg_id: self.text(reg_names),
            ip_address: self.text(&["IPAdd"]),
            password: self.text(&["Password"]),
            pass_key: self.text(&["PassKey"]),
            param1: self.text(&["Param1"]),
            param2: self.text(&["Param2"]),
            param3: self.text(&["Param3"]),
            filler1: self.text(&["Filler1"]),
            filler2: self.text(&["Filler2"]),
            filler3: self.text(&["Filler3"]),
            filler4: self.text(&["Filler4"]),
            filler5: self.text(&["Filler5"]),
            filler6: self.text(&["Filler6"]),
        }
    }

    fn xsip_request(&self) -> XsipRequest {
        XsipRequest {
            order: self.sip_request(&["XsipRegID", "XsipRegId", "RegId"]),
            mandate_id: self.text(&["MandateID", "MandateId"]),
            brokerage: self.text(&["Brokerage"]),
        }
    }
}

fn parse_sip(raw: &str, names: &[&'static str], cancellation: bool) -> GatewayResult<SipRequest> {
    let mut request = Operation::locate(raw, names)?.sip_request(&["RegId", "SIPRegId"]);
    if cancellation {
        request.transaction_code = "CXL".to_string();
    }
    Ok(request)
}

fn parse_xsip(raw: &str, names: &[&'static str], cancellation: bool) -> GatewayResult<XsipRequest> {
    let mut request = Operation::locate(raw, names)?.xsip_request();
    if cancellation {
        request.order.transaction_code = "CXL".to_string();
    }
    Ok(request)
}

fn soap_reply(status: StatusCode, body: String) -> Response {
    (status, [(header::CONTENT_TYPE, soap::SOAP_CONTENT_TYPE)], body).into_response()
}

fn soap_fault(error: &GatewayError) -> Response {
    let sender = matches!(
        error,
        GatewayError::Validation(_) | GatewayError::BadRequest { .. }
    );
    let reason = match error {
        GatewayError::Transport(_) => "Failed to reach the order processing service".to_string(),
        GatewayError::Decode(_) => "Unexpected response from the order processing service".to_string(),
        other => other.to_string(),
    };
    soap_reply(error.status_code(), soap::fault(sender, &reason))
}

async fn respond<O>(
    pipeline: &OrderPipeline<O>,
    operation: &'static str,
    request: GatewayResult<O::Request>,
) -> Response
where
    O: OrderType<Response = RecurringResponse>,
{
    let outcome = match request {
        Ok(request) => {
            info!(order_type = O::NAME, reference = O::reference(&request), operation, "SOAP request received");
            pipeline.execute(&request).await
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(response) => soap_reply(
            StatusCode::OK,
            soap::response_envelope(operation, &response.to_record()),
        ),
        Err(e) => {
            warn!(order_type = O::NAME, operation, "SOAP request failed: {}", e);
            soap_fault(&e)
        }
    }
}

/// `POST /soap/SipOrderEntry`
pub async fn sip_order_entry(State(pipeline): State<OrderPipeline<SipOrder>>, body: String) -> Response {
    let request = parse_sip(&body, &["SipOrderEntry", "sipOrderEntryParam"], false);
    respond(&pipeline, "SipOrderEntry", request).await
}

/// `POST /soap/SipCancellation`
pub async fn sip_cancellation(State(pipeline): State<OrderPipeline<SipOrder>>, body: String) -> Response {
    let request = parse_sip(&body, &["SipCancellation", "sipOrderEntryParam"], true);
    respond(&pipeline, "SipCancellation", request).await
}

/// `POST /soap/XsipOrderEntry`
pub async fn xsip_order_entry(State(pipeline): State<OrderPipeline<XsipOrder>>, body: String) -> Response {
    let request = parse_xsip(&body, &["XsipOrderEntry", "xsipOrderEntryParam"], false);
    respond(&pipeline, "XsipOrderEntry", request).await
}

/// `POST /soap/XsipCancellation`
pub async fn xsip_cancellation(State(pipeline): State<OrderPipeline<XsipOrder>>, body: String) -> Response {
    let request = parse_xsip(&body, &["XsipCancellation", "xsipOrderEntryParam"], true);
    respond(&pipeline, "XsipCancellation", request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CANCEL: &str = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
        <soap:Body>
            <SipCancellation xmlns="http://bsestarmf.in/">
                <TransactionCode>NEW</TransactionCode>
                <UniqueRefNo>REF9</UniqueRefNo>
                <MemberCode>M001</MemberCode>
                <UserID>12345</UserID>
                <RegId>556677</RegId>
                <Euin>E1</Euin>
                <EuinVal>Y</EuinVal>
                <Filler2>13</Filler2>
                <Filler3>moving &amp; closing</Filler3>
            </SipCancellation>
        </soap:Body>
    </soap:Envelope>"#;

    #[test]
    fn cancellation_forces_cxl_and_reads_cease_fillers() {
        let request = parse_sip(CANCEL, &["SipCancellation"], true).unwrap();
        assert_eq!(request.transaction_code, "CXL");
        assert_eq!(request.reg_id, "556677");
        assert_eq!(request.user_id, "12345");
        assert_eq!(request.filler2, "13");
        assert_eq!(request.filler3, "moving & closing");
        assert_eq!(request.euin, "E1");
        assert_eq!(request.euin_declaration, "Y");
    }

    #[test]
    fn xsip_reads_registration_and_mandate() {
        let raw = "<b:XsipOrderEntry xmlns:b=\"x\"><b:UserId>1</b:UserId>\
                   <b:XsipRegID>42</b:XsipRegID><b:MandateID>MD1</b:MandateID>\
                   <b:InstallmentAmount>500</b:InstallmentAmount>\
                   <b:NoOfInstallment>abc</b:NoOfInstallment></b:XsipOrderEntry>";
        let request = parse_xsip(raw, &["XsipOrderEntry"], false).unwrap();
        assert_eq!(request.order.reg_id, "42");
        assert_eq!(request.order.user_id, "1");
        assert_eq!(request.mandate_id, "MD1");
        assert_eq!(request.order.installment_amount, Some(500));
        assert_eq!(request.order.no_of_installments, None);
    }

    #[test]
    fn missing_operation_is_a_bad_request() {
        let err = parse_sip("<soap:Envelope/>", &["SipOrderEntry"], false).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("SipOrderEntry"));
    }
}
