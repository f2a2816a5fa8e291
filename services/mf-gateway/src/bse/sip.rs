//! SIP registration and cancellation (`sipOrderEntryParam`)
//!
//! XSIP reuses the request record, the common rules and the response
//! decoder defined here; see [`super::xsip`].

use serde::{Deserialize, Serialize};

use super::pipeline::OrderType;
use super::soap;
use super::transport::WirePayload;
use super::validation::{all_required, max_lens, one_of, positive, required, required_when};
use crate::error::{DecodeError, ValidationError};

const OPERATION: &str = "sipOrderEntryParam";
const ACTION: &str = "http://bsestarmf.in/MFOrderEntry/sipOrderEntryParam";
const RESULT_ELEMENT: &str = "sipOrderEntryParamResult";

/// Positional fields every SIP/XSIP result must carry
pub(super) const RESULT_FIELDS: usize = 8;

/// Cease code that obliges the caller to explain the cancellation
pub const CEASE_CODE_OTHER: &str = "13";

/// SIP registration (`NEW`) or cancellation (`CXL`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SipRequest {
    /// NEW or CXL
    pub transaction_code: String,
    pub unique_ref_no: String,
    pub scheme_code: String,
    pub member_id: String,
    pub client_code: String,
    pub user_id: String,
    pub internal_ref_no: String,
    /// D (demat) or P (physical)
    pub trans_mode: String,
    /// C, N or P
    pub dp_transaction_mode: String,
    /// dd/MM/yyyy
    pub start_date: String,
    /// MONTHLY, QUARTERLY or WEEKLY
    pub frequency_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_allowed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub installment_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_of_installments: Option<i64>,
    pub remarks: String,
    pub folio_no: String,
    /// Y places the first instalment today
    pub first_order_flag: String,
    pub sub_br_code: String,
    pub euin: String,
    pub euin_declaration: String,
    pub dpc: String,
    /// Registration number being cancelled
    pub reg_id: String,
    pub ip_address: String,
    pub password: String,
    pub pass_key: String,
    pub param1: String,
    pub param2: String,
    pub param3: String,
    pub filler1: String,
    /// SIP cease code on cancellation
    pub filler2: String,
    /// SIP cease remark on cancellation
    pub filler3: String,
    /// XSIP cease remark on cancellation
    pub filler4: String,
    pub filler5: String,
    pub filler6: String,
}

fn number(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl SipRequest {
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.transaction_code == "NEW"
    }

    /// Rules shared by SIP and XSIP
    ///
    /// The cease code/remark live in different fillers per order type, so
    /// the caller names them.
    pub(super) fn validate_common(
        &self,
        reg_field: &'static str,
        cease_code: (&'static str, &str),
        cease_remark: (&'static str, &str),
    ) -> Result<(), ValidationError> {
        one_of("transaction_code", &self.transaction_code, &["NEW", "CXL"])?;
        all_required(&[
            ("unique_ref_no", &self.unique_ref_no),
            ("scheme_code", &self.scheme_code),
            ("member_id", &self.member_id),
            ("client_code", &self.client_code),
            ("user_id", &self.user_id),
            ("password", &self.password),
            ("pass_key", &self.pass_key),
        ])?;

        if self.is_new() {
            one_of("trans_mode", &self.trans_mode, &["D", "P"])?;
            one_of("dp_transaction_mode", &self.dp_transaction_mode, &["C", "N", "P"])?;
            required("start_date", &self.start_date)?;
            one_of("frequency_type", &self.frequency_type, &["MONTHLY", "QUARTERLY", "WEEKLY"])?;
            positive("installment_amount", self.installment_amount)?;
            positive("no_of_installments", self.no_of_installments)?;
            one_of("first_order_flag", &self.first_order_flag, &["Y", "N"])?;
        } else {
            required(reg_field, &self.reg_id)?;
            required(cease_code.0, cease_code.1)?;
            required_when(cease_remark.0, cease_remark.1, cease_code.0, cease_code.1, CEASE_CODE_OTHER)?;
        }

        max_lens(&[
            ("unique_ref_no", &self.unique_ref_no, 19),
            ("user_id", &self.user_id, 5),
            ("member_id", &self.member_id, 20),
            ("client_code", &self.client_code, 20),
            ("scheme_code", &self.scheme_code, 20),
            ("internal_ref_no", &self.internal_ref_no, 25),
            ("remarks", &self.remarks, 100),
            ("password", &self.password, 250),
            ("pass_key", &self.pass_key, 10),
            (cease_code.0, cease_code.1, 2),
            (cease_remark.0, cease_remark.1, 200),
        ])
    }

    /// Positional children shared by both operations, up to `Remarks`
    pub(super) fn schedule_fields(&self) -> [(&'static str, String); 15] {
        [
            ("TransactionCode", self.transaction_code.clone()),
            ("UniqueRefNo", self.unique_ref_no.clone()),
            ("SchemeCode", self.scheme_code.clone()),
            ("MemberCode", self.member_id.clone()),
            ("ClientCode", self.client_code.clone()),
            ("UserID", self.user_id.clone()),
            ("InternalRefNo", self.internal_ref_no.clone()),
            ("TransMode", self.trans_mode.clone()),
            ("DpTxnMode", self.dp_transaction_mode.clone()),
            ("StartDate", self.start_date.clone()),
            ("FrequencyType", self.frequency_type.clone()),
            ("FrequencyAllowed", number(self.frequency_allowed)),
            ("InstallmentAmount", number(self.installment_amount)),
            ("NoOfInstallment", number(self.no_of_installments)),
            ("Remarks", self.remarks.clone()),
        ]
    }

    /// Trailing credential, param and filler children shared by both operations
    pub(super) fn credential_fields(&self) -> [(&'static str, String); 12] {
        [
            ("IPAdd", self.ip_address.clone()),
            ("Password", self.password.clone()),
            ("PassKey", self.pass_key.clone()),
            ("Param1", self.param1.clone()),
            ("Param2", self.param2.clone()),
            ("Param3", self.param3.clone()),
            ("Filler1", self.filler1.clone()),
            ("Filler2", self.filler2.clone()),
            ("Filler3", self.filler3.clone()),
            ("Filler4", self.filler4.clone()),
            ("Filler5", self.filler5.clone()),
            ("Filler6", self.filler6.clone()),
        ]
    }
}

/// Decoded SIP/XSIP order-entry result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringResponse {
    pub transaction_code: String,
    pub unique_ref_no: String,
    pub member_id: String,
    pub client_code: String,
    pub user_id: String,
    /// SIP or XSIP registration number
    pub reg_id: String,
    pub bse_remarks: String,
    pub success_flag: String,
    /// Order number of the instalment placed today, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_order_today_order_no: Option<String>,
    pub success: bool,
}

impl RecurringResponse {
    /// Parse the pipe-delimited record inside `element`
    pub(super) fn decode(raw: &str, element: &'static str) -> Result<Self, DecodeError> {
        let fields = soap::result_fields(raw, element, RESULT_FIELDS)?;
        let success_flag = fields[7].clone();
        Ok(Self {
            transaction_code: fields[0].clone(),
            unique_ref_no: fields[1].clone(),
            member_id: fields[2].clone(),
            client_code: fields[3].clone(),
            user_id: fields[4].clone(),
            reg_id: fields[5].clone(),
            bse_remarks: fields[6].clone(),
            success: success_flag == "Y",
            success_flag,
            first_order_today_order_no: fields.get(8).filter(|f| !f.is_empty()).cloned(),
        })
    }

    /// Re-render as the counterparty's pipe-delimited record
    #[must_use]
    pub fn to_record(&self) -> String {
        let mut record = [
            self.transaction_code.as_str(),
            self.unique_ref_no.as_str(),
            self.member_id.as_str(),
            self.client_code.as_str(),
            self.user_id.as_str(),
            self.reg_id.as_str(),
            self.bse_remarks.as_str(),
            self.success_flag.as_str(),
        ]
        .join("|");
        if let Some(order_no) = &self.first_order_today_order_no {
            record.push('|');
            record.push_str(order_no);
        }
        record
    }
}

/// `sipOrderEntryParam` descriptor
#[derive(Debug, Clone, Copy)]
pub struct SipOrder;

impl OrderType for SipOrder {
    type Request = SipRequest;
    type Response = RecurringResponse;

    const NAME: &'static str = "sip";

    fn reference(request: &SipRequest) -> &str {
        &request.unique_ref_no
    }

    fn validate(request: &SipRequest) -> Result<(), ValidationError> {
        request.validate_common(
            "reg_id",
            ("filler2", &request.filler2),
            ("filler3", &request.filler3),
        )
    }

    fn encode(request: &SipRequest, endpoint: &str) -> WirePayload {
        let schedule = request.schedule_fields();
        let credentials = request.credential_fields();
        let order = [
            ("FolioNo", request.folio_no.as_str()),
            ("FirstOrderFlag", request.first_order_flag.as_str()),
            ("SubberCode", request.sub_br_code.as_str()),
            ("Euin", request.euin.as_str()),
            ("EuinVal", request.euin_declaration.as_str()),
            ("DPC", request.dpc.as_str()),
            ("RegId", request.reg_id.as_str()),
        ];

        let fields: Vec<(&str, &str)> = schedule
            .iter()
            .map(|(name, value)| (*name, value.as_str()))
            .chain(order)
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
