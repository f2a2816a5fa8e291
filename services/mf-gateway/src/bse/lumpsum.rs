//! Lumpsum purchase/redemption order entry (`orderEntryParam`)

use serde::{Deserialize, Serialize};

use super::pipeline::OrderType;
use super::soap;
use super::transport::WirePayload;
use super::validation::{all_required, max_lens, one_of, required};
use crate::error::{DecodeError, Rule, ValidationError};

const OPERATION: &str = "orderEntryParam";
const ACTION: &str = "http://bsestarmf.in/MFOrderEntry/orderEntryParam";
const RESULT_ELEMENT: &str = "orderEntryParamResult";
const RESULT_FIELDS: usize = 8;

const YES_NO: &[&str] = &["Y", "N"];

/// Lumpsum order as sent by internal callers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LumpsumRequest {
    /// NEW, MOD or CXL
    #[serde(rename = "TransCode")]
    pub trans_code: String,
    /// Unique reference number, e.g. `YYYYMMDD000001`
    #[serde(rename = "TransNo")]
    pub trans_no: String,
    /// Counterparty order number; blank for new orders
    #[serde(rename = "OrderId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(rename = "UserId", alias = "UserID")]
    pub user_id: i64,
    #[serde(rename = "MemberId", alias = "MemberID")]
    pub member_id: String,
    #[serde(rename = "ClientCode")]
    pub client_code: String,
    #[serde(rename = "SchemeCd")]
    pub scheme_code: String,
    /// P (purchase) or R (redemption)
    #[serde(rename = "BuySell")]
    pub buy_sell: String,
    /// FRESH or ADDITIONAL
    #[serde(rename = "BuySellType")]
    pub buy_sell_type: String,
    /// C (CDSL), N (NSDL) or P (physical)
    #[serde(rename = "DPTxn")]
    pub dp_txn: String,
    #[serde(rename = "Amount", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(rename = "Qty", skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,
    #[serde(rename = "AllRedeem")]
    pub all_redeem: String,
    #[serde(rename = "FolioNo")]
    pub folio_no: String,
    #[serde(rename = "Remarks")]
    pub remarks: String,
    #[serde(rename = "KYCStatus")]
    pub kyc_status: String,
    #[serde(rename = "RefNo")]
    pub ref_no: String,
    #[serde(rename = "SubBrCode")]
    pub sub_br_code: String,
    #[serde(rename = "EUIN")]
    pub euin: String,
    #[serde(rename = "EUINFlag")]
    pub euin_flag: String,
    #[serde(rename = "MinRedeem")]
    pub min_redeem: String,
    #[serde(rename = "DPC")]
    pub dpc: String,
    #[serde(rename = "IPAdd")]
    pub ip_address: String,
    /// Encrypted password from `getPassword`
    #[serde(rename = "Password")]
    pub password: String,
    #[serde(rename = "PassKey")]
    pub pass_key: String,
    /// Sub-broker ARN
    #[serde(rename = "Param1")]
    pub param1: String,
    /// Payment gateway reference, purchases only
    #[serde(rename = "Param2")]
    pub param2: String,
    /// Bank account number, redemptions only
    #[serde(rename = "Param3")]
    pub param3: String,
    #[serde(rename = "MobileNo")]
    pub mobile_no: String,
    #[serde(rename = "EmailID")]
    pub email_id: String,
    #[serde(rename = "MandateID")]
    pub mandate_id: String,
    #[serde(rename = "Filler1")]
    pub filler1: String,
    #[serde(rename = "Filler2")]
    pub filler2: String,
    #[serde(rename = "Filler3")]
    pub filler3: String,
    #[serde(rename = "Filler4")]
    pub filler4: String,
    #[serde(rename = "Filler5")]
    pub filler5: String,
    #[serde(rename = "Filler6")]
    pub filler6: String,
}

/// Decoded `orderEntryParamResult`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LumpsumResponse {
    #[serde(rename = "TransactionCode")]
    pub transaction_code: String,
    #[serde(rename = "UniqueRefNo")]
    pub unique_ref_no: String,
    #[serde(rename = "OrderNumber")]
    pub order_number: i64,
    #[serde(rename = "UserId")]
    pub user_id: i64,
    #[serde(rename = "MemberId")]
    pub member_id: String,
    #[serde(rename = "ClientCode")]
    pub client_code: String,
    #[serde(rename = "BSERemarks")]
    pub bse_remarks: String,
    #[serde(rename = "SuccessFlag")]
    pub success_flag: String,
    /// Derived from `SuccessFlag` only
    pub success: bool,
    /// Raw pipe-delimited result, kept for audit
    #[serde(rename = "orderEntryParamResult")]
    pub raw_result: String,
}

/// `orderEntryParam` descriptor
#[derive(Debug, Clone, Copy)]
pub struct LumpsumOrder;

fn format_amount(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

impl OrderType for LumpsumOrder {
    type Request = LumpsumRequest;
    type Response = LumpsumResponse;

    const NAME: &'static str = "lumpsum";

    fn reference(request: &LumpsumRequest) -> &str {
        &request.trans_no
    }

    fn validate(r: &LumpsumRequest) -> Result<(), ValidationError> {
        required("TransCode", &r.trans_code)?;
        required("TransNo", &r.trans_no)?;
        if r.user_id == 0 {
            return Err(ValidationError::new("UserId", Rule::Required, "UserId is required"));
        }
        all_required(&[
            ("MemberId", &r.member_id),
            ("ClientCode", &r.client_code),
            ("SchemeCd", &r.scheme_code),
            ("BuySell", &r.buy_sell),
            ("BuySellType", &r.buy_sell_type),
            ("DPTxn", &r.dp_txn),
            ("AllRedeem", &r.all_redeem),
            ("KYCStatus", &r.kyc_status),
            ("EUIN", &r.euin),
            ("EUINFlag", &r.euin_flag),
            ("MinRedeem", &r.min_redeem),
            ("DPC", &r.dpc),
            ("Password", &r.password),
            ("PassKey", &r.pass_key),
            ("Param1", &r.param1),
            ("MobileNo", &r.mobile_no),
        ])?;

        if r.all_redeem != "Y" && r.amount.is_none() && r.quantity.is_none() {
            return Err(ValidationError::new(
                "Amount",
                Rule::AtLeastOne,
                "either Amount or Qty must be provided",
            ));
        }

        if matches!(r.trans_code.as_str(), "MOD" | "CXL") && r.order_id.unwrap_or(0) == 0 {
            return Err(ValidationError::new(
                "OrderId",
                Rule::RequiredWhen,
                format!("OrderId is required when TransCode is {}", r.trans_code),
            ));
        }

        one_of("TransCode", &r.trans_code, &["NEW", "MOD", "CXL"])?;
        one_of("BuySell", &r.buy_sell, &["P", "R"])?;
        one_of("BuySellType", &r.buy_sell_type, &["FRESH", "ADDITIONAL"])?;
        one_of("DPTxn", &r.dp_txn, &["C", "N", "P"])?;
        one_of("AllRedeem", &r.all_redeem, YES_NO)?;
        one_of("KYCStatus", &r.kyc_status, YES_NO)?;
        one_of("EUINFlag", &r.euin_flag, YES_NO)?;
        one_of("MinRedeem", &r.min_redeem, YES_NO)?;
        one_of("DPC", &r.dpc, &["Y"])?;

        max_lens(&[
            ("TransNo", &r.trans_no, 19),
            ("MemberId", &r.member_id, 20),
            ("ClientCode", &r.client_code, 20),
            ("SchemeCd", &r.scheme_code, 20),
            ("FolioNo", &r.folio_no, 20),
            ("Remarks", &r.remarks, 255),
            ("RefNo", &r.ref_no, 20),
            ("SubBrCode", &r.sub_br_code, 15),
            ("EUIN", &r.euin, 20),
            ("IPAdd", &r.ip_address, 15),
            ("Password", &r.password, 250),
            ("PassKey", &r.pass_key, 10),
            ("Param1", &r.param1, 20),
            ("Param2", &r.param2, 20),
            ("Param3", &r.param3, 20),
            ("MobileNo", &r.mobile_no, 10),
            ("EmailID", &r.email_id, 50),
            ("MandateID", &r.mandate_id, 20),
            ("Filler1", &r.filler1, 30),
            ("Filler2", &r.filler2, 30),
            ("Filler3", &r.filler3, 30),
            ("Filler4", &r.filler4, 30),
            ("Filler5", &r.filler5, 30),
            ("Filler6", &r.filler6, 30),
        ])
    }

    fn encode(r: &LumpsumRequest, endpoint: &str) -> WirePayload {
        let order_id = r.order_id.map(|id| id.to_string()).unwrap_or_default();
        let user_id = r.user_id.to_string();
        let amount = format_amount(r.amount);
        let quantity = format_amount(r.quantity);

        let body = soap::envelope(
            OPERATION,
            ACTION,
            endpoint,
            &[
                ("TransCode", &r.trans_code),
                ("TransNo", &r.trans_no),
                ("OrderId", &order_id),
                ("UserId", &user_id),
                ("MemberId", &r.member_id),
                ("ClientCode", &r.client_code),
                ("SchemeCd", &r.scheme_code),
                ("BuySell", &r.buy_sell),
                ("BuySellType", &r.buy_sell_type),
                ("DPTxn", &r.dp_txn),
                ("OrderVal", &amount),
                ("Qty", &quantity),
                ("AllRedeem", &r.all_redeem),
                ("FolioNo", &r.folio_no),
                ("Remarks", &r.remarks),
                ("KYCStatus", &r.kyc_status),
                ("RefNo", &r.ref_no),
                ("SubBrCode", &r.sub_br_code),
                ("EUIN", &r.euin),
                ("EUINFlag", &r.euin_flag),
                ("MinRedeem", &r.min_redeem),
                ("DPC", &r.dpc),
                ("IPAdd", &r.ip_address),
                ("Password", &r.password),
                ("PassKey", &r.pass_key),
                ("Param1", &r.param1),
                ("Param2", &r.param2),
                ("Param3", &r.param3),
                ("MobileNo", &r.mobile_no),
                ("EmailID", &r.email_id),
                ("MandateID", &r.mandate_id),
                ("Filler1", &r.filler1),
                ("Filler2", &r.filler2),
                ("Filler3", &r.filler3),
                ("Filler4", &r.filler4),
                ("Filler5", &r.filler5),
                ("Filler6", &r.filler6),
            ],
        );
        WirePayload::soap(body, ACTION)
    }

    fn decode(raw: &str) -> Result<LumpsumResponse, DecodeError> {
        let fields = soap::result_fields(raw, RESULT_ELEMENT, RESULT_FIELDS)?;
        let success_flag = fields[7].clone();
        Ok(LumpsumResponse {
            transaction_code: fields[0].clone(),
            unique_ref_no: fields[1].clone(),
            order_number: soap::lenient_i64(&fields[2]),
            user_id: soap::lenient_i64(&fields[3]),
            member_id: fields[4].clone(),
            client_code: fields[5].clone(),
            bse_remarks: fields[6].clone(),
            success: success_flag == "Y",
            success_flag,
            raw_result: fields.join("|"),
        })
    }

    fn is_success(response: &LumpsumResponse) -> bool {
        response.success
    }
}
