//! Counterparty error remarks and their explanations
//!
//! Shared by every order type; lookups are by the exact remark text, or by
//! numeric response code for the few codes the counterparty documents.

/// Explanation for a known remark or response code
#[must_use]
pub fn explain(key: &str) -> Option<&'static str> {
    let explanation = match key.trim() {
        "101" => "USER NOT EXISTS",
        "USER ID SHOULD NOT BE BLANK" => "Empty User ID field",
        "MEMBER ID SHOULD NOT BE BLANK" => "Empty Member ID field",
        "PASSWORD SHOULD NOT BE BLANK" => "Empty password field",
        "PASSKEY SHOULD NOT BE BLANK" => "Empty passkey field",
        "USER IS DISABLED. CONTACT ADMIN" => "User blocked or disabled",
        "YOU HAVE EXCEEDED MAXIMUM LOGIN ATTEMPTS" => "Too many wrong password attempts",
        "INVALID ACCOUNT INFORMATION" => "Incorrect login details",
        "THE MEMBER IS SUSPENDED" => "Member blocked or inactive",
        "PASSWORD EXPIRED" => "User password has expired",
        "USER NOT EXISTS" => "Invalid user credentials",
        _ => return None,
    };
    Some(explanation)
}

/// Explain a rejection, preferring the remark text over the code
#[must_use]
pub fn explain_rejection(code: &str, remark: &str) -> String {
    explain(remark)
        .or_else(|| explain(code))
        .map_or_else(|| format!("unknown error code: {code}"), str::to_string)
}
