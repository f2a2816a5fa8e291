//! SOAP 1.2 envelope construction and result extraction
//!
//! The counterparty answers every order-entry operation with a single
//! `<operationResult>` element whose text is a pipe-delimited record. The
//! helpers here locate that element without a full XML parser, tolerate any
//! namespace prefix, and split the record into positional fields.

use std::borrow::Cow;

use crate::error::DecodeError;

/// Content type for SOAP 1.2 requests and responses
pub const SOAP_CONTENT_TYPE: &str = "application/soap+xml; charset=utf-8";

/// Content type for the JSON sub-APIs
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Namespace the counterparty's order-entry operations live in
pub const BSE_NAMESPACE: &str = "http://bsestarmf.in/";

const SOAP_ENVELOPE_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
const WS_ADDRESSING_NS: &str = "http://www.w3.org/2005/08/addressing";

/// Build an outbound SOAP 1.2 request envelope
///
/// `fields` are emitted as `bses:`-prefixed children of `operation` in the
/// order given. Values are interpolated as-is.
#[must_use]
pub fn envelope(operation: &str, action: &str, to: &str, fields: &[(&str, &str)]) -> String {
    let mut body = String::with_capacity(512 + fields.len() * 48);
    body.push_str("<soap:Envelope xmlns:soap=\"");
    body.push_str(SOAP_ENVELOPE_NS);
    body.push_str("\" xmlns:bses=\"");
    body.push_str(BSE_NAMESPACE);
    body.push_str("\">");
    body.push_str("<soap:Header xmlns:wsa=\"");
    body.push_str(WS_ADDRESSING_NS);
    body.push_str("\">");
    push_element(&mut body, "wsa:Action", action);
    push_element(&mut body, "wsa:To", to);
    body.push_str("</soap:Header><soap:Body><bses:");
    body.push_str(operation);
    body.push('>');
    for (name, value) in fields {
        body.push_str("<bses:");
        body.push_str(name);
        body.push('>');
        body.push_str(value);
        body.push_str("</bses:");
        body.push_str(name);
        body.push('>');
    }
    body.push_str("</bses:");
    body.push_str(operation);
    body.push_str("></soap:Body></soap:Envelope>");
    body
}

/// Build the gateway's own SOAP response carrying a single result string
#[must_use]
pub fn response_envelope(operation: &str, result: &str) -> String {
    let mut body = String::with_capacity(256 + result.len());
    body.push_str("<soap:Envelope xmlns:soap=\"");
    body.push_str(SOAP_ENVELOPE_NS);
    body.push_str("\"><soap:Body><");
    body.push_str(operation);
    body.push_str("Response xmlns=\"");
    body.push_str(BSE_NAMESPACE);
    body.push_str("\">");
    push_element(&mut body, &format!("{operation}Result"), &escape(result));
    body.push_str("</");
    body.push_str(operation);
    body.push_str("Response></soap:Body></soap:Envelope>");
    body
}

/// Build a SOAP 1.2 fault; `sender` selects `soap:Sender` over `soap:Receiver`
#[must_use]
pub fn fault(sender: bool, reason: &str) -> String {
    let code = if sender { "soap:Sender" } else { "soap:Receiver" };
    format!(
        "<soap:Envelope xmlns:soap=\"{SOAP_ENVELOPE_NS}\"><soap:Body><soap:Fault>\
         <soap:Code><soap:Value>{code}</soap:Value></soap:Code>\
         <soap:Reason><soap:Text xml:lang=\"en\">{}</soap:Text></soap:Reason>\
         </soap:Fault></soap:Body></soap:Envelope>",
        escape(reason)
    )
}

fn push_element(body: &mut String, name: &str, value: &str) {
    body.push('<');
    body.push_str(name);
    body.push('>');
    body.push_str(value);
    body.push_str("</");
    body.push_str(name);
    body.push('>');
}

/// Find the first element whose local name is `local` and return its raw
/// inner text, trimmed. Any namespace prefix is accepted. A self-closing
/// element yields an empty string.
#[must_use]
pub fn element_text<'a>(raw: &'a str, local: &str) -> Option<&'a str> {
    let mut cursor = 0;
    while let Some(offset) = raw[cursor..].find('<') {
        let start = cursor + offset + 1;
        cursor = start;
        let rest = &raw[start..];
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let qname = &rest[..name_len];
        let local_name = qname.split_once(':').map_or(qname, |(_, name)| name);
        if qname.is_empty() || local_name != local {
            continue;
        }

        let open_end = start + rest.find('>')?;
        if raw[..open_end].ends_with('/') {
            return Some("");
        }
        let content_start = open_end + 1;
        let close = format!("</{qname}");
        let mut search = content_start;
        while let Some(pos) = raw[search..].find(&close) {
            let close_start = search + pos;
            let after = close_start + close.len();
            match raw[after..].chars().next() {
                Some('>') => return Some(raw[content_start..close_start].trim()),
                Some(c) if c.is_whitespace() => {
                    return Some(raw[content_start..close_start].trim());
                }
                _ => search = after,
            }
        }
        return None;
    }
    None
}

/// Locate `element`, unescape it and split it on `|`
///
/// # Errors
///
/// Returns [`DecodeError::ElementNotFound`] when the element is missing and
/// [`DecodeError::InsufficientFields`] when fewer than `min` fields exist.
pub fn result_fields(raw: &str, element: &'static str, min: usize) -> Result<Vec<String>, DecodeError> {
    let text = element_text(raw, element).ok_or(DecodeError::ElementNotFound { element })?;
    split_fields(&unescape(text), min)
}

/// Split a pipe-delimited record into trimmed positional fields
///
/// # Errors
///
/// Returns [`DecodeError::InsufficientFields`] when fewer than `min` fields
/// are present. Extra trailing fields are kept and ignored by callers.
pub fn split_fields(text: &str, min: usize) -> Result<Vec<String>, DecodeError> {
    let fields: Vec<String> = text.split('|').map(|f| f.trim().to_string()).collect();
    if fields.len() < min {
        return Err(DecodeError::InsufficientFields {
            got: fields.len(),
            want: min,
        });
    }
    Ok(fields)
}

/// Parse an integer field, yielding 0 for empty or non-numeric input
#[must_use]
pub fn lenient_i64(field: &str) -> i64 {
    field.trim().parse().unwrap_or(0)
}

/// Replace the five predefined XML entities
#[must_use]
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&"),
    )
}

/// Escape text for inclusion in the gateway's own XML responses
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
