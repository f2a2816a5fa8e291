//! Translation layer for the BSE StAR MF counterparty
//!
//! One [`OrderType`] descriptor per counterparty operation; the shared
//! [`OrderPipeline`] drives validation, encoding, transport and decoding.

pub mod auth;
pub mod cancellation;
pub mod elog;
pub mod error_codes;
pub mod lumpsum;
pub mod pipeline;
pub mod sip;
pub mod soap;
pub mod transport;
pub mod ucc;
pub mod validation;
pub mod xsip;

pub use auth::PasswordExchange;
pub use cancellation::{SipCancellation, XsipCancellation};
pub use elog::ElogSubmission;
pub use lumpsum::LumpsumOrder;
pub use pipeline::{OrderPipeline, OrderType};
pub use sip::SipOrder;
pub use transport::{HttpTransport, Transport, WirePayload};
pub use ucc::UccRegistration;
pub use xsip::XsipOrder;
