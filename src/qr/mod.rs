//! QR payload classification, dispatch, and generation.

pub mod types;
pub mod decode;
pub mod parse;
pub mod resolve;
pub mod notify;
pub mod handler;
pub mod generate;

pub use decode::{classify, decode, DecodedPayload};
pub use generate::{generate_qr_svg, QrRenderError, ScanPayload};
pub use handler::{QrHandler, QrScanner};
pub use notify::{CollectingSink, NotificationSink, TracingSink};
pub use parse::parse;
pub use resolve::{resolve, Resolution};
pub use types::*;

use thiserror::Error;

/// Failures that escape scan handling. Ambiguous payloads are never errors;
/// they classify as text or unknown.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    #[error("Scanned payload is {len} bytes, the limit is {max}")]
    PayloadTooLarge { len: usize, max: usize },

    #[error("Identifier field `{field}` holds {found}, expected a string or number")]
    MalformedIdentifier { field: String, found: &'static str },
}
