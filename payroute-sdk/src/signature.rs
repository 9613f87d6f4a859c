//! Request signing for the DEX aggregator API.
//!
//! Every authenticated aggregator request carries an HMAC-SHA256 signature
//! over the pre-hash string
//!
//! ```text
//! {timestamp}{METHOD}{request_path}{?query}{body}
//! ```
//!
//! where `timestamp` is an ISO-8601 UTC instant with millisecond precision
//! (`2026-10-16T08:30:00.123Z`). The signature is base64 encoded (with
//! padding) and sent in [`SIGN_HEADER`] together with the key, passphrase,
//! timestamp and optional project headers.

use time::{OffsetDateTime, UtcOffset};

/// Header carrying the API key.
pub const ACCESS_KEY_HEADER: &str = "OK-ACCESS-KEY";

/// Header carrying the base64 HMAC signature.
pub const SIGN_HEADER: &str = "OK-ACCESS-SIGN";

/// Header carrying the timestamp that was signed.
pub const TIMESTAMP_HEADER: &str = "OK-ACCESS-TIMESTAMP";

/// Header carrying the API passphrase.
pub const PASSPHRASE_HEADER: &str = "OK-ACCESS-PASSPHRASE";

/// Header carrying the developer project id.
pub const PROJECT_HEADER: &str = "OK-ACCESS-PROJECT";

/// Errors produced by signature operations.
#[derive(Debug, thiserror::Error)]
pub enum SignatureError {
    #[error("invalid base64 encoding")]
    InvalidBase64,
    #[error("invalid signature")]
    SignatureMismatch,
}

impl From<ring::error::Unspecified> for SignatureError {
    fn from(_: ring::error::Unspecified) -> Self {
        Self::SignatureMismatch
    }
}

/// A computed request signature and the timestamp it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSignature {
    pub timestamp: String,
    pub signature: String,
}

impl RequestSignature {
    /// Sign a request at the current time.
    ///
    /// `path_and_query` is the request path including the leading `?query`
    /// part when the request has one.
    pub fn new(secret: &[u8], method: &str, path_and_query: &str, body: &str) -> Self {
        Self::at(
            OffsetDateTime::now_utc(),
            secret,
            method,
            path_and_query,
            body,
        )
    }

    /// Sign a request as of `instant`.
    pub fn at(
        instant: OffsetDateTime,
        secret: &[u8],
        method: &str,
        path_and_query: &str,
        body: &str,
    ) -> Self {
        let timestamp = format_timestamp(instant);
        let signature = sign(secret, &prehash(&timestamp, method, path_and_query, body));
        Self {
            timestamp,
            signature,
        }
    }
}

/// Build the pre-hash string. The method is upper-cased.
pub fn prehash(timestamp: &str, method: &str, path_and_query: &str, body: &str) -> String {
    format!(
        "{timestamp}{}{path_and_query}{body}",
        method.to_ascii_uppercase()
    )
}

/// `base64(HMAC-SHA256(prehash, secret))`.
pub fn sign(secret: &[u8], prehash: &str) -> String {
    let tag = ring::hmac::sign(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret),
        prehash.as_bytes(),
    );
    fast32::base64::RFC4648.encode(tag.as_ref())
}

/// Verify a base64 signature against a pre-hash string.
pub fn verify(secret: &[u8], prehash: &str, signature: &str) -> Result<(), SignatureError> {
    let signature = fast32::base64::RFC4648
        .decode_str(signature)
        .map_err(|_| SignatureError::InvalidBase64)?;
    ring::hmac::verify(
        &ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret),
        prehash.as_bytes(),
        &signature,
    )?;
    Ok(())
}

/// Format an instant as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(instant: OffsetDateTime) -> String {
    let utc = instant.to_offset(UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        utc.year(),
        u8::from(utc.month()),
        utc.day(),
        utc.hour(),
        utc.minute(),
        utc.second(),
        utc.millisecond(),
    )
}
