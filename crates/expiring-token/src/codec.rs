//! Wire format for tokens.
//!
//! ```text
//! base64( <rfc3339 expiry with offset> "_token:" <64 hex chars> )
//! ```
//!
//! Created tokens never need URL escaping. Their expiry has whole seconds, so
//! the payload is 25 + 7 + 64 = 96 bytes, a multiple of 3, and no `=` padding
//! is emitted. Every payload byte is ASCII from `[0-9a-z:+\-.T_]`, whose low
//! six bits stay below 62, so the encoder never emits `+` or `/` either.
//!
//! A parsed expiry with fractional seconds keeps them (3, 6 or 9 digits) when
//! encoded again. The payload length then varies, so trailing `=` is never
//! written and the decoder does not require it.

use base64::engine::general_purpose::{
    GeneralPurpose, GeneralPurposeConfig, STANDARD_NO_PAD,
};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine};
use chrono::{DateTime, FixedOffset, SecondsFormat};

use crate::error::{TokenError, TokenResult};

/// Separator between the expiry and the secret.
pub const SEPARATOR: &str = "_token:";

/// Standard alphabet, accepting input with or without trailing `=`.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Format an expiry as `YYYY-MM-DDTHH:MM:SS[.fff]+HH:MM`. The fraction is
/// omitted when it is zero.
pub(crate) fn format_expiry(expires_on: &DateTime<FixedOffset>) -> String {
    expires_on.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

pub(crate) fn encode(expires_on: &DateTime<FixedOffset>, secret: &str) -> String {
    let payload = format!("{}{}{}", format_expiry(expires_on), SEPARATOR, secret);
    STANDARD_NO_PAD.encode(payload)
}

pub(crate) fn decode(encoded: &str) -> TokenResult<(DateTime<FixedOffset>, String)> {
    let decoded = LENIENT_BASE64.decode(encoded).map_err(|e| {
        tracing::debug!(error = %e, "token is not valid base64");
        TokenError::unable_to_decode()
    })?;

    if decoded.is_empty() {
        tracing::debug!("token is empty");
        return Err(TokenError::unable_to_decode());
    }

    let decoded = String::from_utf8(decoded).map_err(|e| {
        tracing::debug!(error = %e, "token payload is not utf-8");
        TokenError::unable_to_decode()
    })?;

    let Some((expiry, secret)) = decoded.split_once(SEPARATOR) else {
        tracing::debug!("token payload has no separator");
        return Err(TokenError::unable_to_decode());
    };

    let expires_on = DateTime::parse_from_rfc3339(expiry).map_err(|e| {
        tracing::debug!(error = %e, "token expiry is not a valid timestamp");
        TokenError::unable_to_decode()
    })?;

    Ok((expires_on, secret.to_string()))
}
