//! The expiring token value type.
//!
//! A token holds an expiry instant and a random hex secret. It is verified by
//! comparing a presented token against a reference token the server kept, and
//! checking the expiry. There is no signature: the secret's entropy is the
//! only thing standing between a caller and a forged token.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, SubsecRound, TimeDelta, Utc};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec;
use crate::error::{TokenError, TokenResult};

/// Default token lifetime in seconds (3 days).
pub const DEFAULT_LIFETIME_SECS: i64 = 3 * 24 * 60 * 60;

/// Number of random bytes in a secret. Hex encoding doubles the length.
pub const SECRET_BYTES: usize = 32;

/// `0000-01-01T00:00:00Z`
const MIN_EXPIRY_SECS: i64 = -62_167_219_200;

/// `9999-12-31T23:59:59Z`
const MAX_EXPIRY_SECS: i64 = 253_402_300_799;

/// A random secret with an expiration date.
///
/// Its string form (see [`fmt::Display`]) is URL safe and can be parsed back
/// with [`ExpiringToken::parse`].
///
/// ```
/// use expiring_token::ExpiringToken;
///
/// let issued = ExpiringToken::create();
/// let presented: ExpiringToken = issued.to_string().parse().unwrap();
///
/// presented.validate_against(&issued).unwrap();
/// ```
#[derive(Clone)]
pub struct ExpiringToken {
    expires_on: DateTime<FixedOffset>,
    secret: String,
}

impl ExpiringToken {
    /// The lifetime used by [`ExpiringToken::create`].
    pub fn default_lifetime() -> TimeDelta {
        TimeDelta::seconds(DEFAULT_LIFETIME_SECS)
    }

    /// Create a token that expires in 3 days.
    pub fn create() -> Self {
        Self::create_with_lifetime(Self::default_lifetime())
    }

    /// Create a token that expires `lifetime` from now.
    ///
    /// The expiry is truncated to whole seconds so it survives the string
    /// form unchanged, and is clamped to years 0000 through 9999.
    ///
    /// # Panics
    ///
    /// Panics if the operating system's random source fails.
    pub fn create_with_lifetime(lifetime: TimeDelta) -> Self {
        let now = Utc::now().trunc_subsecs(0);
        let expires_secs = now
            .timestamp()
            .saturating_add(lifetime.num_seconds())
            .clamp(MIN_EXPIRY_SECS, MAX_EXPIRY_SECS);
        let expires_on = DateTime::from_timestamp(expires_secs, 0).unwrap_or(now);

        let mut bytes = [0_u8; SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);

        tracing::trace!(expires_on = %expires_on, "created expiring token");

        Self {
            expires_on: expires_on.fixed_offset(),
            secret: hex::encode(bytes),
        }
    }

    /// Parse a token from its string form.
    ///
    /// Any malformed input yields [`TokenError::InvalidToken`] with the same
    /// message. The secret part is not checked for length or alphabet.
    pub fn parse(encoded: &str) -> TokenResult<Self> {
        let (expires_on, secret) = codec::decode(encoded)?;
        Ok(Self { expires_on, secret })
    }

    /// When the token expires.
    pub fn expires_on(&self) -> DateTime<FixedOffset> {
        self.expires_on
    }

    /// Whether the current time is strictly after the expiry.
    pub fn has_expired(&self) -> bool {
        self.has_expired_at(Utc::now())
    }

    /// Whether `now` is strictly after the expiry.
    pub fn has_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_on.with_timezone(&Utc)
    }

    /// Validate this (presented) token against the reference token.
    ///
    /// Fails with [`TokenError::InvalidToken`] if the tokens differ, and with
    /// [`TokenError::TokenHasExpired`] if they match but the expiry passed.
    /// `Ok(())` is the only success value; a failed check is always an error,
    /// never a `false`.
    pub fn validate_against(&self, reference: &ExpiringToken) -> TokenResult<()> {
        self.validate_against_at(reference, Utc::now())
    }

    /// Like [`ExpiringToken::validate_against`], evaluated at `now`.
    pub fn validate_against_at(
        &self,
        reference: &ExpiringToken,
        now: DateTime<Utc>,
    ) -> TokenResult<()> {
        if self != reference {
            tracing::debug!("presented token does not match reference");
            return Err(TokenError::tokens_do_not_match());
        }

        if self.has_expired_at(now) {
            tracing::debug!(expires_on = %self.expires_on, "presented token has expired");
            return Err(TokenError::TokenHasExpired);
        }

        Ok(())
    }
}

/// Compare secrets without short-circuiting on the first differing byte.
fn secrets_match(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

/// Same secret and same expiry instant, regardless of offset.
impl PartialEq for ExpiringToken {
    fn eq(&self, other: &Self) -> bool {
        secrets_match(&self.secret, &other.secret) && self.expires_on == other.expires_on
    }
}

impl Eq for ExpiringToken {}

impl fmt::Debug for ExpiringToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringToken")
            .field("expires_on", &self.expires_on)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl fmt::Display for ExpiringToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::encode(&self.expires_on, &self.secret))
    }
}

impl FromStr for ExpiringToken {
    type Err = TokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ExpiringToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExpiringToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Self::parse(&encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(expires_on: &str, secret: &str) -> ExpiringToken {
        ExpiringToken {
            expires_on: DateTime::parse_from_rfc3339(expires_on).unwrap(),
            secret: secret.to_string(),
        }
    }

    #[test]
    fn test_create_secret_is_hex() {
        let t = ExpiringToken::create();
        assert_eq!(t.secret.len(), SECRET_BYTES * 2);
        assert!(t
            .secret
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_create_secrets_differ() {
        let a = ExpiringToken::create();
        let b = ExpiringToken::create();
        assert_ne!(a.secret, b.secret);
    }

    #[test]
    fn test_create_truncates_subseconds() {
        let t = ExpiringToken::create();
        assert_eq!(t.expires_on.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_create_clamps_far_future() {
        let t = ExpiringToken::create_with_lifetime(TimeDelta::seconds(i64::MAX / 1_000));
        assert_eq!(t.expires_on.timestamp(), MAX_EXPIRY_SECS);
        assert_eq!(t.to_string().len(), 128);

        let parsed = ExpiringToken::parse(&t.to_string()).unwrap();
        assert_eq!(parsed, t);
    }

    #[test]
    fn test_create_clamps_far_past() {
        let t = ExpiringToken::create_with_lifetime(TimeDelta::seconds(-i64::MAX / 1_000));
        assert_eq!(t.expires_on.timestamp(), MIN_EXPIRY_SECS);
        assert!(t.has_expired());
        assert_eq!(t.to_string().len(), 128);
    }

    #[test]
    fn test_parsed_subsecond_expiry_roundtrips() {
        let t = token("2026-10-22T08:15:00.5+00:00", "abc");
        let back = ExpiringToken::parse(&t.to_string()).unwrap();

        assert_eq!(back, t);
        assert_eq!(back.expires_on().timestamp_subsec_millis(), 500);
        assert_eq!(back.to_string(), t.to_string());
    }

    #[test]
    fn test_has_expired_boundary() {
        let t = token("2026-10-22T08:15:00+00:00", "abc");
        let expiry = t.expires_on.with_timezone(&Utc);

        assert!(!t.has_expired_at(expiry - TimeDelta::seconds(1)));
        assert!(!t.has_expired_at(expiry));
        assert!(t.has_expired_at(expiry + TimeDelta::nanoseconds(1)));
    }

    #[test]
    fn test_equality_ignores_offset() {
        let utc = token("2026-10-22T08:15:00+00:00", "abc");
        let cest = token("2026-10-22T10:15:00+02:00", "abc");
        assert_eq!(utc, cest);
    }

    #[test]
    fn test_equality_requires_same_secret_and_instant() {
        let base = token("2026-10-22T08:15:00+00:00", "abc");
        assert_ne!(base, token("2026-10-22T08:15:00+00:00", "abd"));
        assert_ne!(base, token("2026-10-22T08:15:00+00:00", "abcd"));
        assert_ne!(base, token("2026-10-22T08:15:01+00:00", "abc"));
    }

    #[test]
    fn test_validate_mismatch_checked_before_expiry() {
        let presented = token("2000-01-01T00:00:00+00:00", "abc");
        let reference = token("2000-01-01T00:00:00+00:00", "xyz");

        let err = presented.validate_against(&reference).unwrap_err();
        assert!(err.is_invalid());
        assert_eq!(err.to_string(), "the token does not match the original token");
    }

    #[test]
    fn test_validate_at() {
        let t = token("2026-10-22T08:15:00+00:00", "abc");
        let expiry = t.expires_on.with_timezone(&Utc);

        assert_eq!(t.validate_against_at(&t, expiry), Ok(()));
        assert_eq!(
            t.validate_against_at(&t, expiry + TimeDelta::seconds(1)),
            Err(TokenError::TokenHasExpired)
        );
    }

    #[test]
    fn test_debug_redacts_secret() {
        let t = token("2026-10-22T08:15:00+00:00", "supersecret");
        let debug = format!("{:?}", t);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("supersecret"));
    }

    #[test]
    fn test_secrets_match() {
        assert!(secrets_match("abc", "abc"));
        assert!(secrets_match("", ""));
        assert!(!secrets_match("abc", "abd"));
        assert!(!secrets_match("abc", "ab"));
    }
}
