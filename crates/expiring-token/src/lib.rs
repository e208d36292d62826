//! Self-contained tokens that carry their own expiry.
//!
//! A token is a random 256-bit secret plus an expiration timestamp, encoded
//! as a single URL-safe string. The server keeps the issued (reference)
//! token, hands the string to a client, and later validates what the client
//! presents:
//!
//! ```
//! use expiring_token::{ExpiringToken, TokenError};
//!
//! let reference = ExpiringToken::create();
//! let link = format!("https://example.com/reset?token={}", reference);
//!
//! // ... later, the client comes back with the token ...
//! let presented = ExpiringToken::parse(link.rsplit('=').next().unwrap())?;
//! presented.validate_against(&reference)?;
//! # Ok::<(), TokenError>(())
//! ```
//!
//! # Errors
//!
//! - [`TokenError::InvalidToken`]: malformed string, or a token that does not
//!   match the reference.
//! - [`TokenError::TokenHasExpired`]: matching token whose expiry passed.
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `EXPIRING_TOKEN_LIFETIME_SECS` | Lifetime used by [`TokenConfig::from_env`] (default: 3 days) |

mod codec;
pub mod config;
pub mod error;
pub mod token;

pub use codec::SEPARATOR;
pub use config::{TokenConfig, LIFETIME_ENV};
pub use error::{TokenError, TokenResult};
pub use token::{ExpiringToken, DEFAULT_LIFETIME_SECS, SECRET_BYTES};
