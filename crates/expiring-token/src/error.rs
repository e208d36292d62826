//! Error types for token parsing and validation.

/// Token errors.
///
/// Every decode failure maps to the same [`TokenError::InvalidToken`] message,
/// so callers cannot tell a bad encoding from a bad timestamp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Malformed token, or a token that does not match the reference.
    #[error("{message}")]
    InvalidToken { message: String },

    /// Token matches the reference but its expiry has passed.
    #[error("the token has expired")]
    TokenHasExpired,
}

impl TokenError {
    pub(crate) fn unable_to_decode() -> Self {
        Self::InvalidToken {
            message: "unable to decode the token".to_string(),
        }
    }

    pub(crate) fn tokens_do_not_match() -> Self {
        Self::InvalidToken {
            message: "the token does not match the original token".to_string(),
        }
    }

    /// Exit code for CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidToken { .. } => 1,
            Self::TokenHasExpired => 2,
        }
    }

    /// Whether the token was rejected as malformed or mismatched.
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::InvalidToken { .. })
    }

    /// Whether the token was valid but expired. Callers can offer a retry.
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::TokenHasExpired)
    }
}

/// Result type for token operations.
pub type TokenResult<T> = Result<T, TokenError>;
