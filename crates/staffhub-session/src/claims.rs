//! JWT claims peeked from portal-issued bearer tokens.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use staffhub_core::error::{AppError, ErrorKind};

/// Claims payload embedded in portal access tokens.
///
/// The portal's standard claims are modeled; anything else is ignored
/// during deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the username this token was issued for.
    #[serde(default)]
    pub sub: String,
    /// Expiration timestamp (seconds since epoch). Tokens without an
    /// expiration never expire locally.
    #[serde(default)]
    pub exp: Option<i64>,
    /// Issued-at timestamp (seconds since epoch).
    #[serde(default)]
    pub iat: Option<i64>,
    /// Token issuer.
    #[serde(default)]
    pub iss: Option<String>,
    /// Intended audience.
    #[serde(default)]
    pub aud: Option<String>,
    /// Authorities granted at issuance time.
    #[serde(default)]
    pub authorities: Vec<String>,
}

impl Claims {
    /// Decodes the payload segment of a token without verifying the
    /// signature.
    ///
    /// The client has no signing secret, so this is a peek, not a
    /// validation: the portal re-checks the token on every request.
    pub fn peek(token: &str) -> Result<Self, AppError> {
        let mut segments = token.split('.');
        let (Some(_header), Some(payload), Some(_signature), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(AppError::authentication(
                "Malformed token: expected three dot-separated segments",
            ));
        };

        // Tokens are unpadded base64url, but strip padding in case a
        // proxy or manual copy re-added it.
        let decoded = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Authentication,
                    "Invalid token payload encoding",
                    e,
                )
            })?;

        serde_json::from_slice(&decoded).map_err(|e| {
            AppError::with_source(ErrorKind::Authentication, "Invalid token payload JSON", e)
        })
    }

    /// Returns whether the subject claim is present and non-empty.
    pub fn has_subject(&self) -> bool {
        !self.sub.is_empty()
    }

    /// Returns the expiration as a `DateTime<Utc>`, if the token carries one.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Checks whether this token has expired.
    ///
    /// A token without an `exp` claim is treated as non-expiring.
    pub fn is_expired(&self) -> bool {
        match self.exp {
            Some(exp) => Utc::now().timestamp() >= exp,
            None => false,
        }
    }
}
