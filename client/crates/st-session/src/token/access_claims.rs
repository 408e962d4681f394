use crate::{ClientError, ClientResult};

use std::time::Duration;

use base64::Engine;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};

const JWT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Claims read from the access token payload.
///
/// Decoded without signature verification. Only used to decide when to
/// refresh; the gateway remains the authority on validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl AccessClaims {
    pub fn decode(token: &str) -> ClientResult<Self> {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) if segments.next().is_none() => payload,
            _ => {
                return Err(ClientError::validation(
                    "access_token",
                    "expected three dot-separated segments",
                ));
            }
        };

        let bytes = JWT_BASE64
            .decode(payload)
            .map_err(|e| ClientError::validation("access_token", format!("bad payload: {e}")))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Seconds until expiry relative to `now` (negative once expired).
    pub fn seconds_remaining(&self, now: i64) -> i64 {
        self.exp.saturating_sub(now)
    }

    /// True when the token expires within `buffer` of `now`.
    pub fn expires_within(&self, buffer: Duration, now: i64) -> bool {
        let buffer = i64::try_from(buffer.as_secs()).unwrap_or(i64::MAX);
        self.seconds_remaining(now) <= buffer
    }
}
