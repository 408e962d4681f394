use crate::{ClientError, ClientResult, TokenPair, UserInfo, UserProfile};

use serde::Deserialize;

/// Body of `/auth/refresh` and `/auth/{provider}` responses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    #[serde(default = "default_success")]
    pub success: bool,
    #[serde(default)]
    pub tokens: Option<TokenPair>,
    #[serde(default)]
    pub user: Option<UserInfo>,
    #[serde(default)]
    pub profile: Option<UserProfile>,
    #[serde(default)]
    pub message: Option<String>,
}

fn default_success() -> bool {
    true
}

impl AuthResponse {
    /// Tokens of a successful response, or why there are none.
    #[track_caller]
    pub(crate) fn into_parts(self) -> ClientResult<(TokenPair, Option<UserInfo>, Option<UserProfile>)> {
        let message = self
            .message
            .unwrap_or_else(|| String::from("gateway issued no tokens"));

        match self.tokens {
            Some(tokens) if self.success && !tokens.access_token.is_empty() => {
                Ok((tokens, self.user, self.profile))
            }
            _ => Err(ClientError::authentication_failed(message)),
        }
    }
}
