use crate::session::auth_response::AuthResponse;
use crate::token::TokenStore;
use crate::{
    AccessClaims, ApiClient, AuthProvider, ClientError, ClientResult, KeyValueStore, TokenPair,
    UserInfo, UserProfile,
};

use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, Shared};
use log::{debug, info, warn};
use reqwest::Method;
use serde_json::{Value, json};
use tokio::sync::Mutex;

const REFRESH_ENDPOINT: &str = "/auth/refresh";
const REVOKE_ENDPOINT: &str = "/auth/revoke";
const UNAUTHORIZED: u16 = 401;

type RefreshOutcome = Result<Option<UserProfile>, Arc<ClientError>>;
type RefreshFuture = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Owns the stored token pair and every authenticated gateway call.
///
/// Cheap to clone; clones share the same refresh slot, so at most one
/// refresh is ever in flight per manager.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    api: ApiClient,
    tokens: TokenStore,
    refresh_buffer: Duration,
    in_flight: Mutex<Option<RefreshFuture>>,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: Arc<dyn KeyValueStore>, refresh_buffer: Duration) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                api,
                tokens: TokenStore::new(store),
                refresh_buffer,
                in_flight: Mutex::new(None),
            }),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Local probe: true when a token pair is stored. Never touches the network.
    pub async fn is_authenticated(&self) -> bool {
        matches!(self.inner.tokens.load().await, Ok(Some(_)))
    }

    /// Decoded claims of the stored access token (unverified).
    pub async fn current_claims(&self) -> ClientResult<Option<AccessClaims>> {
        match self.inner.tokens.load().await? {
            Some(pair) => AccessClaims::decode(&pair.access_token).map(Some),
            None => Ok(None),
        }
    }

    /// Install credentials obtained outside this client.
    pub async fn store_tokens(&self, pair: &TokenPair) -> ClientResult<()> {
        self.inner.tokens.save(pair).await
    }

    /// Access token that stays valid for at least the refresh buffer.
    ///
    /// `Ok(None)` means login is required: nothing is stored, or the refresh
    /// was rejected and local state has been cleared. Transient refresh
    /// failures are returned as errors with the stored pair left intact.
    pub async fn ensure_valid_token(&self) -> ClientResult<Option<String>> {
        let Some(pair) = self.inner.tokens.load().await? else {
            return Ok(None);
        };

        if !self.inner.needs_refresh(&pair.access_token) {
            return Ok(Some(pair.access_token));
        }

        match self.refresh_once(Some(pair.access_token.as_str())).await {
            Ok(_) => Ok(self
                .inner
                .tokens
                .load()
                .await?
                .map(|pair| pair.access_token)),
            Err(e) if e.is_credential_failure() => {
                debug!("Login required: {e}");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Exchange the refresh token for a new pair.
    ///
    /// Joins a refresh already in flight instead of starting another. Returns
    /// the profile the gateway piggybacked on the response, if any.
    pub async fn perform_token_refresh(&self) -> ClientResult<Option<UserProfile>> {
        self.refresh_once(None).await
    }

    /// Authenticated call with one forced refresh and retry on 401.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> ClientResult<Value> {
        let Some(token) = self.ensure_valid_token().await? else {
            return Err(ClientError::not_authenticated("login required"));
        };

        match self
            .inner
            .api
            .send(method.clone(), endpoint, body, Some(&token))
            .await
        {
            Err(e) if e.status() == Some(UNAUTHORIZED) => {
                info!("{endpoint} rejected the access token, refreshing once");
            }
            other => return other,
        }

        self.refresh_once(Some(token.as_str())).await?;

        let Some(pair) = self.inner.tokens.load().await? else {
            return Err(ClientError::not_authenticated("credentials removed during refresh"));
        };

        match self
            .inner
            .api
            .send(method, endpoint, body, Some(&pair.access_token))
            .await
        {
            Err(e) if e.status() == Some(UNAUTHORIZED) => {
                self.inner.clear_auth_state().await;
                Err(ClientError::authentication_failed(format!(
                    "{endpoint} still unauthorized after refresh"
                )))
            }
            other => other,
        }
    }

    /// Sign in with a provider ID token and store the issued pair.
    pub async fn sign_in(&self, provider: AuthProvider, id_token: &str) -> ClientResult<UserInfo> {
        let body = json!({ "idToken": id_token });
        let value = self
            .inner
            .api
            .send(Method::POST, provider.sign_in_endpoint(), Some(&body), None)
            .await?;

        let response: AuthResponse = serde_json::from_value(value)?;
        let (tokens, user, _) = response.into_parts()?;
        let user = user.ok_or_else(|| {
            ClientError::authentication_failed("sign-in response carried no user")
        })?;

        self.inner.tokens.save(&tokens).await?;
        info!("Signed in with {provider} as {}", user.id);
        Ok(user)
    }

    /// Best-effort revoke, then clear local state unconditionally.
    pub async fn sign_out(&self) -> ClientResult<()> {
        if let Ok(Some(pair)) = self.inner.tokens.load().await
            && pair.has_refresh_token()
        {
            let body = json!({ "refreshToken": pair.refresh_token });
            if let Err(e) = self
                .inner
                .api
                .send(Method::POST, REVOKE_ENDPOINT, Some(&body), None)
                .await
            {
                warn!("Token revoke failed, clearing locally anyway: {e}");
            }
        }

        self.inner.tokens.clear().await?;
        info!("Signed out");
        Ok(())
    }

    /// Run or join the single in-flight refresh.
    ///
    /// With `stale_access`, the refresh is skipped when the stored access
    /// token no longer matches it: someone else already rotated the pair.
    async fn refresh_once(&self, stale_access: Option<&str>) -> ClientResult<Option<UserProfile>> {
        let refresh = {
            let mut slot = self.inner.in_flight.lock().await;

            match slot.as_ref() {
                Some(running) => {
                    debug!("Joining token refresh already in flight");
                    running.clone()
                }
                None => {
                    if let Some(stale) = stale_access {
                        match self.inner.tokens.load().await? {
                            Some(pair) if pair.access_token != stale => return Ok(None),
                            Some(_) => {}
                            None => {
                                return Err(ClientError::not_authenticated(
                                    "no stored credentials",
                                ));
                            }
                        }
                    }

                    let inner = Arc::clone(&self.inner);
                    let refresh = async move {
                        let outcome = inner.refresh_tokens().await.map_err(Arc::new);
                        *inner.in_flight.lock().await = None;
                        outcome
                    }
                    .boxed()
                    .shared();

                    *slot = Some(refresh.clone());
                    refresh
                }
            }
        };

        refresh.await.map_err(ClientError::from)
    }
}

impl SessionInner {
    fn needs_refresh(&self, access_token: &str) -> bool {
        match AccessClaims::decode(access_token) {
            Ok(claims) => claims.expires_within(self.refresh_buffer, chrono::Utc::now().timestamp()),
            Err(e) => {
                debug!("Access token unreadable, treating as expiring: {e}");
                true
            }
        }
    }

    async fn refresh_tokens(&self) -> ClientResult<Option<UserProfile>> {
        let pair = match self.tokens.load().await? {
            Some(pair) if pair.has_refresh_token() => pair,
            _ => {
                self.clear_auth_state().await;
                return Err(ClientError::not_authenticated("no refresh token stored"));
            }
        };

        let body = json!({ "refreshToken": pair.refresh_token });
        let value = match self
            .api
            .send(Method::POST, REFRESH_ENDPOINT, Some(&body), None)
            .await
        {
            Ok(value) => value,
            Err(e) if e.status().is_some() && !e.is_transient() => {
                self.clear_auth_state().await;
                return Err(ClientError::authentication_failed(format!(
                    "refresh rejected: {e}"
                )));
            }
            Err(e) => {
                warn!("Token refresh failed, keeping stored credentials: {e}");
                return Err(e);
            }
        };

        let response: AuthResponse = serde_json::from_value(value)?;
        let (tokens, _, profile) = match response.into_parts() {
            Ok(parts) => parts,
            Err(e) => {
                self.clear_auth_state().await;
                return Err(e);
            }
        };

        self.tokens.save(&tokens).await?;
        info!("Access token refreshed");
        Ok(profile)
    }

    async fn clear_auth_state(&self) {
        if let Err(e) = self.tokens.clear().await {
            warn!("Failed to clear stored credentials: {e}");
        }
    }
}
