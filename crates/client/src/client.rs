//! Session-aware HTTP client.
//!
//! Wraps outbound calls against a fixed base URL, attaches the stored
//! access credential as a bearer token, and transparently recovers from
//! credential expiry: on a 401 it performs an at-most-one-concurrent
//! refresh exchange, replays the failed request once with the new
//! credential, and escalates to a session-expired side effect when the
//! exchange is impossible or fails.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};
use url::Url;

use crate::claims::{self, IdentityClaims};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::store::{CredentialKind, CredentialStore};

const LOGIN_PATH: &str = "token/";
const REFRESH_PATH: &str = "token/refresh/";

/// Callback invoked when the session is terminally lost (failed refresh,
/// or a 401 with no refresh credential). The UI layer subscribes to route
/// the user back to the unauthenticated entry point.
pub type SessionExpiredHandler = Arc<dyn Fn() + Send + Sync>;

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

/// Issued credentials. The refresh endpoint may or may not rotate the
/// refresh credential; only what the server returned gets stored.
#[derive(Debug, Deserialize)]
struct TokenPair {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// HTTP client bound to one API, one credential store, and one session.
pub struct ApiClient {
    http: Client,
    base_url: Url,
    store: Arc<dyn CredentialStore>,
    /// Held for the duration of a refresh exchange; queues concurrent
    /// expiries behind the in-flight exchange instead of duplicating it.
    refresh_lock: Mutex<()>,
    /// Bumped once per successful exchange. A request that observed an
    /// older generation knows the credentials were already renewed while
    /// it was in flight and skips its own exchange.
    refresh_generation: AtomicU64,
    on_session_expired: Option<SessionExpiredHandler>,
}

impl ApiClient {
    pub fn new(config: ApiConfig, store: Arc<dyn CredentialStore>) -> Result<Self, ApiError> {
        let mut base = config.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|err| ApiError::InvalidUrl(err.to_string()))?;
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;
        Ok(Self {
            http,
            base_url,
            store,
            refresh_lock: Mutex::new(()),
            refresh_generation: AtomicU64::new(0),
            on_session_expired: None,
        })
    }

    /// Register the callback fired when the session is terminally lost.
    pub fn set_session_expired_handler(&mut self, handler: impl Fn() + Send + Sync + 'static) {
        self.on_session_expired = Some(Arc::new(handler));
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ApiError::InvalidUrl(err.to_string()))
    }

    // ---- session lifecycle ----

    /// Authenticate and install a fresh session.
    ///
    /// The login call is deliberately sent outside the interception path:
    /// a 401 here means bad credentials, not an expired session.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let url = self.endpoint(LOGIN_PATH)?;
        let response = self
            .http
            .post(url)
            .json(&LoginRequest { username, password })
            .send()
            .await?;
        let response = error_for_status(response).await?;
        let pair: TokenPair = decode_json(response).await?;

        self.store.set(CredentialKind::Access, &pair.access).await;
        if let Some(refresh) = pair.refresh.as_deref() {
            self.store.set(CredentialKind::Refresh, refresh).await;
        }
        debug!(username, "session established");
        Ok(())
    }

    /// Drop both credentials. User-initiated, so the session-expired
    /// callback does not fire.
    pub async fn logout(&self) {
        self.store.clear(CredentialKind::Access).await;
        self.store.clear(CredentialKind::Refresh).await;
    }

    /// Identity claims decoded from the stored access credential.
    ///
    /// `None` when no credential is stored or its payload is unreadable;
    /// identity is always derived, never stored on its own.
    pub async fn identity(&self) -> Option<IdentityClaims> {
        let access = self.store.get(CredentialKind::Access).await?;
        claims::decode_identity(&access)
    }

    // ---- request surface ----

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send_with_refresh(Method::GET, path, None::<&()>).await?;
        decode_json(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send_with_refresh(Method::POST, path, Some(body)).await?;
        decode_json(response).await
    }

    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .send_with_refresh(Method::PATCH, path, Some(body))
            .await?;
        decode_json(response).await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send_with_refresh(Method::DELETE, path, None::<&()>)
            .await?;
        Ok(())
    }

    // ---- interception protocol ----

    /// Send a request, transparently recovering from one expired-access 401.
    async fn send_with_refresh<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.endpoint(path)?;
        // Observed before sending: if the credentials get renewed while
        // this request is in flight, the refresh coordinator sees a newer
        // generation and skips a duplicate exchange.
        let generation = self.refresh_generation.load(Ordering::Acquire);

        let response = self.send_authenticated(method.clone(), url.clone(), body).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return error_for_status(response).await;
        }

        debug!(%url, "access credential rejected, attempting silent refresh");
        self.refresh_access(generation).await?;

        // Replay exactly once with the renewed credential.
        let replayed = self.send_authenticated(method, url, body).await?;
        if replayed.status() == StatusCode::UNAUTHORIZED {
            // A second rejection means this cycle could not recover; the
            // session is gone for good.
            warn!("replayed request rejected again, ending session");
            self.expire_session().await;
            return Err(ApiError::AuthExpired);
        }
        error_for_status(replayed).await
    }

    async fn send_authenticated<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self.http.request(method, url);
        if let Some(access) = self.store.get(CredentialKind::Access).await {
            request = request.bearer_auth(access);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Exchange the refresh credential for a new access credential.
    ///
    /// Single-flight: concurrent expiries queue on the gate, and whoever
    /// acquires it after a completed exchange observes the bumped
    /// generation and reuses the freshly installed credentials instead of
    /// exchanging again.
    async fn refresh_access(&self, observed_generation: u64) -> Result<(), ApiError> {
        let _guard = self.refresh_lock.lock().await;
        if self.refresh_generation.load(Ordering::Acquire) != observed_generation {
            // Renewed while we waited; replay with what is stored now.
            return Ok(());
        }

        let Some(refresh) = self.store.get(CredentialKind::Refresh).await else {
            debug!("no refresh credential available, ending session");
            self.expire_session().await;
            return Err(ApiError::AuthExpired);
        };

        match self.exchange_refresh(&refresh).await {
            Ok(pair) => {
                self.store.set(CredentialKind::Access, &pair.access).await;
                if let Some(rotated) = pair.refresh.as_deref() {
                    self.store.set(CredentialKind::Refresh, rotated).await;
                }
                self.refresh_generation.fetch_add(1, Ordering::AcqRel);
                debug!("access credential refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "credential refresh failed, ending session");
                self.expire_session().await;
                Err(ApiError::AuthExpired)
            }
        }
    }

    /// The exchange itself is unauthenticated and never intercepted.
    async fn exchange_refresh(&self, refresh: &str) -> Result<TokenPair, ApiError> {
        let url = self.endpoint(REFRESH_PATH)?;
        let response = self
            .http
            .post(url)
            .json(&RefreshRequest { refresh })
            .send()
            .await?;
        let response = error_for_status(response).await?;
        decode_json(response).await
    }

    async fn expire_session(&self) {
        self.store.clear(CredentialKind::Access).await;
        self.store.clear(CredentialKind::Refresh).await;
        if let Some(handler) = &self.on_session_expired {
            handler();
        }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field(
                "refresh_generation",
                &self.refresh_generation.load(Ordering::Relaxed),
            )
            .finish()
    }
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Http { status, body })
}

async fn decode_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let raw = response.text().await?;
    serde_json::from_str(&raw).map_err(|err| ApiError::Parse(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryCredentialStore;

    fn client_for(base: &str) -> ApiClient {
        ApiClient::new(ApiConfig::new(base), Arc::new(MemoryCredentialStore::new()))
            .expect("client builds")
    }

    #[test]
    fn endpoint_joins_under_version_prefix() {
        let client = client_for("http://127.0.0.1:8000/api/v1");
        let url = client.endpoint("alumnos/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/v1/alumnos/");

        // A leading slash must not escape the prefix.
        let url = client.endpoint("/cursos/7/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/v1/cursos/7/");
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let result = ApiClient::new(
            ApiConfig::new("not a url"),
            Arc::new(MemoryCredentialStore::new()),
        );
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }
}
