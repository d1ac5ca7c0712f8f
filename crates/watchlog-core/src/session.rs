//! Session manager: authentication state, persistence, and the generic
//! authenticated request wrapper.
//!
//! One `SessionManager` is constructed at application start and injected
//! into every consumer. Lifecycle:
//!
//! ```text
//! Initializing ──restore()──> Anonymous ──login()──> Authenticated
//!                                 ^                       │
//!                                 └── logout() / 401 ─────┘
//! ```
//!
//! ERROR HANDLING
//! ==============
//! `login`/`register` propagate their errors so a submission flow can fail
//! visibly. The generic `request` surfaces failures through the notifier and
//! returns `None`; consumers treat `None` as "do nothing further".

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::normalize::IdField;
use crate::notify::{LogNotifier, Notice, Notifier};
use crate::store::SessionStore;
use crate::types::{LoginRequest, LoginResponse, RegisterRequest, UserProfile};

const SESSION_EXPIRED_NOTICE: &str = "Session expired. Please log in again.";

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<UserProfile>,
    initializing: bool,
}

/// Point-in-time view of session state handed to consumers (router guard,
/// status display).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub user: Option<UserProfile>,
    pub initializing: bool,
    pub request_in_flight: bool,
}

/// Resets the advisory in-flight flag on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Relaxed);
        Self(flag)
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

/// Owner of authentication state and the only path to the remote API.
pub struct SessionManager {
    client: Client,
    base_url: String,
    id_field: IdField,
    store: SessionStore,
    notifier: Arc<dyn Notifier>,
    state: RwLock<SessionState>,
    // Advisory UI signal only; may be briefly inaccurate under overlapping
    // requests. Not a correctness gate.
    in_flight: AtomicBool,
}

impl SessionManager {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_notifier(config, Arc::new(LogNotifier))
    }

    pub fn with_notifier(config: &Config, notifier: Arc<dyn Notifier>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api.url.trim_end_matches('/').to_string(),
            id_field: config.api.id_field,
            store: SessionStore::new(&config.paths.data_dir),
            notifier,
            state: RwLock::new(SessionState {
                initializing: true,
                ..SessionState::default()
            }),
            in_flight: AtomicBool::new(false),
        })
    }

    /// Restore a persisted session. Runs at most once: the first call clears
    /// `initializing` and later calls return immediately. No network traffic.
    pub fn restore(&self) {
        let mut state = self.write_state();
        if !state.initializing {
            return;
        }

        if let Some((token, user)) = self.store.load() {
            debug!(user = %user.email, "restored persisted session");
            state.token = Some(token);
            state.user = Some(user);
        }
        state.initializing = false;
    }

    /// Authenticate against `/auth/login` and persist the session.
    ///
    /// No state changes on failure, and no automatic retry. A 401 here is
    /// bad credentials, not session expiry.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let _guard = InFlightGuard::set(&self.in_flight);

        let body = serde_json::to_value(LoginRequest { email, password })?;
        let resp = self.execute(Method::POST, "/auth/login", Some(&body)).await?;

        if !resp.status().is_success() {
            return Err(Error::Authentication(error_message(resp).await));
        }

        let mut payload: Value = resp
            .json()
            .await
            .map_err(|e| Error::Authentication(format!("malformed login response: {e}")))?;
        self.id_field.normalize(&mut payload);

        let parsed: LoginResponse = serde_json::from_value(payload)
            .map_err(|e| Error::Authentication(format!("malformed login response: {e}")))?;
        let (Some(token), Some(user)) = (parsed.token, parsed.user) else {
            return Err(Error::Authentication(
                "malformed login response: missing token or user".to_string(),
            ));
        };

        // Persist first; in-memory state only changes once both halves are
        // on disk.
        self.store.save(&token, &user)?;

        let mut state = self.write_state();
        state.token = Some(token);
        state.user = Some(user);
        Ok(())
    }

    /// Create an account via `/auth/register`. Success establishes no
    /// session; the caller sends the user on to the login flow.
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<()> {
        let _guard = InFlightGuard::set(&self.in_flight);

        let body = serde_json::to_value(RegisterRequest {
            name,
            email,
            password,
        })?;
        let resp = self
            .execute(Method::POST, "/auth/register", Some(&body))
            .await?;

        if !resp.status().is_success() {
            return Err(Error::Registration(error_message(resp).await));
        }
        Ok(())
    }

    /// Clear the session and the persisted record. Idempotent; used for both
    /// user-initiated logout and 401-triggered expiry.
    pub fn logout(&self) {
        {
            let mut state = self.write_state();
            state.token = None;
            state.user = None;
        }
        if let Err(e) = self.store.clear() {
            warn!("failed to clear persisted session: {e}");
        }
    }

    /// Generic authenticated passthrough used by every consumer.
    ///
    /// `None` uniformly means "no result, do nothing further": a 204, an
    /// expired session, or a surfaced-and-swallowed failure all land there.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Option<T> {
        let _guard = InFlightGuard::set(&self.in_flight);

        match self.dispatch(method, path, body.as_ref()).await {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    self.notifier
                        .notify(Notice::Error, &format!("Unexpected response shape: {e}"));
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                self.notifier.notify(Notice::Error, &e.to_string());
                None
            }
        }
    }

    /// Status ladder for the passthrough. 401 outranks everything else.
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        let resp = self.execute(method, path, body).await?;
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            self.notifier.notify(Notice::Warning, SESSION_EXPIRED_NOTICE);
            self.logout();
            return Ok(None);
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: error_message(resp).await,
            });
        }

        let mut value: Value = resp.json().await?;
        self.id_field.normalize(&mut value);
        Ok(Some(value))
    }

    /// Send one HTTP request with the current token attached when present.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("API request: {method} {url}");

        let mut req = self.client.request(method, &url);
        if let Some(token) = self.token() {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }

        Ok(req.send().await?)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read_state().token.is_some()
    }

    pub fn initializing(&self) -> bool {
        self.read_state().initializing
    }

    pub fn request_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Relaxed)
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read_state().user.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.read_state();
        SessionSnapshot {
            authenticated: state.token.is_some(),
            user: state.user.clone(),
            initializing: state.initializing,
            request_in_flight: self.request_in_flight(),
        }
    }

    /// Persisted store backing this session (for status display).
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    fn token(&self) -> Option<String> {
        self.read_state().token.clone()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Extract a human-readable message from a failed response body, falling
/// back to "HTTP <status>".
async fn error_message(resp: reqwest::Response) -> String {
    let fallback = format!("HTTP {}", resp.status().as_u16());
    match resp.json::<Value>().await {
        Ok(body) => body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(fallback),
        Err(_) => fallback,
    }
}
