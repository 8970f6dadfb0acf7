//! OAuth authorization-code flow over a loopback redirect.
//!
//! The authenticator page is opened in the system browser with a local
//! `redirect_uri` and a random `state`. A short-lived axum listener on that
//! redirect address accepts exactly one callback carrying the matching
//! `state`, hands an [`AuthorizationCodeReceived`] to the waiting caller over
//! a oneshot channel, and shuts down.
//!
//! ```text
//!   authorize() ──open──▶ browser ──redirect──▶ CallbackListener
//!        ▲                                          │
//!        └──────── AuthorizationCodeReceived ◀──────┘ (oneshot)
//! ```

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use url::Url;

use area_core::prelude::*;
use area_core::{Authenticator, CodeExchange};

/// Redirect URI registered with the authenticators.
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8081";

/// How long to wait for the user to finish in the browser.
pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(180);

/// The event delivered by the callback listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCodeReceived {
    pub code: String,
    /// The redirect URI the code was issued for; the server needs it for the
    /// exchange.
    pub redirect_uri: String,
}

impl AuthorizationCodeReceived {
    /// Request body for exchanging this code through `authenticator`.
    pub fn into_exchange(self, authenticator: impl Into<String>) -> CodeExchange {
        CodeExchange {
            authenticator: authenticator.into(),
            code: self.code,
            redirect_uri: self.redirect_uri,
        }
    }
}

type CallbackResult = std::result::Result<AuthorizationCodeReceived, String>;

/// Random `state` value binding a callback to the request that opened it.
pub fn generate_state() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// The URL to open in the browser.
///
/// Authenticator URIs already carry their client id and scopes as a query,
/// so the redirect and state are appended.
pub fn authorization_url(authorization_uri: &str, redirect_uri: &str, state: &str) -> String {
    let separator = if authorization_uri.contains('?') { '&' } else { '?' };
    format!(
        "{authorization_uri}{separator}redirect_uri={}&state={}",
        utf8_percent_encode(redirect_uri, NON_ALPHANUMERIC),
        utf8_percent_encode(state, NON_ALPHANUMERIC),
    )
}

#[derive(Clone)]
struct CallbackState {
    expected_state: String,
    redirect_uri: String,
    sender: Arc<Mutex<Option<oneshot::Sender<CallbackResult>>>>,
}

impl CallbackState {
    fn deliver(&self, result: CallbackResult) -> bool {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match sender {
            Some(tx) => tx.send(result).is_ok(),
            None => false,
        }
    }
}

async fn handle_callback(
    State(state): State<CallbackState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if params.get("state") != Some(&state.expected_state) {
        warn!("OAuth callback rejected: state mismatch");
        return (StatusCode::BAD_REQUEST, "State mismatch").into_response();
    }

    if let Some(error) = params.get("error") {
        let description = params
            .get("error_description")
            .cloned()
            .unwrap_or_else(|| error.clone());
        state.deliver(Err(description));
        return Html(page("Authorization was denied. You can close this window.")).into_response();
    }

    let Some(code) = params.get("code").filter(|code| !code.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing code").into_response();
    };

    let delivered = state.deliver(Ok(AuthorizationCodeReceived {
        code: code.clone(),
        redirect_uri: state.redirect_uri.clone(),
    }));
    if !delivered {
        return (StatusCode::GONE, "This authorization request is already complete").into_response();
    }

    info!("OAuth callback received an authorization code");
    Html(page("Authorization complete. You can close this window.")).into_response()
}

fn page(message: &str) -> String {
    format!("<!doctype html><html><body><p>{message}</p></body></html>")
}

/// A one-shot loopback server waiting for the OAuth redirect.
pub struct CallbackListener {
    local_addr: SocketAddr,
    redirect_uri: String,
    state: String,
    code_rx: oneshot::Receiver<CallbackResult>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl CallbackListener {
    /// Bind the listener on the host and port of `redirect_uri`.
    ///
    /// Port `0` binds an ephemeral port; [`Self::redirect_uri`] then reports
    /// the actual one.
    pub async fn bind(redirect_uri: &str) -> Result<Self> {
        let mut url = Url::parse(redirect_uri).map_err(|_| Error::invalid_url(redirect_uri))?;
        let host = match url.host_str() {
            Some("localhost") | None => "127.0.0.1".to_string(),
            Some(host) => host.trim_matches(|c| c == '[' || c == ']').to_string(),
        };
        let port = url.port_or_known_default().unwrap_or(80);

        let listener = tokio::net::TcpListener::bind((host.as_str(), port))
            .await
            .map_err(|e| Error::oauth(format!("cannot listen on {redirect_uri}: {e}")))?;
        let local_addr = listener.local_addr()?;
        if port == 0 {
            url.set_port(Some(local_addr.port()))
                .map_err(|_| Error::invalid_url(redirect_uri))?;
        }

        let redirect_uri = if url.path() == "/" && !redirect_uri.ends_with('/') {
            url.as_str().trim_end_matches('/').to_string()
        } else {
            url.as_str().to_string()
        };

        let expected_state = generate_state();
        let (code_tx, code_rx) = oneshot::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let router = Router::new()
            .route(url.path(), get(handle_callback))
            .with_state(CallbackState {
                expected_state: expected_state.clone(),
                redirect_uri: redirect_uri.clone(),
                sender: Arc::new(Mutex::new(Some(code_tx))),
            });

        debug!("OAuth callback listener on {}", local_addr);
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
            {
                error!("OAuth callback listener failed: {}", e);
            }
        });

        Ok(Self {
            local_addr,
            redirect_uri,
            state: expected_state,
            code_rx,
            shutdown_tx: Some(shutdown_tx),
            handle,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// The `state` the callback must echo.
    pub fn state(&self) -> &str {
        &self.state
    }

    /// Browser URL for `authorization_uri`, pointing back at this listener.
    pub fn authorization_url(&self, authorization_uri: &str) -> String {
        authorization_url(authorization_uri, &self.redirect_uri, &self.state)
    }

    /// Wait for the callback, then stop the listener.
    pub async fn wait(mut self, timeout: Duration) -> Result<AuthorizationCodeReceived> {
        let outcome = tokio::time::timeout(timeout, &mut self.code_rx).await;
        self.shutdown();
        match outcome {
            Err(_) => Err(Error::OAuthTimeout),
            Ok(Err(_)) => Err(Error::OAuthListenerGone),
            Ok(Ok(Err(description))) => Err(Error::oauth(description)),
            Ok(Ok(Ok(received))) => Ok(received),
        }
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for CallbackListener {
    fn drop(&mut self) {
        self.shutdown();
        if !self.handle.is_finished() {
            debug!("OAuth callback listener stopping");
        }
    }
}

/// Run the whole flow for `authenticator`: listen, open the browser, wait.
///
/// Fails before opening anything when the authenticator is disabled.
pub async fn authorize(
    authenticator: &Authenticator,
    redirect_uri: &str,
    timeout: Duration,
) -> Result<AuthorizationCodeReceived> {
    authorize_with(authenticator, redirect_uri, timeout, |url| open::that(url)).await
}

/// [`authorize`] with a custom browser opener.
pub async fn authorize_with<F>(
    authenticator: &Authenticator,
    redirect_uri: &str,
    timeout: Duration,
    open_browser: F,
) -> Result<AuthorizationCodeReceived>
where
    F: FnOnce(&str) -> std::io::Result<()>,
{
    if !authenticator.enabled || authenticator.authorization_uri.is_empty() {
        return Err(Error::oauth_unavailable(&authenticator.name));
    }

    let listener = CallbackListener::bind(redirect_uri).await?;
    let url = listener.authorization_url(&authenticator.authorization_uri);
    info!("Opening {} authorization page", authenticator.name);
    open_browser(&url).map_err(|e| Error::oauth(format!("cannot open browser: {e}")))?;

    listener.wait(timeout).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use area_core::Appearance;

    fn authenticator(enabled: bool) -> Authenticator {
        Authenticator {
            name: "github".to_string(),
            enabled,
            more: Appearance::default(),
            authorization_uri: "https://github.com/login/oauth/authorize?client_id=abc".to_string(),
        }
    }

    #[test]
    fn test_authorization_url_appends_redirect_and_state() {
        let url = authorization_url(
            "https://github.com/login/oauth/authorize?client_id=abc",
            "http://localhost:8081",
            "xyz",
        );
        assert_eq!(
            url,
            "https://github.com/login/oauth/authorize?client_id=abc\
             &redirect_uri=http%3A%2F%2Flocalhost%3A8081&state=xyz"
        );

        let url = authorization_url("https://example.com/auth", "http://localhost:8081", "s");
        assert!(url.starts_with("https://example.com/auth?redirect_uri="));
    }

    #[test]
    fn test_generate_state_is_random_alphanumeric() {
        let a = generate_state();
        let b = generate_state();
        assert_eq!(a.len(), 32);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_disabled_authenticator_never_opens_browser() {
        let mut opened = false;
        let result = authorize_with(
            &authenticator(false),
            "http://127.0.0.1:0",
            Duration::from_millis(50),
            |_| {
                opened = true;
                Ok(())
            },
        )
        .await;
        assert!(matches!(result, Err(Error::OAuthUnavailable { .. })));
        assert!(!opened);
    }

    #[tokio::test]
    async fn test_listener_times_out_without_callback() {
        let listener = CallbackListener::bind("http://127.0.0.1:0").await.unwrap();
        assert_ne!(listener.local_addr().port(), 0);
        assert!(listener.redirect_uri().starts_with("http://127.0.0.1:"));
        let result = listener.wait(Duration::from_millis(20)).await;
        assert!(matches!(result, Err(Error::OAuthTimeout)));
    }
}
