//! Loopback redirect target for the consent flow.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Router,
};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;

use super::AuthError;

const GRANTED_PAGE: &str = "The authentication flow has completed. You may close this window.";
const DENIED_PAGE: &str = "Authorization was not granted. You may close this window.";

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    error: Option<String>,
}

type Outcome = Result<String, String>;

#[derive(Clone)]
struct CallbackState {
    sender: Arc<Mutex<Option<oneshot::Sender<Outcome>>>>,
}

async fn callback(
    State(state): State<CallbackState>,
    Query(params): Query<CallbackParams>,
) -> (StatusCode, &'static str) {
    let outcome = match (params.code, params.error) {
        (Some(code), _) => Ok(code),
        (None, Some(error)) => Err(error),
        (None, None) => return (StatusCode::BAD_REQUEST, "Missing authorization code"),
    };
    let reply = if outcome.is_ok() {
        (StatusCode::OK, GRANTED_PAGE)
    } else {
        (StatusCode::FORBIDDEN, DENIED_PAGE)
    };

    let sender = state
        .sender
        .lock()
        .expect("callback lock poisoned")
        .take();
    if let Some(sender) = sender {
        let _ = sender.send(outcome);
    }
    reply
}

/// Serve the redirect target on `listener` until one authorization code (or
/// error) arrives, then shut the server down.
pub async fn receive_code(listener: TcpListener) -> Result<String, AuthError> {
    let (sender, receiver) = oneshot::channel();
    let (shutdown, shutdown_signal) = oneshot::channel::<()>();

    let state = CallbackState {
        sender: Arc::new(Mutex::new(Some(sender))),
    };
    let app = Router::new()
        .route("/", get(callback))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tokio::spawn(async move {
        let served = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_signal.await;
            })
            .await;
        if let Err(e) = served {
            tracing::warn!("OAuth callback server failed: {}", e);
        }
    });

    let outcome = receiver.await;
    let _ = shutdown.send(());

    outcome
        .map_err(|_| AuthError::Callback("callback server stopped before a code arrived".into()))?
        .map_err(AuthError::Denied)
}
