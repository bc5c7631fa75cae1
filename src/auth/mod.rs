//! OAuth2 access for the Calendar API.
//!
//! [`Authenticator::access_token`] returns a usable bearer token, in order of
//! preference:
//!
//! 1. the cached token from the token file, when it is not about to expire;
//! 2. a refreshed token, when the cached one carries a refresh token;
//! 3. a new token from the installed-application consent flow, which prints a
//!    consent URL and waits for Google to redirect back to a loopback server.
//!
//! Whatever is obtained in 2 or 3 is written back to the token file.

mod loopback;
mod token;

use std::net::Ipv4Addr;
use std::path::Path;

use chrono::Utc;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tokio::net::TcpListener;

pub use loopback::receive_code;
pub use token::*;

use crate::config::AuthSettings;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Client secrets not found at {0}; download an OAuth client ID (desktop app) from the Google Cloud console")]
    MissingClientSecrets(String),

    #[error("Client secrets file has neither an \"installed\" nor a \"web\" section")]
    InvalidClientSecrets,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Token endpoint returned {status}: {body}")]
    TokenEndpoint { status: StatusCode, body: String },

    #[error("OAuth callback failed: {0}")]
    Callback(String),

    #[error("Authorization denied: {0}")]
    Denied(String),
}

impl AuthError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.display().to_string(),
            source,
        }
    }
}

pub struct Authenticator {
    settings: AuthSettings,
    client: Client,
}

impl Authenticator {
    pub fn new(settings: AuthSettings) -> Self {
        Self::with_client(settings, Client::new())
    }

    /// Create with an existing HTTP client.
    pub fn with_client(settings: AuthSettings, client: Client) -> Self {
        Self { settings, client }
    }

    /// Return a valid access token, refreshing or authorizing as needed.
    pub async fn access_token(&self) -> Result<String, AuthError> {
        let token_path = &self.settings.token_path;

        if let Some(mut token) = StoredToken::load(token_path).await? {
            if token.is_valid(Utc::now()) {
                tracing::debug!("Using cached token from {}", token_path.display());
                return Ok(token.token);
            }
            if token.refresh_token.is_some() {
                self.refresh(&mut token).await?;
                token.save(token_path).await?;
                tracing::info!("Refreshed access token");
                return Ok(token.token);
            }
            tracing::info!("Cached token expired and cannot be refreshed");
        }

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .map_err(|e| AuthError::Callback(format!("cannot bind loopback listener: {}", e)))?;
        let token = self.authorize_on(listener).await?;
        token.save(token_path).await?;
        tracing::info!("Stored new token in {}", token_path.display());
        Ok(token.token)
    }

    /// Exchange the refresh token for a new access token.
    pub async fn refresh(&self, token: &mut StoredToken) -> Result<(), AuthError> {
        let refresh_token = token.refresh_token.clone().unwrap_or_default();
        let response = self
            .exchange(
                &token.token_uri,
                &[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token.as_str()),
                    ("client_id", token.client_id.as_str()),
                    ("client_secret", token.client_secret.as_str()),
                ],
            )
            .await?;
        token.apply(response, Utc::now());
        Ok(())
    }

    /// Run the consent flow with the redirect pointed at `listener`.
    pub async fn authorize_on(&self, listener: TcpListener) -> Result<StoredToken, AuthError> {
        let secrets = ClientSecrets::load(&self.settings.credentials_path).await?;
        let address = listener
            .local_addr()
            .map_err(|e| AuthError::Callback(e.to_string()))?;
        let redirect_uri = format!("http://{}/", address);
        let consent_url = secrets.consent_url(&redirect_uri, &self.settings.scopes)?;

        // Prompt goes straight to stderr so it shows regardless of RUST_LOG
        eprintln!(
            "Please visit this URL to authorize this application: {}",
            consent_url
        );
        let code = receive_code(listener).await?;

        let response = self
            .exchange(
                &secrets.token_uri,
                &[
                    ("grant_type", "authorization_code"),
                    ("code", code.as_str()),
                    ("redirect_uri", redirect_uri.as_str()),
                    ("client_id", secrets.client_id.as_str()),
                    ("client_secret", secrets.client_secret.as_str()),
                ],
            )
            .await?;

        let mut token = StoredToken {
            token: String::new(),
            refresh_token: None,
            token_uri: secrets.token_uri,
            client_id: secrets.client_id,
            client_secret: secrets.client_secret,
            scopes: self.settings.scopes.clone(),
            expiry: None,
        };
        token.apply(response, Utc::now());
        Ok(token)
    }

    async fn exchange(
        &self,
        token_uri: &str,
        form: &[(&str, &str)],
    ) -> Result<TokenResponse, AuthError> {
        let response = self.client.post(token_uri).form(form).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(AuthError::TokenEndpoint { status, body })
        }
    }
}
