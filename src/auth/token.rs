use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::AuthError;

pub const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed rather than used.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Authorized-user credentials cached between runs.
///
/// The layout matches the `token.json` written by Google's Python client
/// libraries, so an existing token file keeps working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    /// Current access token.
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// Read the token file. A missing file is `Ok(None)`.
    pub async fn load(path: &Path) -> Result<Option<Self>, AuthError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(AuthError::io(path, source)),
        };
        let token = serde_json::from_str(&content).map_err(|source| AuthError::json(path, source))?;
        Ok(Some(token))
    }

    pub async fn save(&self, path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| AuthError::io(parent, source))?;
        }
        let content =
            serde_json::to_string_pretty(self).map_err(|source| AuthError::json(path, source))?;
        tokio::fs::write(path, content)
            .await
            .map_err(|source| AuthError::io(path, source))
    }

    /// Usable without a refresh. A token with no recorded expiry is trusted.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        let margin = Duration::seconds(EXPIRY_MARGIN_SECS);
        !self.token.is_empty() && self.expiry.map_or(true, |expiry| expiry - margin > now)
    }

    /// Fold a token endpoint response into this token.
    pub fn apply(&mut self, response: TokenResponse, now: DateTime<Utc>) {
        self.token = response.access_token;
        self.expiry = response
            .expires_in
            .map(|secs| now + Duration::seconds(secs));
        if let Some(refresh_token) = response.refresh_token {
            self.refresh_token = Some(refresh_token);
        }
        if let Some(scope) = response.scope {
            self.scopes = scope.split_whitespace().map(str::to_string).collect();
        }
    }
}

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_string()
}

fn default_auth_uri() -> String {
    GOOGLE_AUTH_URI.to_string()
}

/// An OAuth client registered in the Google Cloud console.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<ClientSecrets>,
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Read `credentials.json` as downloaded from the console.
    pub async fn load(path: &Path) -> Result<Self, AuthError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AuthError::MissingClientSecrets(path.display().to_string()))
            }
            Err(source) => return Err(AuthError::io(path, source)),
        };
        Self::from_json(&content, path)
    }

    fn from_json(content: &str, path: &Path) -> Result<Self, AuthError> {
        let file: ClientSecretsFile =
            serde_json::from_str(content).map_err(|source| AuthError::json(path, source))?;
        file.installed
            .or(file.web)
            .ok_or(AuthError::InvalidClientSecrets)
    }

    /// The URL the user opens to grant access.
    pub fn consent_url(&self, redirect_uri: &str, scopes: &[String]) -> Result<Url, AuthError> {
        let scope = scopes.join(" ");
        Url::parse_with_params(
            &self.auth_uri,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", redirect_uri),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("prompt", "consent"),
            ],
        )
        .map_err(|e| AuthError::Callback(format!("invalid auth URI {}: {}", self.auth_uri, e)))
    }
}

/// Successful token endpoint response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}
