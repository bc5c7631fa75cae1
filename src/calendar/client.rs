//! HTTP client for the Google Calendar v3 API.

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::{Calendar, CalendarPublisher, Event, NewCalendar, NewEvent};

/// Calendar API errors.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: access token missing, expired or revoked")]
    Unauthorized,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
}

/// Calendar v3 client authenticated with a bearer access token.
#[derive(Debug, Clone)]
pub struct GoogleCalendar {
    base_url: String,
    access_token: String,
    client: Client,
}

impl GoogleCalendar {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, access_token)
    }

    /// Create with an existing HTTP client.
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            access_token: access_token.into(),
            client,
        }
    }

    /// Base URL plus path segments, each percent-encoded.
    fn url(&self, segments: &[&str]) -> Result<Url, CalendarError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| CalendarError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| CalendarError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Build an authenticated request.
    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .bearer_auth(&self.access_token)
    }

    /// Handle response, converting HTTP errors to CalendarError.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, CalendarError> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            match status {
                StatusCode::NOT_FOUND => Err(CalendarError::NotFound(body)),
                StatusCode::BAD_REQUEST => Err(CalendarError::BadRequest(body)),
                StatusCode::UNAUTHORIZED => Err(CalendarError::Unauthorized),
                _ => Err(CalendarError::Server(format!("{}: {}", status, body))),
            }
        }
    }
}

#[async_trait]
impl CalendarPublisher for GoogleCalendar {
    async fn create_calendar(
        &self,
        name: &str,
        time_zone: &str,
    ) -> Result<Calendar, CalendarError> {
        let body = NewCalendar {
            summary: name.to_string(),
            time_zone: time_zone.to_string(),
        };
        let response = self
            .request(reqwest::Method::POST, self.url(&["calendars"])?)
            .json(&body)
            .send()
            .await?;
        self.handle_response(response).await
    }

    async fn insert_event(
        &self,
        calendar_id: &str,
        event: &NewEvent,
    ) -> Result<Event, CalendarError> {
        let url = self.url(&["calendars", calendar_id, "events"])?;
        let response = self
            .request(reqwest::Method::POST, url)
            .json(event)
            .send()
            .await?;
        self.handle_response(response).await
    }
}
