//! Schedule page retrieval.

use std::path::Path;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::ScheduleSource;

const USER_AGENT: &str = concat!("launch-calendar/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure to obtain the schedule document. Always fatal to the run.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Status { url: String, status: StatusCode },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Schedule document is empty: {0}")]
    EmptyDocument(String),
}

/// Downloads the schedule page.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client })
    }

    /// Create with an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// GET the page and return its body.
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!("Fetching launch schedule from {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        non_empty(body, url)
    }

    /// Load the document from wherever `source` points.
    pub async fn load(&self, source: &ScheduleSource) -> Result<String, FetchError> {
        match source {
            ScheduleSource::Url(url) => self.fetch(url).await,
            ScheduleSource::File(path) => read_file(path).await,
        }
    }
}

async fn read_file(path: &Path) -> Result<String, FetchError> {
    let origin = path.display().to_string();
    tracing::info!("Reading launch schedule from {}", origin);
    let body = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FetchError::Io {
            path: origin.clone(),
            source,
        })?;
    non_empty(body, &origin)
}

fn non_empty(body: String, origin: &str) -> Result<String, FetchError> {
    if body.trim().is_empty() {
        Err(FetchError::EmptyDocument(origin.to_string()))
    } else {
        Ok(body)
    }
}
