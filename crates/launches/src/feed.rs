//! Client for the external launch feed.
//!
//! The provider exposes a bulk query endpoint; we ask for every launch in a
//! single page with the rocket and payload documents expanded to the fields
//! we keep (rocket name, payload customers).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error};

/// Bulk query path on the provider
pub const LAUNCH_QUERY_PATH: &str = "/v4/launches/query";

/// Feed errors
#[derive(Debug, Error)]
pub enum FeedError {
    /// The provider answered with anything other than 200 OK
    #[error("Launch feed unavailable: provider returned {status}")]
    FeedUnavailable { status: StatusCode },

    /// The request could not be sent or the response body could not be read
    #[error("Launch feed request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not the expected shape
    #[error("Launch feed returned malformed data: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Launch record as returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedLaunch {
    pub flight_number: u32,
    pub name: String,
    pub rocket: FeedRocket,
    pub date_local: String,
    pub upcoming: bool,
    pub success: Option<bool>,
    #[serde(default)]
    pub payloads: Vec<FeedPayload>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedRocket {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPayload {
    #[serde(default)]
    pub customers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    docs: Vec<FeedLaunch>,
}

/// Source of provider-shaped launch records
#[async_trait]
pub trait LaunchFeed: Send + Sync {
    /// Fetch every launch the provider knows about.
    async fn fetch_launches(&self) -> Result<Vec<FeedLaunch>, FeedError>;
}

/// HTTP client for the SpaceX-style launch query API
#[derive(Debug, Clone)]
pub struct SpaceXClient {
    client: Client,
    base_url: String,
}

impl SpaceXClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }

    /// Body of the bulk query: empty filter, pagination off, nested selection.
    pub fn query_body() -> Value {
        json!({
            "query": {},
            "options": {
                "pagination": false,
                "populate": [
                    { "path": "rocket", "select": { "name": 1 } },
                    { "path": "payloads", "select": { "customers": 1 } }
                ]
            }
        })
    }
}

#[async_trait]
impl LaunchFeed for SpaceXClient {
    async fn fetch_launches(&self) -> Result<Vec<FeedLaunch>, FeedError> {
        let url = format!("{}{}", self.base_url, LAUNCH_QUERY_PATH);
        debug!(url = %url, "Querying launch feed");

        let response = self
            .client
            .post(&url)
            .json(&Self::query_body())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            error!(status = %status, "Problem downloading launch data");
            return Err(FeedError::FeedUnavailable { status });
        }

        let body = response.bytes().await?;
        let parsed: QueryResponse = serde_json::from_slice(&body)?;
        Ok(parsed.docs)
    }
}
