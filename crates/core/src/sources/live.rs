use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::errors::DashboardError;
use crate::models::history::HistoryPoint;
use crate::models::snapshot::PortfolioSnapshot;

use super::config::SourceConfig;
use super::http;
use super::traits::{DataSource, FetchPayload, Provenance};

const SOURCE_NAME: &str = "live";

/// Combined live document: the backend serves the snapshot and the
/// history series in one response so both always describe the same
/// instant. Either half may be missing when the backend is degraded;
/// that makes the whole response unusable.
#[derive(Deserialize)]
struct LiveDocument {
    #[serde(default)]
    data: Option<PortfolioSnapshot>,
    #[serde(default)]
    history: Option<Vec<HistoryPoint>>,
}

/// The preferred tier: an on-demand endpoint with fresh data.
///
/// Attempts are sequential — never concurrent — to avoid duplicate load
/// on a possibly cold backend. Each attempt runs under its own
/// `tokio::time::timeout`; expiry drops the in-flight request and counts
/// as a failed attempt, after which a fixed backoff pause precedes the
/// next try. A reachable but semantically incomplete response ends the
/// tier immediately: the feed will answer the same way on a retry.
pub struct LiveSource {
    client: Client,
    url: String,
    recompute_url: Option<String>,
    timeout: Duration,
    attempts: u32,
    backoff: Duration,
}

impl LiveSource {
    pub fn new(client: Client, config: &SourceConfig) -> Self {
        Self {
            client,
            url: config.live_url.clone(),
            recompute_url: config.recompute_url.clone(),
            timeout: config.live_timeout,
            attempts: config.live_attempts,
            backoff: config.live_backoff,
        }
    }

    async fn attempt(&self) -> Result<FetchPayload, DashboardError> {
        let document: LiveDocument =
            http::get_json(&self.client, &self.url, SOURCE_NAME).await?;

        match (document.data, document.history) {
            (Some(snapshot), Some(history)) => Ok(FetchPayload { snapshot, history }),
            (None, _) => Err(DashboardError::MalformedPayload {
                source_name: SOURCE_NAME.to_string(),
                message: "response is missing the snapshot document".to_string(),
            }),
            (_, None) => Err(DashboardError::MalformedPayload {
                source_name: SOURCE_NAME.to_string(),
                message: "response is missing the history series".to_string(),
            }),
        }
    }
}

#[async_trait]
impl DataSource for LiveSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn provenance(&self) -> Provenance {
        Provenance::Live
    }

    async fn fetch(&self) -> Result<FetchPayload, DashboardError> {
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match tokio::time::timeout(self.timeout, self.attempt()).await {
                Ok(Ok(payload)) => {
                    debug!(
                        "live fetch succeeded on attempt {attempt}/{} ({} positions, {} history points)",
                        self.attempts,
                        payload.snapshot.positions.len(),
                        payload.history.len()
                    );
                    return Ok(payload);
                }
                Ok(Err(e @ DashboardError::MalformedPayload { .. })) => {
                    // Incomplete feeds don't fix themselves between attempts.
                    return Err(e);
                }
                Ok(Err(e)) => {
                    warn!("live fetch attempt {attempt}/{} failed: {e}", self.attempts);
                    last_error = Some(e);
                }
                Err(_elapsed) => {
                    warn!(
                        "live fetch attempt {attempt}/{} timed out after {:?}",
                        self.attempts, self.timeout
                    );
                    last_error = Some(DashboardError::Network(format!(
                        "request timed out after {:?}",
                        self.timeout
                    )));
                }
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.backoff).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| DashboardError::Network("live tier has zero attempts configured".to_string())))
    }

    async fn trigger_recompute(&self) -> Result<bool, DashboardError> {
        let url = match &self.recompute_url {
            Some(url) => url,
            None => return Ok(false),
        };

        debug!("triggering backend recompute at {url}");
        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| {
                DashboardError::Network(format!(
                    "recompute trigger timed out after {:?}",
                    self.timeout
                ))
            })??;
        response.error_for_status()?;
        Ok(true)
    }
}
