use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::errors::DashboardError;
use crate::models::history::HistoryPoint;
use crate::models::snapshot::PortfolioSnapshot;

use super::config::SourceConfig;
use super::http;
use super::traits::{DataSource, FetchPayload, Provenance};

const SOURCE_NAME: &str = "mock";

/// The last-resort tier: fixed demonstration documents, same dual-fetch
/// protocol as the static tier. These resources ship with the frontend
/// and are treated as always available — when even this tier fails, the
/// cascade reports the hard "no data" outcome.
pub struct MockSource {
    client: Client,
    snapshot_url: String,
    history_url: String,
}

impl MockSource {
    pub fn new(client: Client, config: &SourceConfig) -> Self {
        Self {
            client,
            snapshot_url: config.mock_snapshot_url.clone(),
            history_url: config.mock_history_url.clone(),
        }
    }
}

#[async_trait]
impl DataSource for MockSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn provenance(&self) -> Provenance {
        Provenance::Mock
    }

    async fn fetch(&self) -> Result<FetchPayload, DashboardError> {
        let (snapshot, history) = tokio::join!(
            http::get_json::<PortfolioSnapshot>(&self.client, &self.snapshot_url, SOURCE_NAME),
            http::get_json::<Vec<HistoryPoint>>(&self.client, &self.history_url, SOURCE_NAME),
        );

        let payload = FetchPayload {
            snapshot: snapshot?,
            history: history?,
        };
        debug!(
            "mock pair fetched ({} positions, {} history points)",
            payload.snapshot.positions.len(),
            payload.history.len()
        );
        Ok(payload)
    }
}
