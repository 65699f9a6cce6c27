use async_trait::async_trait;
use log::debug;
use reqwest::Client;

use crate::errors::DashboardError;
use crate::models::history::HistoryPoint;
use crate::models::snapshot::PortfolioSnapshot;

use super::config::SourceConfig;
use super::http;
use super::traits::{DataSource, FetchPayload, Provenance};

const SOURCE_NAME: &str = "static";

/// The offline/dev tier: the backend's last published snapshot and
/// history documents, served as two independently named static files.
///
/// Both documents are requested concurrently and both requests run to
/// completion; the tier succeeds only if both parse. One good half is
/// never mixed with another tier's data — the pair was computed
/// together and is only meaningful together.
pub struct StaticSource {
    client: Client,
    snapshot_url: String,
    history_url: String,
}

impl StaticSource {
    pub fn new(client: Client, config: &SourceConfig) -> Self {
        Self {
            client,
            snapshot_url: config.static_snapshot_url.clone(),
            history_url: config.static_history_url.clone(),
        }
    }
}

#[async_trait]
impl DataSource for StaticSource {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    fn provenance(&self) -> Provenance {
        Provenance::Static
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
            "static pair fetched ({} positions, {} history points)",
            payload.snapshot.positions.len(),
            payload.history.len()
        );
        Ok(payload)
    }
}
