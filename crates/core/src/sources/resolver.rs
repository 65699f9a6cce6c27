use std::time::Duration;

use log::{debug, warn};
use reqwest::Client;

use crate::errors::DashboardError;

use super::config::SourceConfig;
use super::live::LiveSource;
use super::mock::MockSource;
use super::static_files::StaticSource;
use super::traits::{DataSource, FetchResult};

/// Client-level ceiling for the static/mock tiers, which have no
/// per-attempt timeout of their own.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// The tiered-fallback fetch cascade.
///
/// Sources are walked in registration order (rank order); the first one
/// to deliver a complete payload wins and lower tiers are never
/// contacted. Tier failures are logged and swallowed — the caller only
/// ever sees a success with provenance, or `AllTiersExhausted`.
pub struct SourceResolver {
    sources: Vec<Box<dyn DataSource>>,
}

impl SourceResolver {
    /// Create an empty resolver. Sources must be registered in rank order.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Create a resolver with the standard Live → Static → Mock cascade.
    pub fn from_config(config: &SourceConfig) -> Self {
        let client = Client::builder()
            .timeout(CLIENT_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        let mut resolver = Self::new();
        resolver.register(Box::new(LiveSource::new(client.clone(), config)));
        resolver.register(Box::new(StaticSource::new(client.clone(), config)));
        resolver.register(Box::new(MockSource::new(client, config)));
        resolver
    }

    /// Register a data source. Registration order is cascade rank.
    pub fn register(&mut self, source: Box<dyn DataSource>) {
        self.sources.push(source);
    }

    /// Walk the cascade until one tier delivers a complete payload.
    ///
    /// Never panics; the only error returned is `AllTiersExhausted`,
    /// carrying the last tier's failure text for the status line.
    pub async fn resolve(&self) -> Result<FetchResult, DashboardError> {
        let mut last_error: Option<DashboardError> = None;

        for source in &self.sources {
            match source.fetch().await {
                Ok(payload) => {
                    debug!("{} tier satisfied the fetch", source.name());
                    return Ok(FetchResult {
                        snapshot: payload.snapshot,
                        history: payload.history,
                        provenance: source.provenance(),
                    });
                }
                Err(e) => {
                    warn!("{} tier failed: {e}", source.name());
                    last_error = Some(e);
                }
            }
        }

        Err(DashboardError::AllTiersExhausted {
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no sources registered".to_string()),
        })
    }

    /// Ask the first source with a recompute endpoint to rebuild its
    /// data. Failures are tolerated — the follow-up fetch decides what
    /// the user actually sees.
    pub async fn trigger_recompute(&self) -> bool {
        for source in &self.sources {
            match source.trigger_recompute().await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => {
                    warn!("recompute trigger via {} failed: {e}", source.name());
                }
            }
        }
        false
    }
}

impl Default for SourceResolver {
    fn default() -> Self {
        Self::new()
    }
}
