use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;
use crate::models::history::HistoryPoint;
use crate::models::snapshot::PortfolioSnapshot;

/// Which tier of the fallback cascade satisfied a fetch.
///
/// Carried through to the view layer as an annotation on the
/// last-updated label; never consulted by any computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provenance {
    Live,
    Static,
    Mock,
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Live => write!(f, "Live"),
            Provenance::Static => write!(f, "Static"),
            Provenance::Mock => write!(f, "Mock"),
        }
    }
}

/// Snapshot + history delivered together by one tier.
///
/// The pairing is the point: both halves describe the same instant, so
/// they are only ever applied as a unit.
#[derive(Debug, Clone)]
pub struct FetchPayload {
    pub snapshot: PortfolioSnapshot,
    pub history: Vec<HistoryPoint>,
}

/// The resolver's output: one tier's payload plus its provenance tag.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub snapshot: PortfolioSnapshot,
    pub history: Vec<HistoryPoint>,
    pub provenance: Provenance,
}

/// Trait abstraction for one ranked data source in the fallback cascade.
///
/// Each tier (live endpoint, static documents, mock documents)
/// implements this trait. The resolver walks registered sources in rank
/// order and stops at the first success.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// The provenance tag stamped on payloads from this source.
    fn provenance(&self) -> Provenance;

    /// Fetch the snapshot and the history series.
    ///
    /// All-or-nothing: a source that can produce only one half reports
    /// failure, never a partial success — mixing a snapshot from one
    /// tier with history from another would display two unrelated
    /// points in time.
    async fn fetch(&self) -> Result<FetchPayload, DashboardError>;

    /// Ask the backing service to recompute its data before the next
    /// fetch. Returns `false` when this source has no such endpoint
    /// (static and mock documents are precomputed).
    async fn trigger_recompute(&self) -> Result<bool, DashboardError> {
        Ok(false)
    }
}
