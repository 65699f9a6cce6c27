use std::time::Duration;

/// Upper bound on one live-tier attempt, including body download.
pub const DEFAULT_LIVE_TIMEOUT: Duration = Duration::from_secs(8);

/// How many sequential live-tier attempts before falling through.
pub const DEFAULT_LIVE_ATTEMPTS: u32 = 2;

/// Fixed pause between live-tier attempts.
pub const DEFAULT_LIVE_BACKOFF: Duration = Duration::from_millis(500);

/// Where each tier's resources live, plus the live tier's retry policy.
///
/// The three tiers serve the identical document shapes from different
/// locations: the live endpoint computes on demand, the static pair is
/// the last published output, and the mock pair is fixed demonstration
/// data that keeps the interface renderable with no backend at all.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Live endpoint returning `{ "data": …, "history": … }` combined.
    pub live_url: String,

    /// Optional endpoint that makes the backend recompute its published
    /// data. The result only becomes visible through a subsequent fetch.
    pub recompute_url: Option<String>,

    pub static_snapshot_url: String,
    pub static_history_url: String,

    pub mock_snapshot_url: String,
    pub mock_history_url: String,

    pub live_timeout: Duration,
    pub live_attempts: u32,
    pub live_backoff: Duration,
}

impl SourceConfig {
    /// Derive the standard deployment layout from one base URL.
    pub fn for_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            live_url: format!("{base}/api/index"),
            recompute_url: Some(format!("{base}/api/refresh")),
            static_snapshot_url: format!("{base}/data.json"),
            static_history_url: format!("{base}/history.json"),
            mock_snapshot_url: format!("{base}/mock_data.json"),
            mock_history_url: format!("{base}/mock_history.json"),
            live_timeout: DEFAULT_LIVE_TIMEOUT,
            live_attempts: DEFAULT_LIVE_ATTEMPTS,
            live_backoff: DEFAULT_LIVE_BACKOFF,
        }
    }
}
