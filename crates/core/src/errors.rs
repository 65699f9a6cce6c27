use thiserror::Error;

/// Unified error type for the entire portfolio-dashboard-core library.
/// Every fallible public function returns `Result<T, DashboardError>`.
#[derive(Debug, Error)]
pub enum DashboardError {
    // ── Data Acquisition ────────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed payload from {source_name}: {message}")]
    MalformedPayload {
        source_name: String,
        message: String,
    },

    /// Every tier in the fallback cascade failed. This is the only
    /// acquisition outcome the view layer ever sees directly.
    #[error("No data available — all source tiers failed (last: {last_error})")]
    AllTiersExhausted {
        last_error: String,
    },

    // ── Settings Storage ────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl DashboardError {
    /// `true` for the one acquisition outcome that is fatal to a refresh.
    pub fn is_no_data(&self) -> bool {
        matches!(self, DashboardError::AllTiersExhausted { .. })
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for DashboardError {
    fn from(e: std::io::Error) -> Self {
        DashboardError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(e: reqwest::Error) -> Self {
        // Strip query parameters from URLs embedded in reqwest error text;
        // cache-busting query strings are noise in a status message.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        DashboardError::Network(sanitized)
    }
}
