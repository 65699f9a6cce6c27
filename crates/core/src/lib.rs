pub mod colors;
pub mod errors;
pub mod format;
pub mod models;
pub mod services;
pub mod sources;
pub mod storage;

use std::path::Path;
use std::time::Duration;

use colors::ColorAssigner;
use errors::DashboardError;
use models::history::HistoryPoint;
use models::metrics::DashboardMetrics;
use models::settings::Settings;
use services::refresh_controller::{RefreshController, RefreshOutcome, RefreshStatus};
use sources::config::SourceConfig;
use sources::resolver::SourceResolver;
use sources::traits::Provenance;
use storage::settings_store::SettingsStore;

/// Color assigned to one displayed position, index-aligned with the
/// metrics rows and allocation slices.
#[derive(Debug, Clone)]
pub struct PositionColor {
    pub symbol: String,
    pub color: &'static str,
}

/// One frame's worth of render input for an external view surface:
/// derived metrics, per-position colors, and the status labels.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub metrics: DashboardMetrics,
    pub colors: Vec<PositionColor>,
    pub last_updated: Option<String>,
    pub provenance: Option<Provenance>,
}

/// Main entry point for the portfolio dashboard core.
/// Owns the refresh pipeline, the session history cache, and the
/// per-symbol color assignment; the view layer only renders what
/// [`view`](Self::view) hands it.
#[must_use]
pub struct Dashboard {
    settings: Settings,
    colors: ColorAssigner,
    controller: RefreshController,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = self.controller.status();
        f.debug_struct("Dashboard")
            .field("settings", &self.settings)
            .field("busy", &status.busy)
            .field("last_updated", &status.last_updated)
            .field("provenance", &self.controller.provenance())
            .finish()
    }
}

impl Dashboard {
    /// Build a dashboard with the standard Live → Static → Mock cascade.
    pub fn new(config: &SourceConfig, settings: Settings) -> Self {
        let resolver = SourceResolver::from_config(config);
        Self::build(resolver, settings)
    }

    /// Build a dashboard over a custom resolver (embedders and tests
    /// supply their own sources).
    pub fn with_resolver(resolver: SourceResolver, settings: Settings) -> Self {
        Self::build(resolver, settings)
    }

    /// Build a dashboard with settings loaded from disk (defaults when
    /// no settings file exists yet).
    pub fn load(config: &SourceConfig, settings_path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let settings = SettingsStore::load_from_file(settings_path)?;
        Ok(Self::new(config, settings))
    }

    /// Persist the current settings (including the privacy flag).
    pub fn save_settings(&self, path: impl AsRef<Path>) -> Result<(), DashboardError> {
        SettingsStore::save_to_file(&self.settings, path)
    }

    // ── Refresh ─────────────────────────────────────────────────────

    /// Timer-path refresh: fetch through the cascade and apply.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.controller.refresh().await
    }

    /// User-triggered refresh: kick the backend recompute first (when
    /// the live tier has such an endpoint), then fetch.
    pub async fn manual_refresh(&self) -> RefreshOutcome {
        self.controller.manual_refresh().await
    }

    /// Drive the session-wide refresh timer. Runs until dropped;
    /// embedders typically `select!` this against their UI loop.
    pub async fn run(&self) {
        self.controller.run().await;
    }

    // ── Time Window ─────────────────────────────────────────────────

    /// Change the selected trend window (`0` = all data) and get the
    /// re-windowed series. Purely local — no network effect.
    pub fn select_range(&self, range_days: u32) -> Vec<HistoryPoint> {
        self.controller.select_range(range_days)
    }

    /// The trend series for the currently selected window.
    #[must_use]
    pub fn trend_series(&self) -> Vec<HistoryPoint> {
        self.controller.trend_series()
    }

    #[must_use]
    pub fn selected_range_days(&self) -> u32 {
        self.controller.selected_range_days()
    }

    // ── Privacy ─────────────────────────────────────────────────────

    /// Flip privacy mode at runtime. Call [`save_settings`](Self::save_settings)
    /// afterwards to persist the choice across sessions.
    pub fn set_privacy_mode(&mut self, enabled: bool) {
        self.settings.privacy_mode = enabled;
        self.controller.set_privacy_mode(enabled);
    }

    #[must_use]
    pub fn privacy_mode(&self) -> bool {
        self.controller.privacy_mode()
    }

    // ── View ────────────────────────────────────────────────────────

    /// Assemble the render input for the view layer: the latest derived
    /// metrics with per-position colors (index-aligned with the rows),
    /// plus status labels. `None` until the first successful fetch.
    #[must_use]
    pub fn view(&self) -> Option<DashboardView> {
        let metrics = self.controller.metrics()?;
        let status = self.controller.status();

        let colors = metrics
            .rows
            .iter()
            .enumerate()
            .map(|(rank, row)| PositionColor {
                symbol: row.symbol.clone(),
                color: self.colors.color_for(&row.symbol, rank),
            })
            .collect();

        Some(DashboardView {
            metrics,
            colors,
            last_updated: status.last_updated,
            provenance: self.controller.provenance(),
        })
    }

    /// Current refresh status (busy indicator, labels, transient error).
    #[must_use]
    pub fn status(&self) -> RefreshStatus {
        self.controller.status()
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The color assigner shared by every surface of this dashboard.
    #[must_use]
    pub fn colors(&self) -> &ColorAssigner {
        &self.colors
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(resolver: SourceResolver, settings: Settings) -> Self {
        let colors = ColorAssigner::new(settings.color_strategy);
        let controller = RefreshController::new(
            resolver,
            Duration::from_secs(settings.refresh_interval_secs),
            settings.default_range_days,
            settings.privacy_mode,
        );

        Self {
            settings,
            colors,
            controller,
        }
    }
}
