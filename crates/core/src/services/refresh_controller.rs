use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};

use crate::models::history::{HistoryCache, HistoryPoint};
use crate::models::metrics::DashboardMetrics;
use crate::models::snapshot::PortfolioSnapshot;
use crate::services::metrics_service::MetricsService;
use crate::sources::resolver::SourceResolver;
use crate::sources::traits::{FetchResult, Provenance};

/// Outcome of one refresh trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A fetch ran and its result was applied as one visible update.
    Applied(Provenance),
    /// Every tier failed; previously rendered state was left untouched.
    Failed,
    /// Another fetch was already in flight; this trigger was rejected.
    Rejected,
}

/// User-visible refresh status, cloned out for the view layer.
#[derive(Debug, Clone, Default)]
pub struct RefreshStatus {
    /// Busy indicator: set on entry to a fetch, cleared on every exit path.
    pub busy: bool,
    /// Last-updated label with provenance annotation, e.g.
    /// "2026-08-07 14:03:11 (Static)".
    pub last_updated: Option<String>,
    /// Transient error message after a total fetch failure.
    pub error: Option<String>,
}

/// Everything the controller mutates. Guarded by one mutex with short
/// critical sections; the lock is never held across an await point, so
/// snapshot, history, metrics and status always change as a unit
/// between suspension points.
struct ControllerState {
    cache: HistoryCache,
    selected_range_days: u32,
    privacy_mode: bool,
    latest_snapshot: Option<PortfolioSnapshot>,
    metrics: Option<DashboardMetrics>,
    provenance: Option<Provenance>,
    /// The trend series for the currently selected window.
    windowed: Vec<HistoryPoint>,
    busy: bool,
    last_updated: Option<String>,
    error: Option<String>,
}

/// Orchestrates the fetch-and-apply cycle.
///
/// Both the session-wide interval timer and the manual trigger funnel
/// into [`refresh`](Self::refresh), which holds a single in-flight
/// token: a trigger arriving while a fetch is running is rejected, so
/// two fetches can never race their applies. The time-range change path
/// ([`select_range`](Self::select_range)) bypasses fetching entirely and
/// re-windows the cached series.
pub struct RefreshController {
    resolver: SourceResolver,
    metrics_service: MetricsService,
    refresh_interval: Duration,
    in_flight: AtomicBool,
    state: Mutex<ControllerState>,
}

impl RefreshController {
    pub fn new(
        resolver: SourceResolver,
        refresh_interval: Duration,
        default_range_days: u32,
        privacy_mode: bool,
    ) -> Self {
        Self {
            resolver,
            metrics_service: MetricsService::new(),
            refresh_interval,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(ControllerState {
                cache: HistoryCache::new(),
                selected_range_days: default_range_days,
                privacy_mode,
                latest_snapshot: None,
                metrics: None,
                provenance: None,
                windowed: Vec::new(),
                busy: false,
                last_updated: None,
                error: None,
            }),
        }
    }

    // ── Fetch-and-Apply ─────────────────────────────────────────────

    /// Run one fetch through the tier cascade and apply the result.
    ///
    /// On success the snapshot, the history series, the derived metrics
    /// and the provenance-annotated label all change together. On total
    /// failure only the transient error message changes — the previous
    /// view data stays on screen. The busy indicator is cleared on every
    /// path out.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            debug!("refresh trigger rejected: a fetch is already in flight");
            return RefreshOutcome::Rejected;
        }

        self.lock().busy = true;

        let resolved = self.resolver.resolve().await;

        let outcome = {
            let mut state = self.lock();
            let outcome = match resolved {
                Ok(result) => Self::apply(&mut state, result, &self.metrics_service),
                Err(e) => {
                    warn!("refresh failed: {e}");
                    state.error = Some(e.to_string());
                    RefreshOutcome::Failed
                }
            };
            // Unconditional: the indicator clears on success and on
            // every failure path alike.
            state.busy = false;
            outcome
        };

        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    /// Manual trigger. Tolerates the two-step backend protocol: ask the
    /// backend to recompute, and only after that call completes run the
    /// normal fetch — the trigger response itself carries no data.
    pub async fn manual_refresh(&self) -> RefreshOutcome {
        if self.resolver.trigger_recompute().await {
            debug!("backend recompute acknowledged, re-fetching");
        }
        self.refresh().await
    }

    /// The session-wide refresh timer. Started once by the embedder;
    /// manual triggers never reset it. The first tick fires immediately,
    /// giving the initial load. Overlaps with a manual trigger resolve
    /// through the in-flight token like any other trigger.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.refresh_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }

    fn apply(
        state: &mut ControllerState,
        result: FetchResult,
        metrics_service: &MetricsService,
    ) -> RefreshOutcome {
        let FetchResult {
            snapshot,
            history,
            provenance,
        } = result;

        state.cache.store(history);
        state.windowed = state.cache.filter(state.selected_range_days);
        state.metrics = Some(metrics_service.compute(&snapshot, state.privacy_mode));

        let stamp = snapshot
            .updated_at
            .clone()
            .unwrap_or_else(Self::client_stamp);
        state.last_updated = Some(format!("{stamp} ({provenance})"));
        state.provenance = Some(provenance);
        state.latest_snapshot = Some(snapshot);
        state.error = None;

        RefreshOutcome::Applied(provenance)
    }

    /// Fallback label when the source document carries no timestamp.
    fn client_stamp() -> String {
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    // ── Time Window ─────────────────────────────────────────────────

    /// Change the selected trend window and return the re-windowed
    /// series. Operates solely on the cached history — never fetches.
    pub fn select_range(&self, range_days: u32) -> Vec<HistoryPoint> {
        let mut state = self.lock();
        state.selected_range_days = range_days;
        state.windowed = state.cache.filter(range_days);
        state.windowed.clone()
    }

    /// The trend series for the currently selected window.
    pub fn trend_series(&self) -> Vec<HistoryPoint> {
        self.lock().windowed.clone()
    }

    pub fn selected_range_days(&self) -> u32 {
        self.lock().selected_range_days
    }

    // ── Privacy ─────────────────────────────────────────────────────

    /// Flip privacy mode and re-derive the metrics from the retained
    /// snapshot, so redaction applies without a network round trip.
    pub fn set_privacy_mode(&self, enabled: bool) {
        let mut state = self.lock();
        state.privacy_mode = enabled;
        let recomputed = state
            .latest_snapshot
            .as_ref()
            .map(|snapshot| self.metrics_service.compute(snapshot, enabled));
        if recomputed.is_some() {
            state.metrics = recomputed;
        }
    }

    pub fn privacy_mode(&self) -> bool {
        self.lock().privacy_mode
    }

    // ── View Accessors ──────────────────────────────────────────────

    /// The most recently derived metrics, if any fetch has succeeded yet.
    pub fn metrics(&self) -> Option<DashboardMetrics> {
        self.lock().metrics.clone()
    }

    pub fn provenance(&self) -> Option<Provenance> {
        self.lock().provenance
    }

    pub fn status(&self) -> RefreshStatus {
        let state = self.lock();
        RefreshStatus {
            busy: state.busy,
            last_updated: state.last_updated.clone(),
            error: state.error.clone(),
        }
    }

    /// `true` while a fetch is between its trigger and its apply.
    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}
