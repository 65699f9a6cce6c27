// ═══════════════════════════════════════════════════════════════════
// RefreshController Tests — in-flight token, status lifecycle,
// single-visible-update apply, window selection
// ═══════════════════════════════════════════════════════════════════

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use portfolio_dashboard_core::errors::DashboardError;
use portfolio_dashboard_core::models::history::HistoryPoint;
use portfolio_dashboard_core::models::snapshot::{
    PortfolioSnapshot, PortfolioTotals, Position,
};
use portfolio_dashboard_core::services::refresh_controller::{
    RefreshController, RefreshOutcome,
};
use portfolio_dashboard_core::sources::resolver::SourceResolver;
use portfolio_dashboard_core::sources::traits::{DataSource, FetchPayload, Provenance};

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn make_date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn snapshot(updated_at: Option<&str>) -> PortfolioSnapshot {
    PortfolioSnapshot {
        updated_at: updated_at.map(str::to_string),
        totals: PortfolioTotals {
            total_value: 1000.0,
            cash: 100.0,
            day_pnl: Some(10.0),
            day_pnl_pct: Some(1.0),
            total_pnl_val: Some(50.0),
            total_pnl_pct: Some(5.0),
        },
        positions: vec![
            Position::new("TSLA", 2.0, 350.0, 700.0),
            Position::new("QQQ", 1.0, 300.0, 300.0),
        ],
    }
}

fn history() -> Vec<HistoryPoint> {
    vec![
        HistoryPoint {
            date: make_date(2026, 8, 5),
            value: 950.0,
        },
        HistoryPoint {
            date: make_date(2026, 8, 6),
            value: 975.0,
        },
        HistoryPoint {
            date: make_date(2026, 8, 7),
            value: 1000.0,
        },
    ]
}

/// Succeeds, optionally after a pause; counts fetches and recomputes.
struct ScriptedSource {
    provenance: Provenance,
    updated_at: Option<&'static str>,
    delay: Duration,
    /// Calls 1..=fail_first return errors, later calls succeed.
    fail_first: usize,
    fetches: Arc<AtomicUsize>,
    recomputes: Arc<AtomicUsize>,
}

impl ScriptedSource {
    fn succeeding(provenance: Provenance) -> Self {
        Self {
            provenance,
            updated_at: Some("2026-08-07 12:00:00"),
            delay: Duration::ZERO,
            fail_first: 0,
            fetches: Arc::new(AtomicUsize::new(0)),
            recomputes: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn fetch_counter(&self) -> Arc<AtomicUsize> {
        self.fetches.clone()
    }

    fn recompute_counter(&self) -> Arc<AtomicUsize> {
        self.recomputes.clone()
    }
}

#[async_trait]
impl DataSource for ScriptedSource {
    fn name(&self) -> &str {
        "scripted"
    }

    fn provenance(&self) -> Provenance {
        self.provenance
    }

    async fn fetch(&self) -> Result<FetchPayload, DashboardError> {
        let call = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if call <= self.fail_first {
            return Err(DashboardError::Network("scripted failure".to_string()));
        }
        Ok(FetchPayload {
            snapshot: snapshot(self.updated_at),
            history: history(),
        })
    }

    async fn trigger_recompute(&self) -> Result<bool, DashboardError> {
        self.recomputes.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

fn controller_with(source: ScriptedSource) -> RefreshController {
    let mut resolver = SourceResolver::new();
    resolver.register(Box::new(source));
    RefreshController::new(resolver, Duration::from_secs(60), 0, false)
}

// ═══════════════════════════════════════════════════════════════════
// Fetch-and-Apply
// ═══════════════════════════════════════════════════════════════════

mod fetch_and_apply {
    use super::*;

    #[tokio::test]
    async fn success_applies_everything_together() {
        let controller = controller_with(ScriptedSource::succeeding(Provenance::Live));

        let outcome = controller.refresh().await;
        assert_eq!(outcome, RefreshOutcome::Applied(Provenance::Live));

        let metrics = controller.metrics().expect("metrics after success");
        assert_eq!(metrics.rows.len(), 2);
        assert_eq!(controller.trend_series().len(), 3);
        assert_eq!(controller.provenance(), Some(Provenance::Live));

        let status = controller.status();
        assert!(!status.busy);
        assert!(status.error.is_none());
    }

    #[tokio::test]
    async fn last_updated_label_carries_provenance() {
        let controller = controller_with(ScriptedSource::succeeding(Provenance::Static));
        controller.refresh().await;

        let label = controller.status().last_updated.expect("label after success");
        assert_eq!(label, "2026-08-07 12:00:00 (Static)");
    }

    #[tokio::test]
    async fn missing_source_timestamp_gets_a_client_stamp() {
        let mut source = ScriptedSource::succeeding(Provenance::Live);
        source.updated_at = None;
        let controller = controller_with(source);
        controller.refresh().await;

        let label = controller.status().last_updated.expect("label after success");
        assert!(label.ends_with("(Live)"), "got: {label}");
        // Something date-like precedes the annotation.
        assert!(label.len() > "(Live)".len() + 4);
    }

    #[tokio::test]
    async fn total_failure_sets_error_and_keeps_nothing_else() {
        let mut source = ScriptedSource::succeeding(Provenance::Live);
        source.fail_first = usize::MAX;
        let controller = controller_with(source);

        let outcome = controller.refresh().await;
        assert_eq!(outcome, RefreshOutcome::Failed);

        let status = controller.status();
        assert!(!status.busy, "busy indicator must clear on failure too");
        assert!(status.error.is_some());
        assert!(controller.metrics().is_none());
        assert!(controller.status().last_updated.is_none());
    }

    /// Succeeds on its first call, then the backend "goes away".
    struct SucceedOnce {
        fetches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl DataSource for SucceedOnce {
        fn name(&self) -> &str {
            "succeed-once"
        }

        fn provenance(&self) -> Provenance {
            Provenance::Live
        }

        async fn fetch(&self) -> Result<FetchPayload, DashboardError> {
            let call = self.fetches.fetch_add(1, Ordering::SeqCst) + 1;
            if call == 1 {
                Ok(FetchPayload {
                    snapshot: snapshot(Some("2026-08-07 12:00:00")),
                    history: history(),
                })
            } else {
                Err(DashboardError::Network("backend went away".to_string()))
            }
        }
    }

    #[tokio::test]
    async fn failure_after_success_preserves_previous_view_state() {
        let mut resolver = SourceResolver::new();
        resolver.register(Box::new(SucceedOnce {
            fetches: Arc::new(AtomicUsize::new(0)),
        }));
        let controller = RefreshController::new(resolver, Duration::from_secs(60), 0, false);

        assert_eq!(
            controller.refresh().await,
            RefreshOutcome::Applied(Provenance::Live)
        );
        let before = controller.status().last_updated;

        assert_eq!(controller.refresh().await, RefreshOutcome::Failed);

        // Previously rendered state stays on screen; only the transient
        // error message changes.
        assert!(controller.metrics().is_some());
        assert_eq!(controller.trend_series().len(), 3);
        assert_eq!(controller.status().last_updated, before);
        assert!(controller.status().error.is_some());
    }
}

// ═══════════════════════════════════════════════════════════════════
// In-Flight Token
// ═══════════════════════════════════════════════════════════════════

mod in_flight {
    use super::*;

    #[tokio::test]
    async fn concurrent_trigger_is_rejected() {
        let mut source = ScriptedSource::succeeding(Provenance::Live);
        source.delay = Duration::from_millis(200);
        let fetches = source.fetch_counter();
        let controller = Arc::new(controller_with(source));

        let background = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.refresh().await })
        };

        // Let the background fetch reach its await point, then trigger
        // again while it is still in flight.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(controller.is_fetching());
        assert_eq!(controller.refresh().await, RefreshOutcome::Rejected);

        let first = background.await.unwrap();
        assert_eq!(first, RefreshOutcome::Applied(Provenance::Live));
        // Exactly one fetch ran; the rejected trigger never reached the
        // cascade.
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
        assert!(!controller.is_fetching());
    }

    #[tokio::test]
    async fn token_is_released_after_failure() {
        let mut source = ScriptedSource::succeeding(Provenance::Live);
        source.fail_first = 1;
        let controller = controller_with(source);

        assert_eq!(controller.refresh().await, RefreshOutcome::Failed);
        assert!(!controller.is_fetching());
        // The next trigger goes through and succeeds.
        assert_eq!(
            controller.refresh().await,
            RefreshOutcome::Applied(Provenance::Live)
        );
    }
}

// ═══════════════════════════════════════════════════════════════════
// Time Window Selection
// ═══════════════════════════════════════════════════════════════════

mod window_selection {
    use super::*;

    #[tokio::test]
    async fn select_range_never_fetches() {
        let source = ScriptedSource::succeeding(Provenance::Live);
        let fetches = source.fetch_counter();
        let controller = controller_with(source);

        controller.refresh().await;
        assert_eq!(fetches.load(Ordering::SeqCst), 1);

        let full = controller.select_range(0);
        assert_eq!(full.len(), 3);
        let _ = controller.select_range(7);
        let _ = controller.select_range(1);
        assert_eq!(fetches.load(Ordering::SeqCst), 1, "range changes are local");
    }

    #[tokio::test]
    async fn selection_survives_the_next_refresh() {
        let controller = controller_with(ScriptedSource::succeeding(Provenance::Live));
        controller.refresh().await;

        controller.select_range(7);
        assert_eq!(controller.selected_range_days(), 7);

        controller.refresh().await;
        // The re-applied window uses the current selection, not the default.
        assert_eq!(controller.selected_range_days(), 7);
        assert!(!controller.trend_series().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Privacy Toggle
// ═══════════════════════════════════════════════════════════════════

mod privacy_toggle {
    use super::*;
    use portfolio_dashboard_core::format::PRIVACY_PLACEHOLDER;

    #[tokio::test]
    async fn toggling_recomputes_without_a_fetch() {
        let source = ScriptedSource::succeeding(Provenance::Live);
        let fetches = source.fetch_counter();
        let controller = controller_with(source);

        controller.refresh().await;
        let open = controller.metrics().unwrap();
        assert_eq!(open.kpis.total_value_text, "$1,000.00");

        controller.set_privacy_mode(true);
        let redacted = controller.metrics().unwrap();
        assert_eq!(redacted.kpis.total_value_text, PRIVACY_PLACEHOLDER);

        controller.set_privacy_mode(false);
        let open_again = controller.metrics().unwrap();
        assert_eq!(open_again.kpis.total_value_text, "$1,000.00");

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn flag_set_before_first_fetch_applies_to_it() {
        let mut resolver = SourceResolver::new();
        resolver.register(Box::new(ScriptedSource::succeeding(Provenance::Live)));
        let controller = RefreshController::new(resolver, Duration::from_secs(60), 0, true);

        controller.refresh().await;
        let metrics = controller.metrics().unwrap();
        assert_eq!(metrics.kpis.total_value_text, PRIVACY_PLACEHOLDER);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Manual Refresh (two-step protocol)
// ═══════════════════════════════════════════════════════════════════

mod manual_refresh {
    use super::*;

    #[tokio::test]
    async fn recompute_trigger_completes_before_the_fetch() {
        let source = ScriptedSource::succeeding(Provenance::Live);
        let fetches = source.fetch_counter();
        let recomputes = source.recompute_counter();
        let controller = controller_with(source);

        let outcome = controller.manual_refresh().await;
        assert_eq!(outcome, RefreshOutcome::Applied(Provenance::Live));
        assert_eq!(recomputes.load(Ordering::SeqCst), 1);
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }
}
