use crate::format;
use crate::models::metrics::{
    AllocationSlice, ConcentrationWarning, DashboardMetrics, KpiFigures, Polarity, PositionRow,
};
use crate::models::snapshot::PortfolioSnapshot;

/// Share of total market value above which a single position is flagged
/// as concentration risk. Strictly greater-than: a position at exactly
/// 30% is not flagged.
pub const CONCENTRATION_THRESHOLD: f64 = 0.30;

/// Turns raw snapshots into the derived values every view consumes:
/// KPI figures, table rows, allocation shares, concentration warnings.
///
/// Pure and total — no I/O, no error outcomes. Optional wire fields
/// resolve to zero here and only here, so the default policy lives in
/// one testable place instead of being scattered across call sites.
pub struct MetricsService;

impl MetricsService {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, snapshot: &PortfolioSnapshot, privacy_mode: bool) -> DashboardMetrics {
        let kpis = self.compute_kpis(snapshot, privacy_mode);

        let total_market_value: f64 = snapshot.positions.iter().map(|p| p.market_value).sum();

        let mut rows = Vec::with_capacity(snapshot.positions.len());
        let mut allocation = Vec::with_capacity(snapshot.positions.len());
        let mut warnings = Vec::new();

        for position in &snapshot.positions {
            // Allocation is recomputed from market values, never trusted
            // from the source. Zero total market value defines every
            // share as zero — no division by zero propagates.
            let share = if total_market_value > 0.0 {
                position.market_value / total_market_value
            } else {
                0.0
            };
            let allocation_pct = share * 100.0;

            let pnl_pct = or_zero(position.pnl_percent);

            rows.push(PositionRow {
                symbol: position.symbol.clone(),
                quantity: position.quantity,
                current_price: position.current_price,
                current_price_text: format::currency(position.current_price, privacy_mode),
                allocation_pct,
                allocation_text: format::percent(allocation_pct),
                pnl_pct,
                pnl_text: format::signed_percent(pnl_pct),
                pnl_class: Polarity::from_sign(pnl_pct),
                market_value: position.market_value,
                market_value_text: format::currency(position.market_value, privacy_mode),
            });

            allocation.push(AllocationSlice {
                symbol: position.symbol.clone(),
                market_value: position.market_value,
                share_pct: allocation_pct,
                label: format!("{} ({})", position.symbol, format::percent(allocation_pct)),
            });

            if share > CONCENTRATION_THRESHOLD {
                warnings.push(ConcentrationWarning {
                    symbol: position.symbol.clone(),
                    share_pct: allocation_pct,
                });
            }
        }

        DashboardMetrics {
            kpis,
            rows,
            allocation,
            warnings,
        }
    }

    fn compute_kpis(&self, snapshot: &PortfolioSnapshot, privacy_mode: bool) -> KpiFigures {
        let totals = &snapshot.totals;
        let day_pnl = or_zero(totals.day_pnl);
        let day_pnl_pct = or_zero(totals.day_pnl_pct);
        // Total return is its own figure; it must never be conflated
        // with the day P&L percentage.
        let total_return_pct = or_zero(totals.total_pnl_pct);

        KpiFigures {
            total_value: totals.total_value,
            total_value_text: format::currency(totals.total_value, privacy_mode),
            cash: totals.cash,
            cash_text: format::currency(totals.cash, privacy_mode),
            day_pnl,
            day_pnl_pct,
            day_pnl_text: format!(
                "{} ({})",
                format::signed_currency(day_pnl, privacy_mode),
                format::signed_percent(day_pnl_pct)
            ),
            day_pnl_class: Polarity::from_sign(day_pnl),
            total_return_pct,
            total_return_text: format::signed_percent(total_return_pct),
            total_return_class: Polarity::from_sign(total_return_pct),
        }
    }
}

impl Default for MetricsService {
    fn default() -> Self {
        Self::new()
    }
}

/// The one place an absent wire field becomes a concrete default.
fn or_zero(value: Option<f64>) -> f64 {
    value.unwrap_or(0.0)
}
