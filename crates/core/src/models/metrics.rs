use serde::{Deserialize, Serialize};

/// Visual polarity of a signed figure. The view layer maps this straight
/// onto CSS class names: non-negative values are styled as gains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    /// Sign-driven polarity: zero counts as positive (breakeven is not a loss).
    pub fn from_sign(value: f64) -> Self {
        if value >= 0.0 {
            Polarity::Positive
        } else {
            Polarity::Negative
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
        }
    }
}

/// Headline KPI figures for the dashboard header cards.
///
/// Raw numbers and display strings travel together so the table/DOM view
/// can render without re-deriving anything. Day P&L and the total-return
/// percentage are separate figures and must never be conflated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiFigures {
    pub total_value: f64,
    pub total_value_text: String,

    pub cash: f64,
    pub cash_text: String,

    pub day_pnl: f64,
    pub day_pnl_pct: f64,
    /// e.g. "+$1,234.56 (+1.23%)"
    pub day_pnl_text: String,
    pub day_pnl_class: Polarity,

    pub total_return_pct: f64,
    pub total_return_text: String,
    pub total_return_class: Polarity,
}

/// One row of the holdings table, in source order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRow {
    pub symbol: String,
    pub quantity: f64,

    pub current_price: f64,
    pub current_price_text: String,

    /// Recomputed allocation share, percent of total market value.
    pub allocation_pct: f64,
    pub allocation_text: String,

    pub pnl_pct: f64,
    pub pnl_text: String,
    pub pnl_class: Polarity,

    pub market_value: f64,
    pub market_value_text: String,
}

/// One slice of the allocation donut, index-aligned with the table rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocationSlice {
    pub symbol: String,
    pub market_value: f64,
    pub share_pct: f64,
    /// Legend label, e.g. "TSLA (70.0%)".
    pub label: String,
}

/// Raised for every position whose share of total market value exceeds
/// the concentration threshold. Stateless — recomputed on each snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcentrationWarning {
    pub symbol: String,
    pub share_pct: f64,
}

/// Everything DerivedMetrics produces from one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetrics {
    pub kpis: KpiFigures,
    pub rows: Vec<PositionRow>,
    pub allocation: Vec<AllocationSlice>,
    pub warnings: Vec<ConcentrationWarning>,
}
