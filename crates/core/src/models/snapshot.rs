use serde::{Deserialize, Serialize};

/// A point-in-time read of the whole account, exactly as the data
/// sources serve it. Immutable for the duration of one render cycle;
/// every refresh produces a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSnapshot {
    /// Source-provided timestamp label. When absent, the refresh
    /// controller stamps the client's own clock instead.
    #[serde(default)]
    pub updated_at: Option<String>,

    /// Account-level totals. Wire key is `portfolio`.
    #[serde(rename = "portfolio")]
    pub totals: PortfolioTotals,

    /// Held instruments in source order — no ranking is implied here.
    pub positions: Vec<Position>,
}

/// Account-level aggregate figures, all in the account's base currency.
///
/// Day-P&L and total-return fields are optional on the wire: the simpler
/// feed variants omit them. They resolve to zero at the DerivedMetrics
/// boundary, nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioTotals {
    /// Total account value (market value of positions + cash).
    pub total_value: f64,

    /// Uninvested cash balance.
    pub cash: f64,

    /// Today's profit/loss in currency. Signed; 0.0 = breakeven.
    #[serde(default)]
    pub day_pnl: Option<f64>,

    /// Today's profit/loss as a percentage of yesterday's value.
    #[serde(default)]
    pub day_pnl_pct: Option<f64>,

    /// All-time profit/loss in currency.
    #[serde(default)]
    pub total_pnl_val: Option<f64>,

    /// All-time return percentage — independent of `day_pnl_pct`.
    #[serde(default)]
    pub total_pnl_pct: Option<f64>,
}

/// One held instrument.
///
/// `symbol` is the identity key (case-sensitive, non-empty). The
/// `marketValue ≈ quantity × currentPrice` relation is source-trusted,
/// not validated here. `allocation_percent` is never trusted from the
/// source — DerivedMetrics recomputes it from market values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,

    /// Units held. Signed — short positions are not expected in this
    /// domain, but they are not rejected either.
    pub quantity: f64,

    /// Per-unit cost at acquisition, when the source provides it.
    #[serde(default)]
    pub cost_basis: Option<f64>,

    pub current_price: f64,

    pub market_value: f64,

    #[serde(default)]
    pub allocation_percent: Option<f64>,

    /// Today's profit/loss for this position, in currency.
    #[serde(default)]
    pub day_pnl: Option<f64>,

    /// Today's profit/loss for this position, in percent.
    #[serde(default)]
    pub day_pnl_percent: Option<f64>,

    /// All-time profit/loss for this position, in currency.
    #[serde(default)]
    pub total_pnl: Option<f64>,

    /// All-time return percentage for this position.
    #[serde(default)]
    pub pnl_percent: Option<f64>,
}

impl Position {
    /// Build a position with only the always-present wire fields;
    /// the optional performance figures start absent.
    pub fn new(
        symbol: impl Into<String>,
        quantity: f64,
        current_price: f64,
        market_value: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quantity,
            cost_basis: None,
            current_price,
            market_value,
            allocation_percent: None,
            day_pnl: None,
            day_pnl_percent: None,
            total_pnl: None,
            pnl_percent: None,
        }
    }
}
