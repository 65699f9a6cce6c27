use serde::{Deserialize, Serialize};

/// Pinned colors for the account's flagship holdings. Checked before
/// either palette strategy so these never shift.
const FIXED_COLORS: &[(&str, &str)] = &[
    ("TSLA", "#E31937"),
    ("NVDA", "#76B900"),
    ("IBKR", "#B71C1C"),
];

/// High-contrast palette for everything else (Material A400 picks,
/// chosen to avoid near-identical neighbors).
const PALETTE: &[&str] = &[
    "#2979FF", // Blue
    "#FF9100", // Orange
    "#00E676", // Green
    "#651FFF", // Deep Purple
    "#FF1744", // Red
    "#00B0FF", // Light Blue
    "#F50057", // Pink
    "#76FF03", // Light Green
    "#FFC400", // Amber
    "#D500F9", // Purple
    "#1DE9B6", // Teal
    "#FF3D00", // Deep Orange
];

/// How non-overridden symbols resolve to palette colors.
///
/// Exactly one strategy is chosen at construction and applied everywhere;
/// mixing strategies between the table and the chart legend produces
/// visibly inconsistent colors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorStrategy {
    /// Hash the symbol's characters modulo the palette size. The same
    /// symbol always gets the same color, regardless of where it sits
    /// in the list — stable across renders and across sessions.
    #[default]
    SymbolHash,

    /// The Nth position (by source order) gets the Nth palette color.
    /// No two currently displayed positions collide, but colors shift
    /// if the source order changes between renders.
    SourceRank,
}

/// Deterministic symbol → display-color mapping.
///
/// Pure and stable: the same symbol with the same override table always
/// resolves to the same color within a session.
#[derive(Debug, Clone)]
pub struct ColorAssigner {
    strategy: ColorStrategy,
}

impl ColorAssigner {
    pub fn new(strategy: ColorStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> ColorStrategy {
        self.strategy
    }

    /// Resolve the display color for a symbol. `rank_index` is the
    /// position's index in source order; it only matters under
    /// `ColorStrategy::SourceRank`.
    pub fn color_for(&self, symbol: &str, rank_index: usize) -> &'static str {
        if let Some(&(_, color)) = FIXED_COLORS.iter().find(|(s, _)| *s == symbol) {
            return color;
        }

        match self.strategy {
            ColorStrategy::SymbolHash => PALETTE[symbol_hash(symbol) % PALETTE.len()],
            ColorStrategy::SourceRank => PALETTE[rank_index % PALETTE.len()],
        }
    }
}

impl Default for ColorAssigner {
    fn default() -> Self {
        Self::new(ColorStrategy::default())
    }
}

/// 31-multiplier character hash with 32-bit wrapping arithmetic, so the
/// mapping matches across every surface that renders this portfolio.
fn symbol_hash(symbol: &str) -> usize {
    let mut hash: i32 = 0;
    for c in symbol.chars() {
        hash = (c as i32).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
    }
    hash.unsigned_abs() as usize
}
