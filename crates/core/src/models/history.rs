use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single portfolio-value data point (date → total value).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Session-scoped store of the most recently loaded history series.
///
/// The cache owns exactly one series at a time: each successful fetch
/// replaces it wholesale (no partial merge), so the stored points always
/// come from a single source tier. Time-window selection is a pure read
/// over the stored series and never triggers a fetch.
///
/// Nothing here survives the process — history is re-fetched from
/// scratch on every start.
#[derive(Debug, Clone, Default)]
pub struct HistoryCache {
    series: Vec<HistoryPoint>,
}

impl HistoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached series atomically (single assignment).
    pub fn store(&mut self, series: Vec<HistoryPoint>) {
        self.series = series;
    }

    /// The full cached series, ascending by date, in source order.
    pub fn series(&self) -> &[HistoryPoint] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Window the cached series to the trailing `range_days` days,
    /// measured from today. `0` is the sentinel for "all data".
    pub fn filter(&self, range_days: u32) -> Vec<HistoryPoint> {
        self.window(range_days, chrono::Utc::now().date_naive())
    }

    /// Pure windowing with an explicit reference date.
    ///
    /// Returns all points with `date >= today - range_days`. If that
    /// subsequence is empty (range narrower than the data's granularity,
    /// or all data older than the cutoff), the full series is returned
    /// instead — an empty chart is worse than a mis-windowed one.
    pub fn window(&self, range_days: u32, today: NaiveDate) -> Vec<HistoryPoint> {
        if range_days == 0 {
            return self.series.clone();
        }

        let cutoff = today - chrono::Duration::days(i64::from(range_days));
        let filtered: Vec<HistoryPoint> = self
            .series
            .iter()
            .filter(|p| p.date >= cutoff)
            .cloned()
            .collect();

        if filtered.is_empty() {
            self.series.clone()
        } else {
            filtered
        }
    }
}
