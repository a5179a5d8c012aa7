//! Result types produced by the statistics engine.
//!
//! Each input column gets one [`ColumnStatistic`], whose running state is a two-state
//! [`ColumnState`]: numeric accumulation until the first non-numeric value, text afterwards.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Running state of one column.
///
/// The only transition is `Numeric -> Text`, taken at the first value that does not parse as a
/// number. It is never reversed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnState {
    /// All non-empty values seen so far parsed as numbers.
    Numeric {
        count: u64,
        mean: f64,
        min: f64,
        max: f64,
    },
    /// At least one non-empty value did not parse as a number.
    Text,
}

impl ColumnState {
    /// The "no data" numeric state: count 0, mean 0, min +inf, max -inf.
    pub const EMPTY_NUMERIC: ColumnState = ColumnState::Numeric {
        count: 0,
        mean: 0.0,
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };
}

/// Statistics for a single named column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStatistic {
    /// Column name, taken from the header row.
    pub name: String,
    /// Running state.
    pub state: ColumnState,
}

impl ColumnStatistic {
    /// Create a column in the empty numeric state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: ColumnState::EMPTY_NUMERIC,
        }
    }

    /// Fold one parsed value into the running statistics (Welford's running mean).
    ///
    /// Has no effect once the column is [`ColumnState::Text`].
    pub fn observe(&mut self, value: f64) {
        if let ColumnState::Numeric {
            count,
            mean,
            min,
            max,
        } = &mut self.state
        {
            *count += 1;
            let delta = value - *mean;
            *mean += delta / *count as f64;
            *min = min.min(value);
            *max = max.max(value);
        }
    }

    /// Permanently mark the column as non-numeric, discarding accumulated numbers.
    pub fn mark_text(&mut self) {
        self.state = ColumnState::Text;
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.state, ColumnState::Numeric { .. })
    }

    /// Number of numeric values folded in; 0 for text columns.
    pub fn count(&self) -> u64 {
        match self.state {
            ColumnState::Numeric { count, .. } => count,
            ColumnState::Text => 0,
        }
    }

    /// Running mean; 0 for text columns.
    pub fn mean(&self) -> f64 {
        match self.state {
            ColumnState::Numeric { mean, .. } => mean,
            ColumnState::Text => 0.0,
        }
    }

    /// Smallest value seen; +inf when nothing was folded in or the column is text.
    pub fn min(&self) -> f64 {
        match self.state {
            ColumnState::Numeric { min, .. } => min,
            ColumnState::Text => f64::INFINITY,
        }
    }

    /// Largest value seen; -inf when nothing was folded in or the column is text.
    pub fn max(&self) -> f64 {
        match self.state {
            ColumnState::Numeric { max, .. } => max,
            ColumnState::Text => f64::NEG_INFINITY,
        }
    }
}

impl Serialize for ColumnStatistic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Infinite min/max have no JSON representation; serde_json writes them as null.
        let mut s = serializer.serialize_struct("ColumnStatistic", 6)?;
        s.serialize_field("name", &self.name)?;
        s.serialize_field("is_numeric", &self.is_numeric())?;
        s.serialize_field("count", &self.count())?;
        s.serialize_field("mean", &self.mean())?;
        s.serialize_field("min", &self.min())?;
        s.serialize_field("max", &self.max())?;
        s.end()
    }
}

/// Aggregate statistics for one compressed CSV input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetStatistics {
    /// Number of data rows (header excluded).
    pub row_count: u64,
    /// One entry per header column, in header order.
    pub columns: Vec<ColumnStatistic>,
}

impl DatasetStatistics {
    /// Create statistics for the given header, all columns in the empty numeric state.
    pub fn with_columns<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            row_count: 0,
            columns: names.into_iter().map(ColumnStatistic::new).collect(),
        }
    }

    /// Returns the column with the given name, if present.
    pub fn column(&self, name: &str) -> Option<&ColumnStatistic> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnState, ColumnStatistic, DatasetStatistics};

    #[test]
    fn running_mean_min_max() {
        let mut col = ColumnStatistic::new("x");
        for v in [4.0, -2.0, 10.0, 0.0] {
            col.observe(v);
        }
        assert_eq!(col.count(), 4);
        assert!((col.mean() - 3.0).abs() < 1e-12);
        assert_eq!(col.min(), -2.0);
        assert_eq!(col.max(), 10.0);
    }

    #[test]
    fn text_transition_resets_and_sticks() {
        let mut col = ColumnStatistic::new("x");
        col.observe(1.0);
        col.mark_text();
        col.observe(5.0);
        assert_eq!(col.state, ColumnState::Text);
        assert_eq!(col.count(), 0);
        assert_eq!(col.mean(), 0.0);
        assert_eq!(col.min(), f64::INFINITY);
        assert_eq!(col.max(), f64::NEG_INFINITY);
    }

    #[test]
    fn new_columns_start_numeric_and_empty() {
        let stats = DatasetStatistics::with_columns(["a", "b"]);
        assert_eq!(stats.row_count, 0);
        assert_eq!(stats.columns.len(), 2);
        assert!(stats.columns.iter().all(|c| c.state == ColumnState::EMPTY_NUMERIC));
        assert!(stats.column("b").is_some());
        assert!(stats.column("c").is_none());
    }

    #[test]
    fn serializes_derived_fields() {
        let mut stats = DatasetStatistics::with_columns(["n"]);
        stats.row_count = 1;
        stats.columns[0].observe(2.5);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["row_count"], 1);
        assert_eq!(json["columns"][0]["name"], "n");
        assert_eq!(json["columns"][0]["is_numeric"], true);
        assert_eq!(json["columns"][0]["count"], 1);
    }
}
