//! Collection of per-asset rows into one result table.

use std::collections::BTreeMap;

use macrobeta_primitives::{RegressionResult, ResultTable};

/// Accumulates result rows keyed by (asset, parameter).
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    rows: BTreeMap<(&'static str, &'static str), RegressionResult>,
}

impl ResultAggregator {
    /// Empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one row.
    ///
    /// # Panics
    /// Panics if a row with the same (asset, parameter) was already added.
    pub fn push(&mut self, row: RegressionResult) {
        let key = row.key();
        let previous = self.rows.insert(key, row);
        assert!(previous.is_none(), "duplicate result row for ({}, {})", key.0, key.1);
    }

    /// Add every row of one asset.
    ///
    /// # Panics
    /// Same as [`Self::push`].
    pub fn extend(&mut self, rows: impl IntoIterator<Item = RegressionResult>) {
        for row in rows {
            self.push(row);
        }
    }

    /// Rows collected so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted, uniquely keyed table.
    #[must_use]
    pub fn finish(self) -> ResultTable {
        ResultTable::from_rows(self.rows.into_values())
    }
}
