//! Market data source trait definitions.

use std::future::Future;

use macrobeta_primitives::{Instrument, PriceTable, TableError};

/// Errors that abort a whole fetch.
///
/// Failures of a single instrument are not errors: sources log them and leave
/// the instrument out of the returned table.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The underlying client could not be created.
    #[error("connector error: {0}")]
    Connector(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The fetched series could not be assembled into a table.
    #[error("table error: {0}")]
    Table(#[from] TableError),
}

/// Provider of daily closing prices.
pub trait MarketDataSource: Send + Sync {
    /// Fetch daily closes of `instruments` over the trailing `lookback_days`
    /// calendar days.
    ///
    /// The returned table holds one price column per instrument that could be
    /// retrieved; it may be empty.
    ///
    /// # Errors
    /// Returns `FetchError` only when nothing can be attempted at all.
    fn fetch_closes(
        &self,
        instruments: &[Instrument],
        lookback_days: u32,
    ) -> impl Future<Output = Result<PriceTable, FetchError>> + Send;

    /// Human-readable name of the source.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use macrobeta_primitives::{Asset, Date, Factor};

    use super::*;

    /// In-memory source returning a fixed series for every known instrument.
    struct StaticSource {
        closes: Vec<(Instrument, Vec<(Date, f64)>)>,
    }

    impl MarketDataSource for StaticSource {
        async fn fetch_closes(
            &self,
            instruments: &[Instrument],
            _lookback_days: u32,
        ) -> Result<PriceTable, FetchError> {
            let series = self
                .closes
                .iter()
                .filter(|(i, _)| instruments.contains(i))
                .cloned()
                .collect();
            Ok(PriceTable::from_series(series)?)
        }

        fn name(&self) -> &str {
            "static"
        }
    }

    #[tokio::test]
    async fn source_filters_requested_instruments() {
        let day = |d| Date::from_ymd_opt(2024, 5, d).unwrap();
        let source = StaticSource {
            closes: vec![
                (Asset::Xlu.into(), vec![(day(1), 70.0), (day(2), 70.5)]),
                (Factor::EurUsd.into(), vec![(day(1), 1.07), (day(2), 1.08)]),
            ],
        };

        let prices = source.fetch_closes(&[Asset::Xlu.into()], 30).await.unwrap();
        assert_eq!(prices.instruments().collect::<Vec<_>>(), vec![Instrument::from(Asset::Xlu)]);
        assert_eq!(source.name(), "static");
    }

    #[test]
    fn fetch_error_display() {
        let err = FetchError::Connector("tls".to_string());
        assert_eq!(err.to_string(), "connector error: tls");
    }
}
