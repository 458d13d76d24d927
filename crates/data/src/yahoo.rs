//! Yahoo Finance price source.

use chrono::DateTime;
use macrobeta_primitives::{Date, Instrument, PriceTable};
use macrobeta_traits::{FetchError, MarketDataSource};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};
use yahoo_finance_api as yahoo;

use crate::FetchConfig;

/// Daily adjusted closes from Yahoo Finance.
pub struct YahooSource {
    connector: yahoo::YahooConnector,
    config: FetchConfig,
}

impl std::fmt::Debug for YahooSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YahooSource").field("config", &self.config).finish_non_exhaustive()
    }
}

impl YahooSource {
    /// Create a source with the given tickers.
    ///
    /// # Errors
    /// Returns `FetchError::Connector` if the HTTP client cannot be built.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| FetchError::Connector(e.to_string()))?;
        Ok(Self { connector, config })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Fetch the configured instruments over the configured lookback.
    ///
    /// # Errors
    /// Same as [`MarketDataSource::fetch_closes`].
    pub async fn fetch_configured(&self) -> Result<PriceTable, FetchError> {
        self.fetch_closes(&self.config.instruments(), self.config.lookback_days).await
    }

    async fn fetch_symbol(
        &self,
        symbol: &str,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<Vec<(Date, f64)>, yahoo::YahooError> {
        let response = self.connector.get_quote_history(symbol, start, end).await?;
        let offset = response.metadata().map(|m| i64::from(m.gmtoffset)).unwrap_or(0);
        let quotes = response.quotes()?;

        Ok(quotes
            .iter()
            .filter_map(|q| {
                let timestamp = i64::try_from(q.timestamp).ok()?;
                Some((quote_date(timestamp, offset)?, q.adjclose))
            })
            .collect())
    }
}

/// Exchange-local calendar date of a quote timestamp.
fn quote_date(timestamp: i64, gmtoffset: i64) -> Option<Date> {
    DateTime::from_timestamp(timestamp.checked_add(gmtoffset)?, 0).map(|dt| dt.date_naive())
}

impl MarketDataSource for YahooSource {
    async fn fetch_closes(
        &self,
        instruments: &[Instrument],
        lookback_days: u32,
    ) -> Result<PriceTable, FetchError> {
        let end = OffsetDateTime::now_utc();
        let start = end - Duration::days(i64::from(lookback_days));

        let mut series = Vec::with_capacity(instruments.len());
        for (i, instrument) in instruments.iter().enumerate() {
            let Some(symbol) = self.config.ticker(*instrument) else {
                warn!(%instrument, "no ticker configured, skipping");
                continue;
            };
            if i > 0 {
                tokio::time::sleep(self.config.rate_limit).await;
            }

            match self.fetch_symbol(symbol, start, end).await {
                Ok(closes) if closes.is_empty() => {
                    warn!(%instrument, symbol, "no quotes returned");
                }
                Ok(closes) => {
                    debug!(%instrument, symbol, quotes = closes.len(), "fetched closes");
                    series.push((*instrument, closes));
                }
                Err(e) => {
                    warn!(%instrument, symbol, error = %e, "download failed");
                }
            }
        }

        info!(
            source = self.name(),
            requested = instruments.len(),
            fetched = series.len(),
            "price download finished"
        );
        Ok(PriceTable::from_series(series)?)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[cfg(test)]
mod tests {
    use macrobeta_primitives::{Asset, Factor};

    use super::*;

    #[test]
    fn quote_dates_are_exchange_local() {
        // 2024-03-15 21:00 UTC is still the 15th in New York (UTC-4)...
        assert_eq!(quote_date(1_710_536_400, -4 * 3600), Date::from_ymd_opt(2024, 3, 15));
        // ...but already the 16th in Tokyo (UTC+9).
        assert_eq!(quote_date(1_710_536_400, 9 * 3600), Date::from_ymd_opt(2024, 3, 16));
        assert_eq!(quote_date(i64::MAX, 1), None);
    }

    #[tokio::test]
    async fn unconfigured_instruments_are_skipped() {
        let source = YahooSource::new(FetchConfig::default()).unwrap();

        // BUND has no default ticker, so nothing is requested over the network.
        let prices = source.fetch_closes(&[Factor::BundBp.into()], 10).await.unwrap();

        assert!(prices.is_empty());
        assert_eq!(source.name(), "yahoo");
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn fetches_live_closes() {
        let source = YahooSource::new(FetchConfig::default()).unwrap();

        let instruments: [Instrument; 2] = [Asset::Xlu.into(), Factor::EurUsd.into()];

        let prices = source.fetch_closes(&instruments, 30).await.unwrap();

        assert!(prices.height() > 10);
        assert!(prices.column(Asset::Xlu.into()).is_some());
    }
}
