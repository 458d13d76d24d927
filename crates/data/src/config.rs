//! Fetch configuration.

use std::{str::FromStr, time::Duration};

use macrobeta_primitives::{Asset, Factor, Instrument};

use crate::DataError;

/// Calendar days of history fetched by default.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 260;

/// Pause between two ticker downloads by default.
pub const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(250);

/// Which tickers to download and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Calendar days of history.
    pub lookback_days: u32,
    /// Pause between two downloads.
    pub rate_limit: Duration,
    tickers: Vec<(Instrument, String)>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        let tickers: [(Instrument, &str); 6] = [
            (Asset::EuroStoxx50.into(), "^STOXX50E"),
            (Asset::Eufn.into(), "EUFN"),
            (Asset::Xlu.into(), "XLU"),
            (Asset::Sp500.into(), "^GSPC"),
            (Factor::EurUsd.into(), "EURUSD=X"),
            (Factor::Ust10yBp.into(), "^TNX"),
        ];
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            rate_limit: DEFAULT_RATE_LIMIT,
            tickers: tickers.into_iter().map(|(i, s)| (i, s.to_string())).collect(),
        }
    }
}

impl FetchConfig {
    /// Set or replace the ticker of `instrument`.
    #[must_use]
    pub fn with_ticker(mut self, instrument: Instrument, symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        match self.tickers.iter_mut().find(|(i, _)| *i == instrument) {
            Some(entry) => entry.1 = symbol,
            None => self.tickers.push((instrument, symbol)),
        }
        self
    }

    /// Set the history length.
    #[must_use]
    pub const fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    /// Ticker of `instrument`, if configured.
    #[must_use]
    pub fn ticker(&self, instrument: Instrument) -> Option<&str> {
        self.tickers.iter().find(|(i, _)| *i == instrument).map(|(_, s)| s.as_str())
    }

    /// Configured instruments in known order.
    #[must_use]
    pub fn instruments(&self) -> Vec<Instrument> {
        Instrument::ALL.into_iter().filter(|i| self.ticker(*i).is_some()).collect()
    }
}

/// A `NAME=SYMBOL` ticker override.
///
/// `NAME` is a price column (`BUND`) or a change column (`BUND_BP`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerOverride {
    /// Instrument the symbol is for.
    pub instrument: Instrument,
    /// Yahoo symbol.
    pub symbol: String,
}

impl FromStr for TickerOverride {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, symbol) = s
            .split_once('=')
            .filter(|(n, sym)| !n.trim().is_empty() && !sym.trim().is_empty())
            .ok_or_else(|| DataError::InvalidOverride(s.to_string()))?;
        let name = name.trim().to_ascii_uppercase();
        let instrument = Instrument::from_price_name(&name)
            .or_else(|| Instrument::from_name(&name))
            .ok_or(DataError::UnknownInstrument(name))?;
        Ok(Self { instrument, symbol: symbol.trim().to_string() })
    }
}
