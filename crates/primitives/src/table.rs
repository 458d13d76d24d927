//! Date-indexed tables of closing prices and daily changes.
//!
//! Both tables share one layout: a strictly increasing date index and one
//! nullable `f64` series per known instrument. Gaps are explicit `None`
//! markers, never silently omitted dates. Non-finite values are stored as
//! missing. Conversion to and from polars `DataFrame`s uses a `date` column of
//! polars `Date` type plus one column per instrument.

use std::collections::{BTreeMap, BTreeSet};

use chrono::DateTime;
use polars::prelude::*;

use crate::{Date, Instrument, TableError};

/// Name of the date column in every frame.
pub const DATE_COLUMN: &str = "date";

/// Which column names a table uses for its instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Naming {
    Price,
    Change,
}

impl Naming {
    const fn column_name(self, instrument: Instrument) -> &'static str {
        match self {
            Self::Price => instrument.price_name(),
            Self::Change => instrument.name(),
        }
    }

    fn parse(self, name: &str) -> Option<Instrument> {
        match self {
            Self::Price => Instrument::from_price_name(name),
            Self::Change => Instrument::from_name(name),
        }
    }
}

/// Shared storage of both table kinds.
#[derive(Debug, Clone, Default, PartialEq)]
struct Columns {
    dates: Vec<Date>,
    series: Vec<(Instrument, Vec<Option<f64>>)>,
}

impl Columns {
    fn build(
        dates: Vec<Date>,
        series: Vec<(Instrument, Vec<Option<f64>>)>,
        naming: Naming,
    ) -> Result<Self, TableError> {
        if let Some(i) = dates.windows(2).position(|w| w[0] >= w[1]) {
            return Err(TableError::UnsortedDates(i + 1));
        }

        let mut seen = BTreeSet::new();
        let mut clean = Vec::with_capacity(series.len());
        for (instrument, values) in series {
            let name = naming.column_name(instrument);
            if !seen.insert(name) {
                return Err(TableError::DuplicateColumn(name.to_string()));
            }
            if values.len() != dates.len() {
                return Err(TableError::LengthMismatch {
                    column: name.to_string(),
                    expected: dates.len(),
                    actual: values.len(),
                });
            }
            let values = values.into_iter().map(|v| v.filter(|x| x.is_finite())).collect();
            clean.push((instrument, values));
        }

        Ok(Self { dates, series: clean })
    }

    fn from_frame(frame: &DataFrame, naming: Naming) -> Result<Self, TableError> {
        let date_column =
            frame.column(DATE_COLUMN).map_err(|_| TableError::MissingDateColumn)?;
        let dates = read_dates(date_column)?;

        let mut series = Vec::new();
        for column in frame.get_columns() {
            let name = column.name().as_str();
            if name == DATE_COLUMN {
                continue;
            }
            let instrument =
                naming.parse(name).ok_or_else(|| TableError::UnknownColumn(name.to_string()))?;
            if !is_numeric(column.dtype()) {
                return Err(TableError::NonNumericColumn {
                    column: name.to_string(),
                    dtype: column.dtype().to_string(),
                });
            }
            let values = column.cast(&DataType::Float64)?;
            let values: Vec<Option<f64>> = values.f64()?.into_iter().collect();
            series.push((instrument, values));
        }

        Self::build(dates, series, naming)
    }

    fn to_frame(&self, naming: Naming) -> Result<DataFrame, TableError> {
        let mut columns = Vec::with_capacity(self.series.len() + 1);
        columns.push(Column::new(DATE_COLUMN.into(), self.dates.clone()));
        for (instrument, values) in &self.series {
            columns.push(Column::new(naming.column_name(*instrument).into(), values.clone()));
        }
        Ok(DataFrame::new(columns)?)
    }

    fn get(&self, instrument: Instrument) -> Option<&[Option<f64>]> {
        self.series.iter().find(|(i, _)| *i == instrument).map(|(_, values)| values.as_slice())
    }

    fn instruments(&self) -> impl Iterator<Item = Instrument> + '_ {
        self.series.iter().map(|(instrument, _)| *instrument)
    }
}

const fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    )
}

fn read_dates(column: &Column) -> Result<Vec<Date>, TableError> {
    let column = match column.dtype() {
        DataType::Date => column.clone(),
        _ => column.cast(&DataType::Date)?,
    };
    let days = column.cast(&DataType::Int32)?;

    days.i32()?
        .into_iter()
        .enumerate()
        .map(|(row, day)| {
            day.and_then(|d| DateTime::from_timestamp(i64::from(d) * 86_400, 0))
                .map(|dt| dt.date_naive())
                .ok_or(TableError::InvalidDate(row))
        })
        .collect()
}

/// Daily closing prices, one column per instrument's price level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    inner: Columns,
}

impl PriceTable {
    /// Build a price table from aligned columns.
    ///
    /// # Errors
    /// Returns `TableError` if dates are not strictly increasing, an instrument
    /// repeats, or a column's length differs from the date index.
    pub fn from_columns(
        dates: Vec<Date>,
        columns: Vec<(Instrument, Vec<Option<f64>>)>,
    ) -> Result<Self, TableError> {
        Ok(Self { inner: Columns::build(dates, columns, Naming::Price)? })
    }

    /// Join independently fetched close series on date.
    ///
    /// The date index is the sorted union of all series' dates; an instrument
    /// without a close on a date gets a missing marker. When a series repeats a
    /// date, its last value wins.
    ///
    /// # Errors
    /// Returns `TableError::DuplicateColumn` if an instrument appears twice.
    pub fn from_series(series: Vec<(Instrument, Vec<(Date, f64)>)>) -> Result<Self, TableError> {
        let union: BTreeSet<Date> =
            series.iter().flat_map(|(_, obs)| obs.iter().map(|(d, _)| *d)).collect();
        let dates: Vec<Date> = union.into_iter().collect();

        let columns = series
            .into_iter()
            .map(|(instrument, obs)| {
                let by_date: BTreeMap<Date, f64> = obs.into_iter().collect();
                let values = dates.iter().map(|d| by_date.get(d).copied()).collect();
                (instrument, values)
            })
            .collect();

        Self::from_columns(dates, columns)
    }

    /// Read a price table from a polars frame whose columns are price names.
    ///
    /// # Errors
    /// Returns `TableError` on a missing date column, unknown or non-numeric
    /// columns, or unsorted dates.
    pub fn from_frame(frame: &DataFrame) -> Result<Self, TableError> {
        Ok(Self { inner: Columns::from_frame(frame, Naming::Price)? })
    }

    /// Convert to a polars frame keyed by price column names.
    ///
    /// # Errors
    /// Returns `TableError::Polars` if the frame cannot be assembled.
    pub fn to_frame(&self) -> Result<DataFrame, TableError> {
        self.inner.to_frame(Naming::Price)
    }

    /// Date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.inner.dates
    }

    /// Number of dates.
    #[must_use]
    pub fn height(&self) -> usize {
        self.inner.dates.len()
    }

    /// Whether the table holds no instrument at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.series.is_empty()
    }

    /// Instruments present, in column order.
    pub fn instruments(&self) -> impl Iterator<Item = Instrument> + '_ {
        self.inner.instruments()
    }

    /// Closes of one instrument, or `None` if the instrument is absent.
    #[must_use]
    pub fn column(&self, instrument: Instrument) -> Option<&[Option<f64>]> {
        self.inner.get(instrument)
    }
}

/// Daily changes, one column per instrument's change series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangesTable {
    inner: Columns,
}

impl ChangesTable {
    /// Build a changes table from aligned columns.
    ///
    /// # Errors
    /// Returns `TableError` if dates are not strictly increasing, an instrument
    /// repeats, or a column's length differs from the date index.
    pub fn from_columns(
        dates: Vec<Date>,
        columns: Vec<(Instrument, Vec<Option<f64>>)>,
    ) -> Result<Self, TableError> {
        Ok(Self { inner: Columns::build(dates, columns, Naming::Change)? })
    }

    /// Read a changes table from a polars frame whose columns are change names.
    ///
    /// # Errors
    /// Returns `TableError` on a missing date column, unknown or non-numeric
    /// columns, or unsorted dates.
    pub fn from_frame(frame: &DataFrame) -> Result<Self, TableError> {
        Ok(Self { inner: Columns::from_frame(frame, Naming::Change)? })
    }

    /// Convert to a polars frame keyed by change column names.
    ///
    /// # Errors
    /// Returns `TableError::Polars` if the frame cannot be assembled.
    pub fn to_frame(&self) -> Result<DataFrame, TableError> {
        self.inner.to_frame(Naming::Change)
    }

    /// Date index.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.inner.dates
    }

    /// Number of dates.
    #[must_use]
    pub fn height(&self) -> usize {
        self.inner.dates.len()
    }

    /// Whether the table holds no instrument at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.series.is_empty()
    }

    /// Whether the instrument's column is present.
    #[must_use]
    pub fn contains(&self, instrument: impl Into<Instrument>) -> bool {
        self.inner.get(instrument.into()).is_some()
    }

    /// Instruments present, in column order.
    pub fn instruments(&self) -> impl Iterator<Item = Instrument> + '_ {
        self.inner.instruments()
    }

    /// Changes of one instrument, or `None` if the instrument is absent.
    #[must_use]
    pub fn column(&self, instrument: impl Into<Instrument>) -> Option<&[Option<f64>]> {
        self.inner.get(instrument.into())
    }
}
