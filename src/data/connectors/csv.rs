use crate::data::series::BarSeries;
use crate::error::{Result, SeriesCacheError};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use polars::prelude::*;
use std::path::Path;
use super::{types::DATETIME_ALIASES, validator::OhlcvColumns};

/// Spacing of synthesized timestamps when the file has no datetime column.
const SYNTHETIC_BAR_SECONDS: i64 = 60;

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
            .finish()
            .map_err(|e| SeriesCacheError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        Ok(df)
    }

    /// Load a CSV file straight into a bar series
    pub fn load_series<P: AsRef<Path>>(path: P, maximum_bar_count: Option<usize>) -> Result<BarSeries> {
        let df = Self::load(&path)?;
        let name = path
            .as_ref()
            .file_stem()
            .map(|stem| stem.to_string_lossy().to_string())
            .unwrap_or_else(|| "series".to_string());
        Self::series_from_frame(name, &df, maximum_bar_count)
    }

    /// Build a bar series from an OHLCV frame, one bar per row.
    ///
    /// Rows with a null price or volume are skipped; a bar whose high/low do
    /// not bound its open and close fails the whole load.
    pub fn series_from_frame(
        name: impl Into<String>,
        df: &DataFrame,
        maximum_bar_count: Option<usize>,
    ) -> Result<BarSeries> {
        let columns = OhlcvColumns::resolve(df)?;
        let timestamps = Self::timestamps(df)?;
        let (bars, skipped) = columns.bars(&timestamps)?;
        if skipped > 0 {
            log::warn!("Skipped {} rows with null price or volume", skipped);
        }

        let mut series = BarSeries::new(name);
        series.set_maximum_bar_count(maximum_bar_count)?;
        for bar in bars {
            series.add_bar(bar)?;
        }

        log::debug!(
            "loaded series '{}': {} bars kept, {} removed",
            series.name(),
            series.bar_count(),
            series.begin_index()
        );
        Ok(series)
    }

    fn detect_datetime_column(df: &DataFrame) -> Option<&'static str> {
        let columns = df.get_column_names();
        DATETIME_ALIASES
            .iter()
            .find(|&&alias| columns.iter().any(|col| col.as_str() == alias))
            .copied()
    }

    fn timestamps(df: &DataFrame) -> Result<Vec<DateTime<Utc>>> {
        let Some(name) = Self::detect_datetime_column(df) else {
            return (0..df.height())
                .map(|i| Self::epoch_seconds(i as i64 * SYNTHETIC_BAR_SECONDS))
                .collect();
        };

        let column = df.column(name)?;
        match column.dtype() {
            DataType::String => {
                let values = column.str()?;
                (0..df.height())
                    .map(|i| {
                        let raw = values.get(i).ok_or_else(|| {
                            SeriesCacheError::DataLoading(format!("Missing timestamp at row {}", i))
                        })?;
                        Self::parse_timestamp(raw)
                    })
                    .collect()
            }
            DataType::Int64 | DataType::Int32 | DataType::UInt64 | DataType::UInt32 => {
                let values = column.cast(&DataType::Int64)?;
                let values = values.i64()?;
                (0..df.height())
                    .map(|i| {
                        let secs = values.get(i).ok_or_else(|| {
                            SeriesCacheError::DataLoading(format!("Missing timestamp at row {}", i))
                        })?;
                        Self::epoch_seconds(secs)
                    })
                    .collect()
            }
            other => Err(SeriesCacheError::DataLoading(format!(
                "Column '{}' has unsupported timestamp type {:?}",
                name, other
            ))),
        }
    }

    fn epoch_seconds(secs: i64) -> Result<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| SeriesCacheError::DataLoading(format!("Timestamp {} out of range", secs)))
    }

    fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Ok(dt.and_utc());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .ok_or_else(|| SeriesCacheError::DataLoading(format!("Unparseable timestamp '{}'", raw)))
    }
}
