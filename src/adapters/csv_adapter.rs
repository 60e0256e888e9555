//! Offline price data from local CSV files.
//!
//! Each ticker lives in `{base_path}/{TICKER}.csv` with the header
//! `date,open,high,low,close,volume`. Rows outside the requested range are
//! skipped.

use crate::domain::error::{PipelineError, Upstream};
use crate::domain::price::{DateRange, PricePoint, PriceSeries};
use crate::domain::ticker::Ticker;
use crate::ports::price_port::PricePort;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &Ticker) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }

    /// Tickers with a CSV file in the data directory, sorted.
    pub fn list_symbols(&self) -> Result<Vec<String>, PipelineError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| {
            PipelineError::unavailable(
                Upstream::PriceData,
                format!("failed to read directory {}: {}", self.base_path.display(), e),
            )
        })?;

        let mut symbols: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let name = entry.file_name().to_string_lossy().into_owned();
                name.strip_suffix(".csv").map(str::to_string)
            })
            .collect();
        symbols.sort();
        Ok(symbols)
    }

    fn read_series(&self, ticker: &Ticker, range: &DateRange) -> Result<PriceSeries, PipelineError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| {
            PipelineError::unavailable(
                Upstream::PriceData,
                format!("failed to read {}: {}", path.display(), e),
            )
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut points = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| malformed(format!("CSV parse error: {e}")))?;

            let date_str = record.get(0).ok_or_else(|| malformed("missing date column"))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| malformed(format!("invalid date format: {e}")))?;

            if date < range.start || date > range.end {
                continue;
            }

            points.push(PricePoint {
                date,
                open: column(&record, 1, "open")?,
                high: column(&record, 2, "high")?,
                low: column(&record, 3, "low")?,
                close: column(&record, 4, "close")?,
                volume: column(&record, 5, "volume")?,
            });
        }

        Ok(PriceSeries::new(ticker.clone(), points))
    }
}

fn malformed(reason: impl Into<String>) -> PipelineError {
    PipelineError::malformed(Upstream::PriceData, reason)
}

fn column(record: &csv::StringRecord, index: usize, name: &str) -> Result<f64, PipelineError> {
    record
        .get(index)
        .ok_or_else(|| malformed(format!("missing {name} column")))?
        .trim()
        .parse()
        .map_err(|e| malformed(format!("invalid {name} value: {e}")))
}

#[async_trait]
impl PricePort for CsvAdapter {
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        range: &DateRange,
    ) -> Result<PriceSeries, PipelineError> {
        self.read_series(ticker, range)
    }
}
