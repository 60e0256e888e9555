//! Daily price points, series and the reporting date range.

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::ticker::Ticker;

/// Days back from today to the first day of the default range.
pub const LOOKBACK_DAYS: i64 = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Daily points for one ticker, ascending by date. Empty means "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    pub ticker: Ticker,
    pub points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Sorts `points` ascending by date.
    pub fn new(ticker: Ticker, mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        Self { ticker, points }
    }

    pub fn empty(ticker: Ticker) -> Self {
        Self {
            ticker,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }
}

/// Inclusive `[start, end]` range of trading days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Returns `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// `[today - 30d, today - 1d]`; today's incomplete session is excluded.
    pub fn trailing(today: NaiveDate) -> Self {
        Self {
            start: today - Duration::days(LOOKBACK_DAYS),
            end: today - Duration::days(1),
        }
    }

    /// [`DateRange::trailing`] anchored on the current UTC date.
    pub fn trailing_from_now() -> Self {
        Self::trailing(Utc::now().date_naive())
    }

    pub fn start_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start_str(), self.end_str())
    }
}
