//! Summary statistics derived from a price series.

use serde::{Deserialize, Serialize};

use super::price::PriceSeries;

/// Placeholder shown wherever a metric is unavailable.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    /// Close of the first day; the open is ignored to skip intraday noise.
    pub open_price: f64,
    /// Close of the last day.
    pub close_price: f64,
    pub period_high: f64,
    pub period_low: f64,
    pub avg_volume: f64,
    /// `close_price - open_price`, rounded to 2 decimals.
    pub price_change: f64,
    /// Percent move from `open_price` to `close_price`, rounded to 2 decimals.
    pub percent_change: f64,
    pub trading_days: usize,
}

impl DerivedMetrics {
    /// Derive metrics from `series`; `None` when the series is empty.
    pub fn derive(series: &PriceSeries) -> Option<Self> {
        let first = series.first()?;
        let last = series.last()?;

        let open_price = first.close;
        let close_price = last.close;

        let period_high = series
            .points
            .iter()
            .map(|p| p.high)
            .fold(f64::NEG_INFINITY, f64::max);
        let period_low = series
            .points
            .iter()
            .map(|p| p.low)
            .fold(f64::INFINITY, f64::min);

        let trading_days = series.len();
        let avg_volume = series.points.iter().map(|p| p.volume).sum::<f64>() / trading_days as f64;

        let change = close_price - open_price;
        let percent_change = if open_price != 0.0 && open_price.is_finite() {
            round2(change / open_price * 100.0)
        } else {
            0.0
        };

        Some(Self {
            open_price,
            close_price,
            period_high,
            period_low,
            avg_volume,
            price_change: round2(change),
            percent_change,
            trading_days,
        })
    }

    pub fn percent_change_display(&self) -> String {
        format_percent(self.percent_change)
    }

    pub fn price_change_display(&self) -> String {
        format_signed(self.price_change)
    }
}

/// Round to 2 decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `+10.00%` for non-negative values, `-3.25%` otherwise.
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_signed(value))
}

/// Sign-prefixed with 2 decimals; zero (including `-0.0`) renders as `+0.00`.
pub fn format_signed(value: f64) -> String {
    let value = round2(value);
    if value >= 0.0 {
        format!("+{:.2}", value.abs())
    } else {
        format!("{value:.2}")
    }
}

pub fn format_price(value: f64) -> String {
    format!("${value:.2}")
}

/// Whole number with thousands separators, e.g. `52,164,500`.
pub fn format_volume(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
