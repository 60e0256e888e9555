//! Polygon.io daily aggregates client.
//!
//! See: https://polygon.io/docs/stocks/get_v2_aggs_ticker__stocksticker__range__multiplier___timespan___from___to

use async_trait::async_trait;
use chrono::DateTime;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::adapters::http_client::normalize_base_url;
use crate::domain::error::{PipelineError, StockbriefError, Upstream};
use crate::domain::price::{DateRange, PricePoint, PriceSeries};
use crate::domain::ticker::Ticker;
use crate::ports::config_port::{require, ConfigPort};
use crate::ports::price_port::PricePort;

pub const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

/// One aggregate bar as Polygon (and the proxy server) encodes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBar {
    pub o: f64,
    pub h: f64,
    pub l: f64,
    pub c: f64,
    pub v: f64,
    /// Start of the bar, epoch milliseconds.
    pub t: i64,
}

impl AggregateBar {
    pub fn to_point(&self) -> Result<PricePoint, PipelineError> {
        let date = DateTime::from_timestamp_millis(self.t)
            .map(|d| d.date_naive())
            .ok_or_else(|| {
                PipelineError::malformed(Upstream::PriceData, format!("invalid timestamp {}", self.t))
            })?;
        Ok(PricePoint {
            date,
            open: self.o,
            high: self.h,
            low: self.l,
            close: self.c,
            volume: self.v,
        })
    }
}

impl From<&PricePoint> for AggregateBar {
    fn from(p: &PricePoint) -> Self {
        let t = p
            .date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        Self {
            o: p.open,
            h: p.high,
            l: p.low,
            c: p.close,
            v: p.volume,
            t,
        }
    }
}

/// Aggregates payload in the shape the proxy server returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatesPayload {
    pub ticker: Ticker,
    pub results_count: usize,
    pub results: Vec<AggregateBar>,
}

impl From<&PriceSeries> for AggregatesPayload {
    fn from(series: &PriceSeries) -> Self {
        Self {
            ticker: series.ticker.clone(),
            results_count: series.len(),
            results: series.points.iter().map(AggregateBar::from).collect(),
        }
    }
}

/// Decode an aggregates body into a series.
///
/// Absent, null or non-array `results` is an empty series. A body that is not
/// JSON, or a bar that does not decode, is malformed.
pub fn parse_aggregates(ticker: &Ticker, body: &str) -> Result<PriceSeries, PipelineError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        PipelineError::malformed(Upstream::PriceData, format!("invalid JSON: {e}"))
    })?;
    series_from_value(ticker, &value)
}

/// [`parse_aggregates`] for an already decoded payload.
pub fn series_from_value(
    ticker: &Ticker,
    value: &serde_json::Value,
) -> Result<PriceSeries, PipelineError> {
    let Some(results) = value.get("results").and_then(|r| r.as_array()) else {
        return Ok(PriceSeries::empty(ticker.clone()));
    };

    let points = results
        .iter()
        .map(|raw| {
            AggregateBar::deserialize(raw)
                .map_err(|e| PipelineError::malformed(Upstream::PriceData, format!("bad bar: {e}")))
                .and_then(|bar| bar.to_point())
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PriceSeries::new(ticker.clone(), points))
}

pub struct PolygonAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PolygonAdapter {
    pub fn new(client: Client, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: normalize_base_url(base_url),
            api_key: api_key.into(),
        }
    }

    /// `[polygon] api_key` is required; `base_url` defaults to the public API.
    pub fn from_config(config: &dyn ConfigPort, client: Client) -> Result<Self, StockbriefError> {
        let api_key = require(config, "polygon", "api_key")?;
        let base_url = config
            .get_non_empty("polygon", "base_url")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(client, &base_url, api_key))
    }

    fn aggregates_url(&self, ticker: &Ticker, range: &DateRange) -> String {
        format!(
            "{}/v2/aggs/ticker/{}/range/1/day/{}/{}",
            self.base_url,
            ticker,
            range.start_str(),
            range.end_str()
        )
    }
}

#[async_trait]
impl PricePort for PolygonAdapter {
    #[instrument(skip(self, range), fields(ticker = %ticker))]
    async fn fetch_series(
        &self,
        ticker: &Ticker,
        range: &DateRange,
    ) -> Result<PriceSeries, PipelineError> {
        debug!(%range, "requesting daily aggregates");

        let response = self
            .client
            .get(self.aggregates_url(ticker, range))
            .query(&[
                ("adjusted", "true"),
                ("sort", "asc"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::unavailable(Upstream::PriceData, e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::unavailable(
                Upstream::PriceData,
                format!("HTTP {status}"),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| PipelineError::unavailable(Upstream::PriceData, e.without_url().to_string()))?;

        let series = parse_aggregates(ticker, &body)?;
        debug!(points = series.len(), "decoded aggregates");
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;
    use chrono::NaiveDate;

    fn aapl() -> Ticker {
        Ticker::new("AAPL").unwrap()
    }

    #[test]
    fn parses_results_in_date_order() {
        // 2024-03-01 and 2024-02-29 at 05:00 UTC, out of order.
        let body = r#"{
            "ticker": "AAPL",
            "resultsCount": 2,
            "results": [
                {"o": 179.5, "h": 180.5, "l": 177.4, "c": 179.7, "v": 73488997, "t": 1709269200000},
                {"o": 181.3, "h": 182.5, "l": 179.1, "c": 180.7, "v": 136682597, "t": 1709182800000}
            ]
        }"#;
        let series = parse_aggregates(&aapl(), body).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points[0].date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(series.points[1].close, 179.7);
        assert_eq!(series.points[1].volume, 73_488_997.0);
    }

    #[test]
    fn missing_or_null_results_is_empty() {
        for body in [
            r#"{"ticker":"AAPL","resultsCount":0}"#,
            r#"{"results":null}"#,
            r#"{"results":"none"}"#,
            r#"{"results":[]}"#,
        ] {
            let series = parse_aggregates(&aapl(), body).unwrap();
            assert!(series.is_empty(), "{body}");
        }
    }

    #[test]
    fn undecodable_bar_is_malformed() {
        let body = r#"{"results":[{"o":1,"h":1,"l":1,"c":"x","v":1,"t":0}]}"#;
        let err = parse_aggregates(&aapl(), body).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedResponse { .. }));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let err = parse_aggregates(&aapl(), "<html>oops</html>").unwrap_err();
        assert!(matches!(err, PipelineError::MalformedResponse { .. }));
    }

    #[test]
    fn bar_roundtrips_through_point() {
        let point = PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
            volume: 10.0,
        };
        let bar = AggregateBar::from(&point);
        assert_eq!(bar.to_point().unwrap(), point);
    }

    #[test]
    fn url_includes_range_and_ticker() {
        let adapter = PolygonAdapter::new(Client::new(), "http://localhost:9/", "k");
        let range = DateRange::trailing(NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());
        assert_eq!(
            adapter.aggregates_url(&aapl(), &range),
            "http://localhost:9/v2/aggs/ticker/AAPL/range/1/day/2024-03-01/2024-03-30"
        );
    }

    #[test]
    fn from_config_requires_api_key() {
        let config = FileConfigAdapter::from_string("[polygon]\nbase_url = http://x\n").unwrap();
        let err = PolygonAdapter::from_config(&config, Client::new()).err().unwrap();
        assert!(matches!(err, StockbriefError::ConfigMissing { .. }));

        let config = FileConfigAdapter::from_string("[polygon]\napi_key = k\n").unwrap();
        let adapter = PolygonAdapter::from_config(&config, Client::new()).unwrap();
        assert_eq!(adapter.base_url, DEFAULT_BASE_URL);
    }
}
