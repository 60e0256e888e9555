//! Ticker symbols and the bounded selection set.
//!
//! A [`TickerSet`] holds at most [`TickerSet::CAPACITY`] distinct, normalized
//! symbols in insertion order. Capacity and duplicates are policy: mutators
//! report whether they changed anything instead of failing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A normalized (trimmed, uppercase) stock symbol.
///
/// Symbols are 1 to [`Ticker::MAX_LEN`] characters of `A-Z`, `0-9`, `.` and
/// `-`, starting with a letter or digit. They are used verbatim in upstream
/// URL paths and file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    pub const MAX_LEN: usize = 10;

    /// Normalize `raw`; `None` when it is blank or not a valid symbol.
    pub fn new(raw: &str) -> Option<Self> {
        let symbol = raw.trim().to_uppercase();
        let mut chars = symbol.chars();
        let valid = symbol.len() <= Self::MAX_LEN
            && chars
                .next()
                .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
            && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '.' || c == '-');
        valid.then_some(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Ticker {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Ticker::new(&raw).ok_or_else(|| format!("invalid ticker symbol '{raw}'"))
    }
}

impl From<Ticker> for String {
    fn from(ticker: Ticker) -> Self {
        ticker.0
    }
}

impl AsRef<str> for Ticker {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerSet {
    tickers: Vec<Ticker>,
}

impl TickerSet {
    pub const CAPACITY: usize = 3;

    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from raw symbols, keeping the first `CAPACITY` distinct ones.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for symbol in symbols {
            set.add(symbol.as_ref());
        }
        set
    }

    /// Normalize and append `symbol`. Returns `true` only if it was inserted.
    pub fn add(&mut self, symbol: &str) -> bool {
        let Some(ticker) = Ticker::new(symbol) else {
            return false;
        };
        if self.is_full() || self.tickers.contains(&ticker) {
            return false;
        }
        self.tickers.push(ticker);
        true
    }

    /// Remove an exact match. Returns `true` if something was removed.
    pub fn remove(&mut self, symbol: &str) -> bool {
        let before = self.tickers.len();
        self.tickers.retain(|t| t.as_str() != symbol);
        self.tickers.len() != before
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.tickers.iter().any(|t| t.as_str() == symbol)
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tickers.len() >= Self::CAPACITY
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ticker> {
        self.tickers.iter()
    }

    pub fn as_slice(&self) -> &[Ticker] {
        &self.tickers
    }
}

impl<'a> IntoIterator for &'a TickerSet {
    type Item = &'a Ticker;
    type IntoIter = std::slice::Iter<'a, Ticker>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Split a comma or whitespace separated symbol list, dropping empty tokens.
///
/// Normalization and deduplication are left to [`TickerSet::add`].
pub fn parse_symbols(input: &str) -> Vec<String> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
