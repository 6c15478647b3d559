// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{JournalError, JournalResult};

pub const DEFAULT_QUOTE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub ticker: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
}

pub trait QuoteProvider {
    fn quote(&self, ticker: &str) -> JournalResult<Quote>;
}

/// Quotes every ticker independently; one failure does not hide the others.
pub fn quote_all<P: QuoteProvider + ?Sized>(
    provider: &P,
    tickers: &[String],
) -> Vec<(String, JournalResult<Quote>)> {
    tickers
        .iter()
        .map(|t| {
            let res = provider.quote(t);
            if let Err(e) = &res {
                tracing::warn!(ticker = %t, error = %e, "quote failed");
            }
            (t.clone(), res)
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct YahooResponse {
    quoteResponse: QuoteResponse,
}
#[derive(Debug, Deserialize)]
struct QuoteResponse {
    result: Vec<YahooQuote>,
}
#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
    #[serde(rename = "regularMarketChange")]
    regular_market_change: Option<f64>,
    #[serde(rename = "regularMarketChangePercent")]
    regular_market_change_percent: Option<f64>,
    symbol: Option<String>,
}

pub struct YahooQuotes {
    client: reqwest::blocking::Client,
    url: String,
}

impl YahooQuotes {
    pub fn new(client: reqwest::blocking::Client, url: &str) -> Self {
        YahooQuotes {
            client,
            url: url.to_string(),
        }
    }
}

fn to_decimal(ticker: &str, v: Option<f64>, what: &str) -> JournalResult<Decimal> {
    v.and_then(Decimal::from_f64_retain)
        .map(|d| d.round_dp(4))
        .ok_or_else(|| JournalError::Quote {
            ticker: ticker.to_string(),
            message: format!("no {} in response", what),
        })
}

impl QuoteProvider for YahooQuotes {
    fn quote(&self, ticker: &str) -> JournalResult<Quote> {
        tracing::debug!(ticker, "fetching quote");
        let resp = self
            .client
            .get(&self.url)
            .query(&[("symbols", ticker)])
            .send()?
            .error_for_status()?;
        let yr: YahooResponse = resp.json()?;
        let q = yr
            .quoteResponse
            .result
            .into_iter()
            .find(|q| q.symbol.as_deref().is_some_and(|s| s.eq_ignore_ascii_case(ticker)))
            .ok_or_else(|| JournalError::Quote {
                ticker: ticker.to_string(),
                message: "symbol not in response".into(),
            })?;
        Ok(Quote {
            ticker: ticker.to_string(),
            price: to_decimal(ticker, q.regular_market_price, "price")?,
            change: to_decimal(ticker, q.regular_market_change.or(Some(0.0)), "change")?,
            change_percent: to_decimal(
                ticker,
                q.regular_market_change_percent.or(Some(0.0)),
                "change percent",
            )?,
        })
    }
}
