// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::kv::{KvStore, WATCHLIST};
use crate::models::normalize_ticker;
use crate::quotes::{QuoteProvider, YahooQuotes, quote_all};
use crate::utils::{http_client, maybe_print_json, pretty_table, quote_timeout_secs, quote_url};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;

#[derive(Serialize)]
pub struct QuoteRow {
    pub ticker: String,
    pub price: Option<String>,
    pub change: Option<String>,
    pub change_percent: Option<String>,
    pub error: Option<String>,
}

pub fn handle(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let mut tickers = Vec::new();
    if let Some(vals) = sub.get_many::<String>("TICKERS") {
        for v in vals {
            tickers.push(normalize_ticker(v)?);
        }
    }
    if sub.get_flag("watchlist") {
        for t in KvStore::new(conn, owner).list(WATCHLIST)? {
            if !tickers.contains(&t) {
                tickers.push(t);
            }
        }
    }
    if tickers.is_empty() {
        return Err(anyhow!("No tickers given (pass tickers or --watchlist)"));
    }

    let provider = YahooQuotes::new(http_client(quote_timeout_secs(conn)?)?, &quote_url(conn)?);
    let rows = quote_rows(&provider, &tickers);
    if maybe_print_json(sub.get_flag("json"), false, &rows)? {
        return Ok(());
    }
    let table = rows
        .into_iter()
        .map(|r| {
            vec![
                r.ticker,
                r.price.unwrap_or_default(),
                r.change.unwrap_or_default(),
                r.change_percent.map(|p| format!("{}%", p)).unwrap_or_default(),
                r.error.unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Ticker", "Price", "Change", "Change %", "Error"], table)
    );
    Ok(())
}

pub fn quote_rows<P: QuoteProvider + ?Sized>(provider: &P, tickers: &[String]) -> Vec<QuoteRow> {
    quote_all(provider, tickers)
        .into_iter()
        .map(|(ticker, res)| match res {
            Ok(q) => QuoteRow {
                ticker,
                price: Some(q.price.round_dp(2).to_string()),
                change: Some(q.change.round_dp(2).to_string()),
                change_percent: Some(q.change_percent.round_dp(2).to_string()),
                error: None,
            },
            Err(e) => QuoteRow {
                ticker,
                price: None,
                change: None,
                change_percent: None,
                error: Some(e.to_string()),
            },
        })
        .collect()
}
