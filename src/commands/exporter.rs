// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::TradeRecord;
use crate::sort::default_display_order;
use crate::store::TradeStore;
use crate::utils::{filter_from_args, fmt_opt, yes_no};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde_json::json;
use std::io::Write;

pub const EXPORT_HEADERS: [&str; 17] = [
    "ticker",
    "account",
    "trading_date",
    "option_type",
    "expiration_date",
    "status",
    "contracts",
    "cost",
    "strike_price",
    "price_at_purchase",
    "realized_pl",
    "unrealized_pl",
    "audited",
    "exercised",
    "closed_date",
    "pmcc_calc",
    "expected_return",
];

pub fn handle(conn: &Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trades", sub)) => export_trades(conn, owner, sub),
        _ => Ok(()),
    }
}

fn export_trades(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().trim().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        return Err(anyhow!("Unknown format: {} (use csv|json)", fmt));
    }

    let filter = filter_from_args(sub)?;
    let trades = default_display_order(&filter.apply(&TradeStore::new(conn, owner).list()?));

    match fmt.as_str() {
        "csv" => {
            let file = std::fs::File::create(out)?;
            write_csv(file, &trades)?;
        }
        _ => {
            let items: Vec<_> = trades.iter().map(export_json).collect();
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
    }
    tracing::info!(count = trades.len(), path = %out, "trades exported");
    println!("Exported {} trade(s) to {}", trades.len(), out);
    Ok(())
}

fn date(d: Option<chrono::NaiveDate>) -> String {
    d.map(|d| d.to_string()).unwrap_or_default()
}

pub fn export_row(t: &TradeRecord) -> Vec<String> {
    vec![
        t.ticker.clone(),
        t.account.clone(),
        t.trading_date.to_string(),
        t.option_type.to_string(),
        date(t.expiration_date),
        t.status.to_string(),
        t.contracts.to_string(),
        t.cost.to_string(),
        t.strike_price.to_string(),
        t.price_at_purchase.to_string(),
        fmt_opt(&t.realized_pl),
        fmt_opt(&t.unrealized_pl),
        yes_no(t.audited).to_string(),
        yes_no(t.exercised).to_string(),
        date(t.closed_date),
        fmt_opt(&t.pmcc_calc),
        fmt_opt(&t.expected_return),
    ]
}

pub fn write_csv<W: Write>(w: W, trades: &[TradeRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(w);
    wtr.write_record(EXPORT_HEADERS)?;
    for t in trades {
        wtr.write_record(export_row(t))?;
    }
    wtr.flush()?;
    Ok(())
}

fn export_json(t: &TradeRecord) -> serde_json::Value {
    json!({
        "ticker": t.ticker,
        "account": t.account,
        "trading_date": t.trading_date,
        "option_type": t.option_type,
        "expiration_date": t.expiration_date,
        "status": t.status,
        "contracts": t.contracts,
        "cost": t.cost.to_string(),
        "strike_price": t.strike_price.to_string(),
        "price_at_purchase": t.price_at_purchase.to_string(),
        "realized_pl": t.realized_pl.map(|d| d.to_string()),
        "unrealized_pl": t.unrealized_pl.map(|d| d.to_string()),
        "audited": yes_no(t.audited),
        "exercised": yes_no(t.exercised),
        "closed_date": t.closed_date,
        "pmcc_calc": t.pmcc_calc.map(|d| d.to_string()),
        "expected_return": t.expected_return.map(|d| d.to_string()),
    })
}
