// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{JournalError, JournalResult};
use crate::ledger::Ledger;
use crate::models::{NewTrade, OTHER_LABEL, OptionType, TradeStatus, normalize_ticker, parse_flag};
use crate::store::TradeStore;
use crate::utils::parse_flexible_date;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::io::Read;

const REQUIRED: [&str; 9] = [
    "ticker",
    "account",
    "trading_date",
    "option_type",
    "status",
    "contracts",
    "cost",
    "strike_price",
    "price_at_purchase",
];

pub fn handle(conn: &Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("trades", sub)) => import_trades(conn, owner, sub),
        _ => Ok(()),
    }
}

fn import_trades(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let path = sub.get_one::<String>("path").unwrap().trim();
    let file = std::fs::File::open(path).with_context(|| format!("Open CSV {}", path))?;
    let trades = parse_trades(file).with_context(|| format!("Import of {} aborted", path))?;
    let ledger = Ledger::new(TradeStore::new(conn, owner));
    let n = ledger.import_batch(trades)?;
    println!("Imported {} trade(s) from {}", n, path);
    Ok(())
}

/// Column lookup by header name, tolerant of case and surrounding spaces.
struct Columns(HashMap<String, usize>);

impl Columns {
    fn get<'r>(&self, rec: &'r StringRecord, name: &str) -> Option<&'r str> {
        self.0
            .get(name)
            .and_then(|i| rec.get(*i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Validates every row before anything is written; the first bad row fails
/// the whole batch. Rows are numbered from 1, excluding the header.
pub fn parse_trades<R: Read>(input: R) -> JournalResult<Vec<NewTrade>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);
    let cols = Columns(
        rdr.headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_ascii_lowercase(), i))
            .collect(),
    );

    let mut out = Vec::new();
    for (idx, result) in rdr.records().enumerate() {
        let rec = result?;
        out.push(parse_row(&cols, &rec, idx + 1)?);
    }
    tracing::debug!(rows = out.len(), "import file validated");
    Ok(out)
}

fn bad(row: usize, field: &str, value: &str) -> JournalError {
    JournalError::ImportValue {
        row,
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn parse_row(cols: &Columns, rec: &StringRecord, row: usize) -> JournalResult<NewTrade> {
    let mut missing: Vec<String> = REQUIRED
        .iter()
        .filter(|f| cols.get(rec, f).is_none())
        .map(|f| f.to_string())
        .collect();

    let option_type = cols.get(rec, "option_type").map(|raw| {
        if raw.eq_ignore_ascii_case(OTHER_LABEL) {
            OptionType::resolve(raw, cols.get(rec, "custom_option_type"))
        } else {
            Ok(OptionType::from_label(raw))
        }
    });
    let known_type = matches!(&option_type, Some(Ok(t)) if !t.is_custom());
    if known_type && cols.get(rec, "expiration_date").is_none() {
        missing.push("expiration_date".into());
    }
    let status = cols.get(rec, "status").map(TradeStatus::parse);
    if matches!(status, Some(Ok(TradeStatus::Closed))) && cols.get(rec, "closed_date").is_none() {
        missing.push("closed_date".into());
    }
    if !missing.is_empty() {
        return Err(JournalError::ImportRow { row, missing });
    }

    let text = |name: &str| cols.get(rec, name).unwrap_or_default();
    let date = |name: &str| -> JournalResult<Option<NaiveDate>> {
        cols.get(rec, name)
            .map(|raw| parse_flexible_date(raw).ok_or_else(|| bad(row, name, raw)))
            .transpose()
    };
    let amount = |name: &str| -> JournalResult<Option<Decimal>> {
        cols.get(rec, name)
            .map(|raw| {
                raw.replace(['$', ','], "")
                    .parse::<Decimal>()
                    .map_err(|_| bad(row, name, raw))
            })
            .transpose()
    };
    let flag = |name: &str| -> JournalResult<bool> {
        let raw = text(name);
        parse_flag("flag", raw).map_err(|_| bad(row, name, raw))
    };

    let option_type = match option_type {
        Some(Ok(t)) => t,
        _ => return Err(bad(row, "option_type", text("option_type"))),
    };
    let status = match status {
        Some(Ok(s)) => s,
        _ => return Err(bad(row, "status", text("status"))),
    };
    let ticker = normalize_ticker(text("ticker")).map_err(|_| bad(row, "ticker", text("ticker")))?;
    let contracts = text("contracts")
        .parse::<i64>()
        .ok()
        .filter(|c| *c >= 1)
        .ok_or_else(|| bad(row, "contracts", text("contracts")))?;

    let t = NewTrade {
        ticker,
        account: text("account").to_string(),
        option_type,
        contracts,
        cost: amount("cost")?.unwrap_or_default(),
        strike_price: amount("strike_price")?.unwrap_or_default(),
        price_at_purchase: amount("price_at_purchase")?.unwrap_or_default(),
        trading_date: date("trading_date")?.ok_or_else(|| bad(row, "trading_date", ""))?,
        expiration_date: date("expiration_date")?,
        closed_date: match status {
            TradeStatus::Closed => date("closed_date")?,
            TradeStatus::Open => None,
        },
        status,
        realized_pl: amount("realized_pl")?,
        unrealized_pl: amount("unrealized_pl")?,
        pmcc_calc: None,
        expected_return: None,
        audited: flag("audited")?,
        exercised: flag("exercised")?,
    };
    if t.cost < Decimal::ZERO {
        return Err(bad(row, "cost", text("cost")));
    }
    if t.strike_price < Decimal::ZERO {
        return Err(bad(row, "strike_price", text("strike_price")));
    }
    Ok(t)
}
