// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

use crate::filter::{Range, TradeFilter, unconstrained};
use crate::models::{OptionType, TradeStatus, parse_flag};
use crate::quotes::DEFAULT_QUOTE_URL;

const UA: &str = concat!("optjournal/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_USER: &str = "default";

pub fn http_client(timeout_secs: u64) -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Accepts `YYYY-MM-DD` or US-style `MM/DD/YYYY`.
pub fn parse_flexible_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .ok()
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn fmt_opt(d: &Option<Decimal>) -> String {
    d.map(|v| v.normalize().to_string()).unwrap_or_default()
}

pub fn yes_no(b: bool) -> &'static str {
    if b { "Yes" } else { "No" }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// `--user` wins, then the `default_user` setting, then `default`.
pub fn current_owner(conn: &Connection, m: &clap::ArgMatches) -> Result<String> {
    if let Some(u) = m.get_one::<String>("user").map(|s| s.trim()).filter(|s| !s.is_empty()) {
        return Ok(u.to_string());
    }
    Ok(get_setting(conn, "default_user")?.unwrap_or_else(|| DEFAULT_USER.to_string()))
}

pub fn quote_url(conn: &Connection) -> Result<String> {
    Ok(get_setting(conn, "quote_url")?.unwrap_or_else(|| DEFAULT_QUOTE_URL.to_string()))
}

pub fn quote_timeout_secs(conn: &Connection) -> Result<u64> {
    match get_setting(conn, "quote_timeout_secs")? {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("Invalid quote_timeout_secs '{}'", raw)),
        None => Ok(15),
    }
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

fn arg<'a>(m: &'a clap::ArgMatches, id: &str) -> Option<&'a str> {
    unconstrained(m.get_one::<String>(id).map(|s| s.as_str()))
}

fn dec_range(m: &clap::ArgMatches, min: &str, max: &str) -> Result<Range<Decimal>> {
    let lo = arg(m, min).map(parse_decimal).transpose()?;
    let hi = arg(m, max).map(parse_decimal).transpose()?;
    Ok(Range::new(lo, hi))
}

fn date_range(m: &clap::ArgMatches, from: &str, to: &str) -> Result<Range<NaiveDate>> {
    let lo = arg(m, from).map(parse_date).transpose()?;
    let hi = arg(m, to).map(parse_date).transpose()?;
    Ok(Range::new(lo, hi))
}

/// Builds a filter from the shared `--status/--ticker/--min-cost/...` flags.
pub fn filter_from_args(m: &clap::ArgMatches) -> Result<TradeFilter> {
    Ok(TradeFilter {
        status: arg(m, "status").map(TradeStatus::parse).transpose()?,
        account: arg(m, "account").map(str::to_string),
        option_type: arg(m, "type").map(OptionType::from_label),
        audited: arg(m, "audited")
            .map(|v| parse_flag("audited", v))
            .transpose()?,
        exercised: arg(m, "exercised")
            .map(|v| parse_flag("exercised", v))
            .transpose()?,
        ticker: arg(m, "ticker").map(str::to_string),
        strike_price: dec_range(m, "min_strike", "max_strike")?,
        cost: dec_range(m, "min_cost", "max_cost")?,
        realized_pl: dec_range(m, "min_realized", "max_realized")?,
        unrealized_pl: dec_range(m, "min_unrealized", "max_unrealized")?,
        trading_date: date_range(m, "from", "to")?,
        expiration_date: date_range(m, "expires_from", "expires_to")?,
        closed_date: date_range(m, "closed_from", "closed_to")?,
    })
}
