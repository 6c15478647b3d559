// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::filter::TradeFilter;
use crate::group::{GroupOrder, group_by_account};
use crate::ledger::Ledger;
use crate::models::{FieldEdit, NewTrade, OptionType, TradeRecord};
use crate::sort::{SortDirection, SortField, sort_trades};
use crate::store::TradeStore;
use crate::utils::{
    filter_from_args, fmt_opt, maybe_print_json, parse_date, parse_decimal, pretty_table, today,
    yes_no,
};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub const TRADE_HEADERS: [&str; 13] = [
    "ID", "Ticker", "Account", "Type", "Status", "Contracts", "Cost", "Strike", "Traded",
    "Expires", "Realized", "Unrealized", "PMCC/ER%",
];

pub fn handle(conn: &Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    let ledger = Ledger::new(TradeStore::new(conn, owner));
    let sub_id = ledger
        .events()
        .subscribe(|change| tracing::info!(?change, "journal updated"));
    match m.subcommand() {
        Some(("add", sub)) => add(&ledger, sub)?,
        Some(("edit", sub)) => edit(&ledger, sub)?,
        Some(("close", sub)) => {
            let id = *sub.get_one::<i64>("ID").unwrap();
            let t = ledger.close(id, today())?;
            println!("Closed trade {} ({}) on {}", id, t.ticker, today());
        }
        Some(("reopen", sub)) => {
            let id = *sub.get_one::<i64>("ID").unwrap();
            let t = ledger.reopen(id)?;
            println!("Reopened trade {} ({})", id, t.ticker);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("ID").unwrap();
            ledger.delete(id)?;
            println!("Removed trade {}", id);
        }
        Some(("show", sub)) => show(&ledger, sub)?,
        Some(("list", sub)) => list(&ledger, sub)?,
        _ => {}
    }
    ledger.events().unsubscribe(sub_id);
    Ok(())
}

fn opt_decimal(sub: &clap::ArgMatches, id: &str) -> Result<Option<rust_decimal::Decimal>> {
    sub.get_one::<String>(id)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(parse_decimal)
        .transpose()
}

fn add(ledger: &Ledger<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let ticker = sub.get_one::<String>("ticker").unwrap().trim().to_string();
    let account = sub.get_one::<String>("account").unwrap().trim().to_string();
    let option_type = OptionType::resolve(
        sub.get_one::<String>("type").unwrap(),
        sub.get_one::<String>("custom_type").map(|s| s.as_str()),
    )?;
    let contracts = *sub.get_one::<i64>("contracts").unwrap();
    let cost = parse_decimal(sub.get_one::<String>("cost").unwrap())?;
    let strike = parse_decimal(sub.get_one::<String>("strike").unwrap())?;
    let entered = match sub.get_one::<String>("date") {
        Some(raw) => parse_date(raw)?,
        None => today(),
    };

    let mut t = NewTrade::open(&ticker, &account, option_type, contracts, cost, strike, entered);
    t.price_at_purchase = parse_decimal(sub.get_one::<String>("price_at_purchase").unwrap())?;
    t.expiration_date = sub
        .get_one::<String>("expiration")
        .map(|s| parse_date(s))
        .transpose()?;
    t.realized_pl = opt_decimal(sub, "realized_pl")?;
    t.unrealized_pl = opt_decimal(sub, "unrealized_pl")?;

    let id = ledger.open_trade(t, entered)?;
    let rec = ledger.store().get(id)?;
    println!(
        "Recorded trade {}: {} {} x{} @ {} ({})",
        id, rec.ticker, rec.option_type, rec.contracts, rec.strike_price, rec.account
    );
    if let Some(p) = rec.pmcc_calc {
        println!("PMCC break-even: {}", p.round_dp(4));
    }
    Ok(())
}

fn edit(ledger: &Ledger<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("ID").unwrap();
    let field = sub.get_one::<String>("field").unwrap();
    let value = sub.get_one::<String>("value").unwrap();
    let custom = sub.get_one::<String>("custom_type").map(|s| s.as_str());
    let edit = FieldEdit::parse(field, value, custom)
        .with_context(|| format!("Cannot edit trade {}", id))?;
    let rec = ledger.edit(id, edit)?;
    println!("Updated trade {} {} -> {}", id, field.trim(), value.trim());
    if rec.pmcc_calc.is_some() || rec.expected_return.is_some() {
        println!(
            "PMCC break-even: {}  Expected return: {}",
            fmt_opt(&rec.pmcc_calc),
            fmt_opt(&rec.expected_return)
        );
    }
    Ok(())
}

fn show(ledger: &Ledger<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("ID").unwrap();
    let t = ledger.store().get(id)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &t)? {
        return Ok(());
    }
    let rows = vec![
        vec!["Ticker".into(), t.ticker.clone()],
        vec!["Account".into(), t.account.clone()],
        vec!["Type".into(), t.option_type.to_string()],
        vec!["Status".into(), t.status.to_string()],
        vec!["Contracts".into(), t.contracts.to_string()],
        vec!["Cost".into(), t.cost.to_string()],
        vec!["Strike".into(), t.strike_price.to_string()],
        vec!["Price at purchase".into(), t.price_at_purchase.to_string()],
        vec!["Trading date".into(), t.trading_date.to_string()],
        vec![
            "Expiration".into(),
            t.expiration_date.map(|d| d.to_string()).unwrap_or_default(),
        ],
        vec![
            "Closed".into(),
            t.closed_date.map(|d| d.to_string()).unwrap_or_default(),
        ],
        vec!["Realized P&L".into(), fmt_opt(&t.realized_pl)],
        vec!["Unrealized P&L".into(), fmt_opt(&t.unrealized_pl)],
        vec!["PMCC break-even".into(), fmt_opt(&t.pmcc_calc)],
        vec!["Expected return %".into(), fmt_opt(&t.expected_return)],
        vec!["Audited".into(), yes_no(t.audited).into()],
        vec!["Exercised".into(), yes_no(t.exercised).into()],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

pub fn trade_row(t: &TradeRecord) -> Vec<String> {
    let derived = match (t.pmcc_calc, t.expected_return) {
        (Some(p), _) => p.round_dp(4).to_string(),
        (None, Some(er)) => format!("{}%", er.round_dp(2)),
        (None, None) => String::new(),
    };
    vec![
        t.id.to_string(),
        t.ticker.clone(),
        t.account.clone(),
        t.option_type.to_string(),
        t.status.to_string(),
        t.contracts.to_string(),
        t.cost.to_string(),
        t.strike_price.to_string(),
        t.trading_date.to_string(),
        t.expiration_date.map(|d| d.to_string()).unwrap_or_default(),
        fmt_opt(&t.realized_pl),
        fmt_opt(&t.unrealized_pl),
        derived,
    ]
}

/// Filtered and sorted trades for the `list` flags.
pub fn query_trades(
    ledger: &Ledger<'_>,
    sub: &clap::ArgMatches,
) -> Result<(TradeFilter, Vec<TradeRecord>)> {
    let filter = filter_from_args(sub)?;
    let field = SortField::parse(sub.get_one::<String>("sort").unwrap())?;
    let dir = SortDirection::from_desc(sub.get_flag("desc"));
    let all = ledger.trades()?;
    let rows = sort_trades(&filter.apply(&all), field, dir);
    Ok((filter, rows))
}

fn list(ledger: &Ledger<'_>, sub: &clap::ArgMatches) -> Result<()> {
    let (filter, rows) = query_trades(ledger, sub)?;
    let grouped = sub.get_flag("group");
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");

    if grouped {
        let groups = group_by_account(&rows, GroupOrder::AsGiven);
        if maybe_print_json(json_flag, jsonl_flag, &groups)? {
            return Ok(());
        }
        for g in groups {
            for (label, bucket) in [("open", &g.open), ("closed", &g.closed)] {
                if bucket.is_empty() {
                    continue;
                }
                println!("{} - {} ({})", g.account, label, bucket.len());
                println!(
                    "{}",
                    pretty_table(&TRADE_HEADERS, bucket.iter().map(trade_row).collect())
                );
            }
        }
    } else if !maybe_print_json(json_flag, jsonl_flag, &rows)? {
        println!(
            "{}",
            pretty_table(&TRADE_HEADERS, rows.iter().map(trade_row).collect())
        );
    }
    if !json_flag && !jsonl_flag {
        println!("{} trade(s), {} active filter(s)", rows.len(), filter.active_count());
    }
    Ok(())
}
