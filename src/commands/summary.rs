// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::aggregate::{Summary, summarize};
use crate::group::{GroupOrder, group_by_account};
use crate::store::TradeStore;
use crate::utils::{filter_from_args, fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Serialize)]
pub struct AccountSummary {
    pub account: String,
    #[serde(flatten)]
    pub summary: Summary,
}

/// Totals for the filtered trades, optionally one row per account.
pub fn compute(
    conn: &Connection,
    owner: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<AccountSummary>> {
    let filter = filter_from_args(sub)?;
    let trades = filter.apply(&TradeStore::new(conn, owner).list()?);
    if sub.get_flag("by_account") {
        return Ok(group_by_account(&trades, GroupOrder::AsGiven)
            .into_iter()
            .map(|g| AccountSummary {
                summary: summarize(&g.trades().cloned().collect::<Vec<_>>()),
                account: g.account,
            })
            .collect());
    }
    Ok(vec![AccountSummary {
        account: "All".into(),
        summary: summarize(&trades),
    }])
}

pub fn handle(conn: &Connection, owner: &str, sub: &clap::ArgMatches) -> Result<()> {
    let data = compute(conn, owner, sub)?;
    if maybe_print_json(sub.get_flag("json"), false, &data)? {
        return Ok(());
    }
    let rows = data
        .iter()
        .map(|a| {
            let s = &a.summary;
            vec![
                a.account.clone(),
                s.total_trades.to_string(),
                fmt_money(&s.total_cost),
                fmt_money(&s.total_realized_pl),
                fmt_money(&s.total_unrealized_pl),
                fmt_money(&s.overall_pl),
                fmt_money(&s.total_dollars_traded),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Account",
                "Trades",
                "Total Cost",
                "Realized",
                "Unrealized",
                "Overall P&L",
                "Dollars Traded",
            ],
            rows,
        )
    );
    Ok(())
}
