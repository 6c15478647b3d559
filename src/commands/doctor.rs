// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::calc::pmcc_break_even;
use crate::models::{TradeRecord, TradeStatus};
use crate::store::TradeStore;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

/// Problems found in stored trades, as (issue, detail) pairs.
pub fn check(trades: &[TradeRecord]) -> Vec<(String, String)> {
    let mut issues = Vec::new();
    for t in trades {
        let who = format!("#{} {}", t.id, t.ticker);
        if t.contracts < 1 {
            issues.push(("bad_contracts".into(), format!("{} has {} contracts", who, t.contracts)));
        }
        match (t.status, t.closed_date) {
            (TradeStatus::Closed, None) => {
                issues.push(("closed_without_date".into(), who.clone()));
            }
            (TradeStatus::Open, Some(d)) => {
                issues.push(("open_with_closed_date".into(), format!("{} closed {}", who, d)));
            }
            _ => {}
        }
        let expected = pmcc_break_even(&t.option_type, t.contracts, t.cost, t.strike_price);
        if expected != t.pmcc_calc {
            issues.push((
                "stale_pmcc".into(),
                format!(
                    "{} stored {:?}, expected {:?}",
                    who,
                    t.pmcc_calc.map(|d| d.normalize().to_string()),
                    expected.map(|d| d.normalize().to_string())
                ),
            ));
        }
        if !t.option_type.is_custom() && t.expiration_date.is_none() {
            issues.push(("missing_expiration".into(), who));
        }
    }
    issues
}

pub fn handle(conn: &Connection, owner: &str) -> Result<()> {
    let trades = TradeStore::new(conn, owner).list()?;
    let rows: Vec<Vec<String>> = check(&trades)
        .into_iter()
        .map(|(issue, detail)| vec![issue, detail])
        .collect();

    if rows.is_empty() {
        println!("doctor: no issues found in {} trade(s)", trades.len());
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
