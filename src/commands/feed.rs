// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::trades::trade_row;
use crate::kv::{KvStore, SHARED_FEED};
use crate::store::TradeStore;
use crate::utils::{maybe_print_json, pretty_table, today};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    let kv = KvStore::new(conn, owner);
    match m.subcommand() {
        Some(("share", sub)) => {
            let id = *sub.get_one::<i64>("ID").unwrap();
            let trade = TradeStore::new(conn, owner).get(id)?;
            kv.share(&trade, today())?;
            println!("Shared trade {} ({})", id, trade.ticker);
        }
        Some(("list", sub)) => {
            let feed = kv.feed()?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &feed)? {
                let rows = feed
                    .iter()
                    .map(|s| {
                        let mut row = vec![s.shared_on.to_string()];
                        row.extend(trade_row(&s.trade));
                        row
                    })
                    .collect();
                let mut headers = vec!["Shared"];
                headers.extend(crate::commands::trades::TRADE_HEADERS);
                println!("{}", pretty_table(&headers, rows));
            }
        }
        Some(("clear", _)) => {
            kv.delete(SHARED_FEED)?;
            println!("Cleared shared feed");
        }
        _ => {}
    }
    Ok(())
}
