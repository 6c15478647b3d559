// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::kv::{KvStore, SAVED_ACCOUNTS, WATCHLIST};
use crate::models::normalize_ticker;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle_watchlist(conn: &Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    handle_list(conn, owner, m, WATCHLIST, "Ticker", |raw| {
        Ok(normalize_ticker(raw)?)
    })
}

pub fn handle_accounts(conn: &Connection, owner: &str, m: &clap::ArgMatches) -> Result<()> {
    handle_list(conn, owner, m, SAVED_ACCOUNTS, "Account", |raw| {
        Ok(raw.trim().to_string())
    })
}

fn handle_list(
    conn: &Connection,
    owner: &str,
    m: &clap::ArgMatches,
    key: &str,
    label: &str,
    normalize: impl Fn(&str) -> Result<String>,
) -> Result<()> {
    let kv = KvStore::new(conn, owner);
    match m.subcommand() {
        Some(("add", sub)) => {
            let v = normalize(sub.get_one::<String>("value").unwrap())?;
            if kv.list_add(key, &v)? {
                println!("Added {} '{}'", label.to_lowercase(), v);
            } else {
                println!("'{}' already saved", v);
            }
        }
        Some(("rm", sub)) => {
            let v = normalize(sub.get_one::<String>("value").unwrap())?;
            if kv.list_remove(key, &v)? {
                println!("Removed {} '{}'", label.to_lowercase(), v);
            } else {
                println!("'{}' was not saved", v);
            }
        }
        Some(("list", _)) => {
            let rows = kv.list(key)?.into_iter().map(|v| vec![v]).collect();
            println!("{}", pretty_table(&[label], rows));
        }
        _ => {}
    }
    Ok(())
}
