// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{get_setting, pretty_table, set_setting};
use anyhow::{Result, anyhow};
use rusqlite::Connection;

pub const KNOWN_KEYS: [&str; 3] = ["default_user", "quote_url", "quote_timeout_secs"];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("KEY").unwrap().trim();
            match get_setting(conn, key)? {
                Some(v) => println!("{}", v),
                None => println!("{} is not set", key),
            }
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("KEY").unwrap().trim();
            let value = sub.get_one::<String>("VALUE").unwrap().trim();
            if !KNOWN_KEYS.contains(&key) {
                return Err(anyhow!(
                    "Unknown setting '{}' (known: {})",
                    key,
                    KNOWN_KEYS.join(", ")
                ));
            }
            if key == "quote_timeout_secs" {
                value
                    .parse::<u64>()
                    .map_err(|_| anyhow!("quote_timeout_secs must be a whole number of seconds"))?;
            }
            set_setting(conn, key, value)?;
            println!("{} = {}", key, value);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare("SELECT key, value FROM settings ORDER BY key")?;
            let rows = stmt.query_map([], |r| Ok(vec![r.get::<_, String>(0)?, r.get(1)?]))?;
            let mut data = Vec::new();
            for row in rows {
                data.push(row?);
            }
            println!("{}", pretty_table(&["Key", "Value"], data));
        }
        _ => {}
    }
    Ok(())
}
