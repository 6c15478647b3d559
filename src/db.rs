// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Optjournal", "optjournal"));

pub const DB_ENV: &str = "OPTJOURNAL_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("optjournal.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    tracing::debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS trades(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id TEXT NOT NULL,
        ticker TEXT NOT NULL,
        account TEXT NOT NULL,
        option_type TEXT NOT NULL,
        contracts INTEGER NOT NULL CHECK(contracts >= 1),
        cost TEXT NOT NULL DEFAULT '0',
        strike_price TEXT NOT NULL DEFAULT '0',
        price_at_purchase TEXT NOT NULL DEFAULT '0',
        trading_date TEXT NOT NULL,
        expiration_date TEXT,
        closed_date TEXT,
        status TEXT NOT NULL CHECK(status IN ('open','closed')),
        realized_pl TEXT,
        unrealized_pl TEXT,
        pmcc_calc TEXT,
        expected_return TEXT,
        audited INTEGER NOT NULL DEFAULT 0,
        exercised INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_trades_owner ON trades(owner_id, trading_date);

    -- small per-owner values: saved accounts, watchlist, shared feed
    CREATE TABLE IF NOT EXISTS kv(
        owner_id TEXT NOT NULL,
        key TEXT NOT NULL,
        value TEXT NOT NULL,
        PRIMARY KEY(owner_id, key)
    );
    "#,
    )?;
    Ok(())
}
