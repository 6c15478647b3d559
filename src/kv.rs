// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::JournalResult;
use crate::models::TradeRecord;

pub const SAVED_ACCOUNTS: &str = "saved_accounts";
pub const WATCHLIST: &str = "watchlist";
pub const SHARED_FEED: &str = "shared_trades";

pub struct KvStore<'c> {
    conn: &'c Connection,
    owner: String,
}

impl<'c> KvStore<'c> {
    pub fn new(conn: &'c Connection, owner: &str) -> Self {
        KvStore {
            conn,
            owner: owner.to_string(),
        }
    }

    pub fn get(&self, key: &str) -> JournalResult<Option<String>> {
        let v = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE owner_id=?1 AND key=?2",
                params![&self.owner, key],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    pub fn set(&self, key: &str, value: &str) -> JournalResult<()> {
        self.conn.execute(
            "INSERT INTO kv(owner_id, key, value) VALUES (?1, ?2, ?3)
             ON CONFLICT(owner_id, key) DO UPDATE SET value=excluded.value",
            params![&self.owner, key, value],
        )?;
        Ok(())
    }

    pub fn delete(&self, key: &str) -> JournalResult<bool> {
        let n = self.conn.execute(
            "DELETE FROM kv WHERE owner_id=?1 AND key=?2",
            params![&self.owner, key],
        )?;
        Ok(n > 0)
    }

    pub fn get_json<T: DeserializeOwned + Default>(&self, key: &str) -> JournalResult<T> {
        match self.get(key)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(T::default()),
        }
    }

    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) -> JournalResult<()> {
        self.set(key, &serde_json::to_string(value)?)
    }

    /// Adds `item` to a string list unless already present (case-insensitive).
    /// Returns true when the list changed.
    pub fn list_add(&self, key: &str, item: &str) -> JournalResult<bool> {
        let mut items: Vec<String> = self.get_json(key)?;
        if items.iter().any(|i| i.eq_ignore_ascii_case(item)) {
            return Ok(false);
        }
        items.push(item.to_string());
        self.set_json(key, &items)?;
        Ok(true)
    }

    pub fn list_remove(&self, key: &str, item: &str) -> JournalResult<bool> {
        let mut items: Vec<String> = self.get_json(key)?;
        let before = items.len();
        items.retain(|i| !i.eq_ignore_ascii_case(item));
        if items.len() == before {
            return Ok(false);
        }
        self.set_json(key, &items)?;
        Ok(true)
    }

    pub fn list(&self, key: &str) -> JournalResult<Vec<String>> {
        self.get_json(key)
    }

    pub fn share(&self, trade: &TradeRecord, shared_on: chrono::NaiveDate) -> JournalResult<()> {
        let mut feed: Vec<SharedTrade> = self.get_json(SHARED_FEED)?;
        feed.retain(|s| s.trade.id != trade.id);
        feed.push(SharedTrade {
            shared_on,
            trade: trade.clone(),
        });
        self.set_json(SHARED_FEED, &feed)
    }

    pub fn feed(&self) -> JournalResult<Vec<SharedTrade>> {
        self.get_json(SHARED_FEED)
    }
}

/// Snapshot of a trade as it was when shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedTrade {
    pub shared_on: chrono::NaiveDate,
    pub trade: TradeRecord,
}
