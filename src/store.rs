// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, ToSql, params};
use rust_decimal::Decimal;

use crate::error::{JournalError, JournalResult};
use crate::models::{NewTrade, OptionType, TradeRecord, TradeStatus, TradeUpdate};

const COLUMNS: &str = "id, owner_id, ticker, account, option_type, contracts, cost, strike_price, \
     price_at_purchase, trading_date, expiration_date, closed_date, status, realized_pl, \
     unrealized_pl, pmcc_calc, expected_return, audited, exercised";

// Every statement is scoped by owner_id.
pub struct TradeStore<'c> {
    conn: &'c Connection,
    owner: String,
}

impl<'c> TradeStore<'c> {
    pub fn new(conn: &'c Connection, owner: &str) -> Self {
        TradeStore {
            conn,
            owner: owner.to_string(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn conn(&self) -> &'c Connection {
        self.conn
    }

    pub fn list(&self) -> JournalResult<Vec<TradeRecord>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM trades WHERE owner_id=?1 ORDER BY trading_date, id",
            COLUMNS
        ))?;
        let rows = stmt.query_map(params![&self.owner], read_trade)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    pub fn get(&self, id: i64) -> JournalResult<TradeRecord> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM trades WHERE id=?1 AND owner_id=?2",
            COLUMNS
        ))?;
        stmt.query_row(params![id, &self.owner], read_trade)
            .optional()?
            .ok_or(JournalError::NotFound { id })
    }

    pub fn insert(&self, t: &NewTrade) -> JournalResult<i64> {
        t.validate()?;
        self.conn.execute(
            "INSERT INTO trades(owner_id, ticker, account, option_type, contracts, cost, strike_price,
                price_at_purchase, trading_date, expiration_date, closed_date, status, realized_pl,
                unrealized_pl, pmcc_calc, expected_return, audited, exercised)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16,?17,?18)",
            params![
                &self.owner,
                &t.ticker,
                &t.account,
                t.option_type.label(),
                t.contracts,
                t.cost.to_string(),
                t.strike_price.to_string(),
                t.price_at_purchase.to_string(),
                t.trading_date.to_string(),
                t.expiration_date.map(|d| d.to_string()),
                t.closed_date.map(|d| d.to_string()),
                t.status.as_str(),
                t.realized_pl.map(|d| d.to_string()),
                t.unrealized_pl.map(|d| d.to_string()),
                t.pmcc_calc.map(|d| d.to_string()),
                t.expected_return.map(|d| d.to_string()),
                t.audited,
                t.exercised,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, owner = %self.owner, ticker = %t.ticker, "trade inserted");
        Ok(id)
    }

    /// Writes the set columns of `u`. Fails with `NotFound` when the id is
    /// missing or belongs to someone else.
    pub fn update(&self, id: i64, u: &TradeUpdate) -> JournalResult<()> {
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();
        let mut push = |col: &'static str, v: Box<dyn ToSql>| {
            sets.push(col);
            values.push(v);
        };
        if let Some(v) = &u.ticker {
            push("ticker", Box::new(v.clone()));
        }
        if let Some(v) = &u.account {
            push("account", Box::new(v.clone()));
        }
        if let Some(v) = &u.option_type {
            push("option_type", Box::new(v.label().to_string()));
        }
        if let Some(v) = u.contracts {
            push("contracts", Box::new(v));
        }
        if let Some(v) = u.cost {
            push("cost", Box::new(v.to_string()));
        }
        if let Some(v) = u.strike_price {
            push("strike_price", Box::new(v.to_string()));
        }
        if let Some(v) = u.price_at_purchase {
            push("price_at_purchase", Box::new(v.to_string()));
        }
        if let Some(v) = u.trading_date {
            push("trading_date", Box::new(v.to_string()));
        }
        if let Some(v) = u.expiration_date {
            push("expiration_date", Box::new(v.map(|d| d.to_string())));
        }
        if let Some(v) = u.closed_date {
            push("closed_date", Box::new(v.map(|d| d.to_string())));
        }
        if let Some(v) = u.status {
            push("status", Box::new(v.as_str()));
        }
        if let Some(v) = u.realized_pl {
            push("realized_pl", Box::new(v.map(|d| d.to_string())));
        }
        if let Some(v) = u.unrealized_pl {
            push("unrealized_pl", Box::new(v.map(|d| d.to_string())));
        }
        if let Some(v) = u.pmcc_calc {
            push("pmcc_calc", Box::new(v.map(|d| d.to_string())));
        }
        if let Some(v) = u.expected_return {
            push("expected_return", Box::new(v.map(|d| d.to_string())));
        }
        if let Some(v) = u.audited {
            push("audited", Box::new(v));
        }
        if let Some(v) = u.exercised {
            push("exercised", Box::new(v));
        }

        if sets.is_empty() {
            // still confirm the row is ours
            self.get(id)?;
            return Ok(());
        }

        let mut sql = String::from("UPDATE trades SET ");
        for (i, col) in sets.iter().enumerate() {
            sql.push_str(&format!("{}=?{}, ", col, i + 1));
        }
        sql.push_str(&format!(
            "updated_at=datetime('now') WHERE id=?{} AND owner_id=?{}",
            sets.len() + 1,
            sets.len() + 2
        ));
        values.push(Box::new(id));
        values.push(Box::new(self.owner.clone()));

        let changed = self
            .conn
            .execute(&sql, rusqlite::params_from_iter(values.iter()))?;
        if changed == 0 {
            return Err(JournalError::NotFound { id });
        }
        tracing::debug!(id, columns = ?sets, "trade updated");
        Ok(())
    }

    pub fn delete(&self, id: i64) -> JournalResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM trades WHERE id=?1 AND owner_id=?2",
            params![id, &self.owner],
        )?;
        if changed == 0 {
            return Err(JournalError::NotFound { id });
        }
        tracing::info!(id, owner = %self.owner, "trade deleted");
        Ok(())
    }
}

fn conversion_err(idx: usize, raw: &str, what: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        Type::Text,
        format!("invalid {} '{}'", what, raw).into(),
    )
}

fn dec(r: &Row<'_>, idx: usize) -> rusqlite::Result<Decimal> {
    let raw: String = r.get(idx)?;
    raw.parse::<Decimal>()
        .map_err(|_| conversion_err(idx, &raw, "decimal"))
}

fn opt_dec(r: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = r.get(idx)?;
    raw.map(|s| s.parse::<Decimal>().map_err(|_| conversion_err(idx, &s, "decimal")))
        .transpose()
}

fn date(r: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = r.get(idx)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| conversion_err(idx, &raw, "date"))
}

fn opt_date(r: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    let raw: Option<String> = r.get(idx)?;
    raw.map(|s| {
        NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| conversion_err(idx, &s, "date"))
    })
    .transpose()
}

fn read_trade(r: &Row<'_>) -> rusqlite::Result<TradeRecord> {
    let status_raw: String = r.get(12)?;
    let status = TradeStatus::parse(&status_raw).map_err(|_| conversion_err(12, &status_raw, "status"))?;
    Ok(TradeRecord {
        id: r.get(0)?,
        owner_id: r.get(1)?,
        ticker: r.get(2)?,
        account: r.get(3)?,
        option_type: OptionType::from_label(&r.get::<_, String>(4)?),
        contracts: r.get(5)?,
        cost: dec(r, 6)?,
        strike_price: dec(r, 7)?,
        price_at_purchase: dec(r, 8)?,
        trading_date: date(r, 9)?,
        expiration_date: opt_date(r, 10)?,
        closed_date: opt_date(r, 11)?,
        status,
        realized_pl: opt_dec(r, 13)?,
        unrealized_pl: opt_dec(r, 14)?,
        pmcc_calc: opt_dec(r, 15)?,
        expected_return: opt_dec(r, 16)?,
        audited: r.get(17)?,
        exercised: r.get(18)?,
    })
}
