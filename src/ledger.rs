// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;

use crate::calc;
use crate::error::{JournalError, JournalResult};
use crate::events::{ChangeBus, TradeChange};
use crate::models::{
    FieldEdit, NewTrade, OptionType, TradeField, TradeRecord, TradeStatus, TradeUpdate,
    normalize_ticker, validate_contracts, validate_expiration, validate_non_negative,
};
use crate::store::TradeStore;

pub struct Ledger<'c> {
    store: TradeStore<'c>,
    bus: ChangeBus,
}

impl<'c> Ledger<'c> {
    pub fn new(store: TradeStore<'c>) -> Self {
        Ledger {
            store,
            bus: ChangeBus::new(),
        }
    }

    pub fn store(&self) -> &TradeStore<'c> {
        &self.store
    }

    pub fn events(&self) -> &ChangeBus {
        &self.bus
    }

    pub fn trades(&self) -> JournalResult<Vec<TradeRecord>> {
        self.store.list()
    }

    /// Records a new open position entered today. Any status or closed date
    /// on `t` is overridden.
    pub fn open_trade(&self, mut t: NewTrade, today: NaiveDate) -> JournalResult<i64> {
        t.ticker = normalize_ticker(&t.ticker)?;
        t.trading_date = today;
        t.status = TradeStatus::Open;
        t.closed_date = None;
        let (pmcc, er) = calc::derive_all(
            &t.option_type,
            t.contracts,
            t.cost,
            t.strike_price,
            t.realized_pl,
            t.unrealized_pl,
        );
        t.pmcc_calc = pmcc;
        t.expected_return = er;
        let id = self.store.insert(&t)?;
        self.bus.publish(&TradeChange::Created { id });
        Ok(id)
    }

    pub fn edit(&self, id: i64, edit: FieldEdit) -> JournalResult<TradeRecord> {
        let mut rec = self.store.get(id)?;
        let field = edit.field();
        let mut update = edit_to_update(edit)?;
        update.apply_to(&mut rec);
        if matches!(field, TradeField::OptionType | TradeField::ExpirationDate) {
            validate_expiration(&rec.option_type, rec.expiration_date)?;
        }

        let derived = calc::recalculate(&rec, field);
        update.pmcc_calc = derived.pmcc_calc;
        update.expected_return = derived.expected_return;
        derived.apply_to(&mut rec);

        self.store.update(id, &update)?;
        tracing::info!(id, ?field, "trade edited");
        self.bus.publish(&TradeChange::Updated { id });
        Ok(rec)
    }

    pub fn close(&self, id: i64, today: NaiveDate) -> JournalResult<TradeRecord> {
        let mut rec = self.store.get(id)?;
        let update = TradeUpdate {
            status: Some(TradeStatus::Closed),
            closed_date: Some(Some(today)),
            ..Default::default()
        };
        self.store.update(id, &update)?;
        update.apply_to(&mut rec);
        self.bus.publish(&TradeChange::Closed { id });
        Ok(rec)
    }

    pub fn reopen(&self, id: i64) -> JournalResult<TradeRecord> {
        let mut rec = self.store.get(id)?;
        let update = TradeUpdate {
            status: Some(TradeStatus::Open),
            closed_date: Some(None),
            ..Default::default()
        };
        self.store.update(id, &update)?;
        update.apply_to(&mut rec);
        self.bus.publish(&TradeChange::Reopened { id });
        Ok(rec)
    }

    pub fn delete(&self, id: i64) -> JournalResult<()> {
        self.store.delete(id)?;
        self.bus.publish(&TradeChange::Deleted { id });
        Ok(())
    }

    /// Inserts a prepared batch inside one transaction; nothing is kept if any
    /// insert fails.
    pub fn import_batch(&self, trades: Vec<NewTrade>) -> JournalResult<usize> {
        let conn = self.store.conn();
        let tx = conn.unchecked_transaction()?;
        let count = trades.len();
        for mut t in trades {
            let (pmcc, er) = calc::derive_all(
                &t.option_type,
                t.contracts,
                t.cost,
                t.strike_price,
                t.realized_pl,
                t.unrealized_pl,
            );
            t.pmcc_calc = pmcc;
            t.expected_return = er;
            self.store.insert(&t)?;
        }
        tx.commit()?;
        tracing::info!(count, owner = %self.store.owner(), "trades imported");
        self.bus.publish(&TradeChange::Imported { count });
        Ok(count)
    }
}

fn edit_to_update(edit: FieldEdit) -> JournalResult<TradeUpdate> {
    let mut u = TradeUpdate::default();
    match edit {
        FieldEdit::Ticker(v) => u.ticker = Some(normalize_ticker(&v)?),
        FieldEdit::Account(v) => {
            if v.trim().is_empty() {
                return Err(JournalError::validation("account", "account is empty"));
            }
            u.account = Some(v.trim().to_string());
        }
        FieldEdit::OptionType { selected, custom } => {
            u.option_type = Some(OptionType::resolve(&selected, custom.as_deref())?);
        }
        FieldEdit::Contracts(v) => {
            validate_contracts(v)?;
            u.contracts = Some(v);
        }
        FieldEdit::Cost(v) => {
            validate_non_negative("cost", v)?;
            u.cost = Some(v);
        }
        FieldEdit::StrikePrice(v) => {
            validate_non_negative("strike_price", v)?;
            u.strike_price = Some(v);
        }
        FieldEdit::PriceAtPurchase(v) => u.price_at_purchase = Some(v),
        FieldEdit::TradingDate(v) => u.trading_date = Some(v),
        FieldEdit::ExpirationDate(v) => u.expiration_date = Some(v),
        FieldEdit::RealizedPl(v) => u.realized_pl = Some(v),
        FieldEdit::UnrealizedPl(v) => u.unrealized_pl = Some(v),
        FieldEdit::Audited(v) => u.audited = Some(v),
        FieldEdit::Exercised(v) => u.exercised = Some(v),
    }
    Ok(u)
}
