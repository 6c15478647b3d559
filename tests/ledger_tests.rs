// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use optjournal::db;
use optjournal::error::JournalError;
use optjournal::events::TradeChange;
use optjournal::ledger::Ledger;
use optjournal::models::{FieldEdit, NewTrade, OptionType, TradeStatus};
use optjournal::store::TradeStore;
use rust_decimal::Decimal;
use std::cell::RefCell;
use std::rc::Rc;
use std::str::FromStr;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn call(ticker: &str) -> NewTrade {
    let mut t = NewTrade::open(
        ticker,
        "SAE",
        OptionType::CallOption,
        1,
        d("2.50"),
        d("150"),
        day("2000-01-01"),
    );
    t.expiration_date = Some(day("2025-12-19"));
    t
}

#[test]
fn open_trade_sets_date_status_and_pmcc() {
    let conn = db::open_in_memory().unwrap();
    let ledger = Ledger::new(TradeStore::new(&conn, "alice"));
    let mut t = call("aapl");
    t.status = TradeStatus::Closed;
    t.closed_date = Some(day("2025-01-01"));

    let id = ledger.open_trade(t, day("2025-03-10")).unwrap();
    let rec = ledger.store().get(id).unwrap();
    assert_eq!(rec.ticker, "AAPL");
    assert_eq!(rec.trading_date, day("2025-03-10"));
    assert_eq!(rec.status, TradeStatus::Open);
    assert_eq!(rec.closed_date, None);
    assert_eq!(rec.pmcc_calc, Some(d("150.025")));
    assert_eq!(rec.expected_return, None);
}

#[test]
fn editing_inputs_recomputes_derived_fields() {
    let conn = db::open_in_memory().unwrap();
    let ledger = Ledger::new(TradeStore::new(&conn, "alice"));
    let id = ledger.open_trade(call("AAPL"), day("2025-03-10")).unwrap();

    let rec = ledger.edit(id, FieldEdit::Contracts(2)).unwrap();
    assert_eq!(rec.pmcc_calc, Some(d("150.0125")));

    let rec = ledger
        .edit(
            id,
            FieldEdit::OptionType {
                selected: "Cash secured put".into(),
                custom: None,
            },
        )
        .unwrap();
    assert_eq!(rec.pmcc_calc, None);
    assert_eq!(rec.expected_return, Some(Decimal::ZERO));

    let rec = ledger.edit(id, FieldEdit::RealizedPl(Some(d("300")))).unwrap();
    // 300 / (150 * 100 * 2) * 100
    assert_eq!(rec.expected_return, Some(d("1")));

    let stored = ledger.store().get(id).unwrap();
    assert_eq!(stored, rec);
}

#[test]
fn other_type_uses_custom_text() {
    let conn = db::open_in_memory().unwrap();
    let ledger = Ledger::new(TradeStore::new(&conn, "alice"));
    let mut t = call("SPY");
    t.option_type = OptionType::PutOption;
    let id = ledger.open_trade(t, day("2025-03-10")).unwrap();

    let rec = ledger
        .edit(
            id,
            FieldEdit::OptionType {
                selected: "Other".into(),
                custom: Some("Call option".into()),
            },
        )
        .unwrap();
    assert_eq!(rec.option_type, OptionType::CallOption);
    assert_eq!(rec.pmcc_calc, Some(d("150.025")));

    let rec = ledger
        .edit(
            id,
            FieldEdit::OptionType {
                selected: "Other".into(),
                custom: Some("Diagonal".into()),
            },
        )
        .unwrap();
    assert_eq!(rec.option_type, OptionType::Custom("Diagonal".into()));
    assert_eq!(rec.pmcc_calc, None);
}

#[test]
fn invalid_edit_leaves_record_unchanged() {
    let conn = db::open_in_memory().unwrap();
    let ledger = Ledger::new(TradeStore::new(&conn, "alice"));
    let id = ledger.open_trade(call("AAPL"), day("2025-03-10")).unwrap();
    let before = ledger.store().get(id).unwrap();

    let err = ledger.edit(id, FieldEdit::Contracts(0)).unwrap_err();
    assert!(matches!(err, JournalError::Validation { .. }));
    let err = ledger.edit(id, FieldEdit::Cost(d("-1"))).unwrap_err();
    assert!(matches!(err, JournalError::Validation { .. }));
    assert_eq!(ledger.store().get(id).unwrap(), before);
}

#[test]
fn listed_types_require_expiration_on_add_and_edit() {
    let conn = db::open_in_memory().unwrap();
    let ledger = Ledger::new(TradeStore::new(&conn, "alice"));
    let mut t = call("AAPL");
    t.expiration_date = None;
    let err = ledger.open_trade(t, day("2025-03-10")).unwrap_err();
    assert!(matches!(err, JournalError::Validation { ref field, .. } if field == "expiration_date"));
    assert!(ledger.trades().unwrap().is_empty());

    let id = ledger.open_trade(call("AAPL"), day("2025-03-10")).unwrap();
    let err = ledger.edit(id, FieldEdit::ExpirationDate(None)).unwrap_err();
    assert!(matches!(err, JournalError::Validation { .. }));
    assert!(ledger.store().get(id).unwrap().expiration_date.is_some());

    let mut custom = call("SPY");
    custom.option_type = OptionType::Custom("Calendar".into());
    custom.expiration_date = None;
    let id = ledger.open_trade(custom, day("2025-03-10")).unwrap();
    let err = ledger
        .edit(
            id,
            FieldEdit::OptionType {
                selected: "Put option".into(),
                custom: None,
            },
        )
        .unwrap_err();
    assert!(matches!(err, JournalError::Validation { .. }));
    assert!(ledger.store().get(id).unwrap().option_type.is_custom());
}

#[test]
fn huge_position_is_stored_without_derived_values() {
    let conn = db::open_in_memory().unwrap();
    let ledger = Ledger::new(TradeStore::new(&conn, "alice"));
    let mut t = call("SPY");
    t.option_type = OptionType::CashSecuredPut;
    t.contracts = i64::MAX;
    t.strike_price = d("1000000000");
    t.realized_pl = Some(d("1"));

    let id = ledger.open_trade(t, day("2025-03-10")).unwrap();
    let rec = ledger.store().get(id).unwrap();
    assert_eq!(rec.contracts, i64::MAX);
    assert_eq!(rec.expected_return, None);

    let rec = ledger.edit(id, FieldEdit::UnrealizedPl(Some(d("5")))).unwrap();
    assert_eq!(rec.expected_return, None);
}

#[test]
fn close_and_reopen_toggle_closed_date() {
    let conn = db::open_in_memory().unwrap();
    let ledger = Ledger::new(TradeStore::new(&conn, "alice"));
    let id = ledger.open_trade(call("AAPL"), day("2025-03-10")).unwrap();

    let rec = ledger.close(id, day("2025-04-01")).unwrap();
    assert_eq!(rec.status, TradeStatus::Closed);
    assert_eq!(rec.closed_date, Some(day("2025-04-01")));
    assert_eq!(ledger.store().get(id).unwrap(), rec);

    let rec = ledger.reopen(id).unwrap();
    assert_eq!(rec.status, TradeStatus::Open);
    assert_eq!(rec.closed_date, None);
    assert_eq!(ledger.store().get(id).unwrap(), rec);
}

#[test]
fn owners_never_see_each_other() {
    let conn = db::open_in_memory().unwrap();
    let alice = Ledger::new(TradeStore::new(&conn, "alice"));
    let bob = Ledger::new(TradeStore::new(&conn, "bob"));
    let id = alice.open_trade(call("AAPL"), day("2025-03-10")).unwrap();
    bob.open_trade(call("MSFT"), day("2025-03-11")).unwrap();

    assert_eq!(alice.trades().unwrap().len(), 1);
    assert_eq!(bob.trades().unwrap()[0].ticker, "MSFT");

    assert!(matches!(bob.store().get(id), Err(JournalError::NotFound { .. })));
    assert!(matches!(
        bob.edit(id, FieldEdit::Audited(true)),
        Err(JournalError::NotFound { .. })
    ));
    assert!(matches!(bob.delete(id), Err(JournalError::NotFound { .. })));
    assert!(matches!(
        bob.close(id, day("2025-04-01")),
        Err(JournalError::NotFound { .. })
    ));
    assert!(!alice.store().get(id).unwrap().audited);
}

#[test]
fn changes_are_published_to_subscribers() {
    let conn = db::open_in_memory().unwrap();
    let ledger = Ledger::new(TradeStore::new(&conn, "alice"));
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let sub = ledger
        .events()
        .subscribe(move |c| sink.borrow_mut().push(c.clone()));

    let id = ledger.open_trade(call("AAPL"), day("2025-03-10")).unwrap();
    ledger.edit(id, FieldEdit::Exercised(true)).unwrap();
    ledger.close(id, day("2025-03-20")).unwrap();
    ledger.events().unsubscribe(sub);
    ledger.delete(id).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            TradeChange::Created { id },
            TradeChange::Updated { id },
            TradeChange::Closed { id },
        ]
    );
}

#[test]
fn failed_store_call_publishes_nothing() {
    let conn = db::open_in_memory().unwrap();
    let ledger = Ledger::new(TradeStore::new(&conn, "alice"));
    let hits = Rc::new(RefCell::new(0));
    let h = Rc::clone(&hits);
    ledger.events().subscribe(move |_| *h.borrow_mut() += 1);

    assert!(ledger.delete(999).is_err());
    assert!(ledger.edit(999, FieldEdit::Audited(true)).is_err());
    assert_eq!(*hits.borrow(), 0);
}
