// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use optjournal::commands::{exporter, importer};
use optjournal::ledger::Ledger;
use optjournal::models::{FieldEdit, NewTrade, OptionType};
use optjournal::{cli, db, store::TradeStore};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::tempdir;

fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn seed(conn: &Connection) {
    let ledger = Ledger::new(TradeStore::new(conn, "alice"));
    let mut call = NewTrade::open("AAPL", "SAE", OptionType::CallOption, 2, d("3.20"), d("180"), day("2025-01-02"));
    call.expiration_date = Some(day("2025-06-20"));
    call.price_at_purchase = d("182.15");
    ledger.open_trade(call, day("2025-01-02")).unwrap();

    let mut csp = NewTrade::open("KO", "Robinhood", OptionType::CashSecuredPut, 1, Decimal::ZERO, d("60"), day("2025-02-03"));
    csp.expiration_date = Some(day("2025-03-21"));
    csp.price_at_purchase = d("61");
    let id = ledger.open_trade(csp, day("2025-02-03")).unwrap();
    ledger.edit(id, FieldEdit::RealizedPl(Some(d("45")))).unwrap();
    ledger.edit(id, FieldEdit::Audited(true)).unwrap();
    ledger.close(id, day("2025-03-01")).unwrap();

    let mut custom = NewTrade::open("SPY", "Fidelity", OptionType::Custom("Iron condor".into()), 1, d("1.5"), d("500"), day("2025-02-10"));
    custom.unrealized_pl = Some(d("-12.5"));
    ledger.open_trade(custom, day("2025-02-10")).unwrap();

    let mut put = NewTrade::open("TSLA", "SAE", OptionType::PutOption, 1, d("9"), d("200"), day("2025-01-01"));
    put.expiration_date = Some(day("2025-02-21"));
    Ledger::new(TradeStore::new(conn, "bob"))
        .open_trade(put, day("2025-01-01"))
        .unwrap();
}

fn export(conn: &Connection, owner: &str, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["optjournal", "export", "trades"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("export", export_m)) = matches.subcommand() {
        exporter::handle(conn, owner, export_m)
    } else {
        panic!("no export subcommand");
    }
}

#[test]
fn csv_export_includes_derived_columns_and_yes_no() {
    let conn = db::open_in_memory().unwrap();
    seed(&conn);
    let dir = tempdir().unwrap();
    let out = dir.path().join("trades.csv");
    let out_str = out.to_string_lossy().to_string();
    export(&conn, "alice", &["--format", "csv", "--out", out_str.as_str()]).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), exporter::EXPORT_HEADERS.to_vec());
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);

    let col = |name: &str| headers.iter().position(|h| h == name).unwrap();
    let aapl = rows.iter().find(|r| &r[0] == "AAPL").unwrap();
    assert_eq!(&aapl[col("pmcc_calc")], "180.016");
    assert_eq!(&aapl[col("audited")], "No");
    let ko = rows.iter().find(|r| &r[0] == "KO").unwrap();
    assert_eq!(&ko[col("audited")], "Yes");
    assert_eq!(&ko[col("expected_return")], "0.75");
    assert_eq!(&ko[col("closed_date")], "2025-03-01");
    assert!(rows.iter().all(|r| &r[0] != "TSLA"));
}

#[test]
fn export_honours_filters() {
    let conn = db::open_in_memory().unwrap();
    seed(&conn);
    let dir = tempdir().unwrap();
    let out = dir.path().join("open.json");
    let out_str = out.to_string_lossy().to_string();
    export(
        &conn,
        "alice",
        &["--format", "json", "--out", out_str.as_str(), "--status", "open", "--ticker", "aa"],
    )
    .unwrap();

    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let items = parsed.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["ticker"], "AAPL");
    assert_eq!(items[0]["exercised"], "No");
    assert_eq!(items[0]["trading_date"], "2025-01-02");
}

#[test]
fn export_rejects_unknown_format() {
    let conn = db::open_in_memory().unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("export.xml");
    let out_str = out.to_string_lossy().to_string();
    assert!(export(&conn, "alice", &["--format", "xml", "--out", out_str.as_str()]).is_err());
    assert!(!out.exists());
}

#[test]
fn export_then_import_round_trips() {
    let conn = db::open_in_memory().unwrap();
    seed(&conn);
    let dir = tempdir().unwrap();
    let out = dir.path().join("trades.csv");
    let out_str = out.to_string_lossy().to_string();
    export(&conn, "alice", &["--out", out_str.as_str()]).unwrap();

    let fresh = db::open_in_memory().unwrap();
    let matches = cli::build_cli().get_matches_from(["optjournal", "import", "trades", "--path", out_str.as_str()]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(&fresh, "carol", import_m).unwrap();
    } else {
        panic!("no import subcommand");
    }

    let key = |t: &optjournal::models::TradeRecord| t.ticker.clone();
    let mut before = TradeStore::new(&conn, "alice").list().unwrap();
    let mut after = TradeStore::new(&fresh, "carol").list().unwrap();
    before.sort_by_key(key);
    after.sort_by_key(key);
    assert_eq!(before.len(), after.len());
    for (b, a) in before.iter().zip(after.iter()) {
        let mut a = a.clone();
        a.id = b.id;
        a.owner_id = b.owner_id.clone();
        assert_eq!(&a, b);
    }
}
