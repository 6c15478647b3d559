// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use optjournal::{cli, commands::importer, db, store::TradeStore};
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;
use tempfile::NamedTempFile;

const HEADER: &str = "ticker,account,trading_date,option_type,expiration_date,status,contracts,cost,strike_price,price_at_purchase,realized_pl,unrealized_pl,audited,exercised,closed_date";

fn run_import(conn: &Connection, owner: &str, body: &str) -> anyhow::Result<()> {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}\n{}", HEADER, body).unwrap();
    file.flush().unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let padded = format!("  {}  ", path);
    let matches = cli::build_cli().get_matches_from([
        "optjournal",
        "--user",
        owner,
        "import",
        "trades",
        "--path",
        padded.as_str(),
    ]);
    if let Some(("import", import_m)) = matches.subcommand() {
        importer::handle(conn, owner, import_m)
    } else {
        panic!("no import subcommand");
    }
}

#[test]
fn import_computes_derived_fields() {
    let conn = db::open_in_memory().unwrap();
    run_import(
        &conn,
        "alice",
        "aapl,SAE,2025-03-07,Call option,06/20/2025,open,1,2.50,150,148.2,,,false,false,\n\
         KO,ST,03/10/2025,Cash secured put,2025-04-17,closed,1,0,100,101,50,0,true,false,04/01/2025",
    )
    .unwrap();

    let trades = TradeStore::new(&conn, "alice").list().unwrap();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].ticker, "AAPL");
    assert_eq!(trades[0].expiration_date.unwrap().to_string(), "2025-06-20");
    assert_eq!(trades[0].pmcc_calc, Some(Decimal::from_str("150.025").unwrap()));
    assert_eq!(trades[1].closed_date.unwrap().to_string(), "2025-04-01");
    assert_eq!(trades[1].expected_return, Some(Decimal::from_str("0.5").unwrap()));
    assert!(trades[1].audited);
    assert!(TradeStore::new(&conn, "bob").list().unwrap().is_empty());
}

#[test]
fn bad_row_aborts_whole_batch() {
    let conn = db::open_in_memory().unwrap();
    let err = run_import(
        &conn,
        "alice",
        "AAPL,SAE,2025-03-07,Call option,2025-06-20,open,1,2.50,150,148.2,,,,,\n\
         MSFT,SAE,2025-03-07,Put option,2025-06-20,open,,1.10,400,401,,,,,",
    )
    .unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("row 2"), "{}", msg);
    assert!(msg.contains("contracts"), "{}", msg);
    assert!(TradeStore::new(&conn, "alice").list().unwrap().is_empty());
}

#[test]
fn unparseable_date_is_rejected() {
    let conn = db::open_in_memory().unwrap();
    let err = run_import(
        &conn,
        "alice",
        "AAPL,SAE,March 7,Call option,2025-06-20,open,1,2.50,150,148.2,,,,,",
    )
    .unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("trading_date"), "{}", msg);
    assert!(TradeStore::new(&conn, "alice").list().unwrap().is_empty());
}

#[test]
fn boolean_flags_accept_true_false() {
    let conn = db::open_in_memory().unwrap();
    run_import(
        &conn,
        "alice",
        "SPY,Robinhood,2025-01-02,Put option,2025-01-17,open,3,1.20,470,475,,,true,true,",
    )
    .unwrap();
    let t = &TradeStore::new(&conn, "alice").list().unwrap()[0];
    assert!(t.audited && t.exercised);
    assert_eq!(t.contracts, 3);
    assert_eq!(t.pmcc_calc, None);
}
