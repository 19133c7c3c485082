// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;

use parfin::commands::{exporter, importer};
use parfin::db;
use parfin::models::{Currency, Source, TxType};
use parfin::period::DateRange;
use rusqlite::Connection;
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

#[test]
fn csv_import_normalizes_fields() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("tx.csv");
    fs::write(
        &path,
        "date,type,category,amount,currency,source,destination,destination_category,fund,description\n\
         2025-03-01,income,Salary,1000000,VND,BANK,,,,march pay\n\
         2025-03-02,Expense,Food,12.5,usd,wallet,,,,\n\
         2025-03-03,allocation,Total,300000,,bank,cash,Saving,,\n",
    )
    .unwrap();

    let n = importer::import_transactions(&mut conn, 1, &path, "csv").unwrap();
    assert_eq!(n, 3);

    let txs = db::list_transactions(&conn, 1, &DateRange::unbounded()).unwrap();
    assert_eq!(txs[0].r#type, TxType::Income);
    assert_eq!(txs[0].source, Source::Bank);
    assert_eq!(txs[0].description.as_deref(), Some("march pay"));
    assert_eq!(txs[1].r#type, TxType::Expense);
    assert_eq!(txs[1].currency, Currency::Usd);
    assert_eq!(txs[1].amount, dec!(12.5));
    assert_eq!(txs[1].source, Source::Cash);
    assert_eq!(txs[2].currency, Currency::Vnd);
    assert_eq!(txs[2].destination, Source::Cash);
    assert_eq!(txs[2].destination_category.as_deref(), Some("Saving"));
}

#[test]
fn bad_row_rolls_back_whole_import() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("tx.csv");
    fs::write(
        &path,
        "date,type,category,amount\n\
         2025-03-01,income,Salary,100\n\
         2025-03-02,refund,Food,5\n",
    )
    .unwrap();

    let err = importer::import_transactions(&mut conn, 1, &path, "csv").unwrap_err();
    assert!(format!("{:#}", err).contains("refund"));
    assert!(db::list_transactions(&conn, 1, &DateRange::unbounded()).unwrap().is_empty());
}

#[test]
fn json_import_accepts_numeric_amounts() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let path = dir.path().join("tx.json");
    fs::write(
        &path,
        r#"[
            {"date": "2025-03-05", "type": "expense", "category": "Travel", "amount": 250000, "fund": "Together"},
            {"date": "2025-03-06", "type": "income", "category": "Gift", "amount": "75000", "source": "bank"}
        ]"#,
    )
    .unwrap();

    assert_eq!(importer::import_transactions(&mut conn, 1, &path, "json").unwrap(), 2);
    let txs = db::list_transactions(&conn, 1, &DateRange::unbounded()).unwrap();
    assert_eq!(txs[0].amount, dec!(250000));
    assert_eq!(txs[0].fund.as_deref(), Some("Together"));
    assert_eq!(txs[1].amount, dec!(75000));
    assert_eq!(txs[1].source, Source::Bank);
}

#[test]
fn export_then_import_preserves_ledger() {
    let mut conn = setup();
    let dir = tempdir().unwrap();
    let seed = dir.path().join("seed.csv");
    fs::write(
        &seed,
        "date,type,category,amount,currency,source,destination,destination_category,fund,description\n\
         2025-02-27,income,Salary,900,VND,cash,,,,\n\
         2025-03-01,income,Salary,1000000,VND,bank,,,,pay\n\
         2025-03-04,expense,Travel,40,USD,cash,,,Together,trip\n",
    )
    .unwrap();
    importer::import_transactions(&mut conn, 1, &seed, "csv").unwrap();

    let march = DateRange::month_of(chrono::NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    for fmt in ["csv", "json"] {
        let out = dir.path().join(format!("march.{}", fmt));
        let n = exporter::export_transactions(&conn, 1, &march, fmt, &out).unwrap();
        assert_eq!(n, 2);

        let mut fresh = setup();
        importer::import_transactions(&mut fresh, 1, &out, fmt).unwrap();
        let mut original = db::list_transactions(&conn, 1, &march).unwrap();
        let copied = db::list_transactions(&fresh, 1, &DateRange::unbounded()).unwrap();
        for t in original.iter_mut() {
            t.id = 0;
        }
        let copied: Vec<_> = copied
            .into_iter()
            .map(|mut t| {
                t.id = 0;
                t
            })
            .collect();
        assert_eq!(original, copied, "format {}", fmt);
    }
}

#[test]
fn unknown_export_format_is_rejected() {
    let conn = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("x.xml");
    assert!(exporter::export_transactions(&conn, 1, &DateRange::unbounded(), "xml", &out).is_err());
}
