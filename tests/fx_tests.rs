// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use parfin::currency::{DEFAULT_RATE, RATE_KEY, convert, exchange_rate, set_exchange_rate};
use parfin::db;
use parfin::models::Currency;
use parfin::utils::set_setting;
use rusqlite::Connection;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

#[test]
fn rate_defaults_until_configured() {
    let conn = setup();
    assert_eq!(exchange_rate(&conn).unwrap(), DEFAULT_RATE);

    set_exchange_rate(&conn, dec!(24500.5)).unwrap();
    assert_eq!(exchange_rate(&conn).unwrap(), dec!(24500.5));

    // Non-positive rates are refused and the stored one is kept
    assert!(set_exchange_rate(&conn, Decimal::ZERO).is_err());
    assert!(set_exchange_rate(&conn, dec!(-1)).is_err());
    assert_eq!(exchange_rate(&conn).unwrap(), dec!(24500.5));
}

#[test]
fn corrupt_rate_setting_is_an_error() {
    let conn = setup();
    set_setting(&conn, RATE_KEY, "lots").unwrap();
    let err = exchange_rate(&conn).unwrap_err();
    assert!(err.to_string().contains(RATE_KEY));
}

#[test]
fn conversion_pairs() {
    let rate = dec!(25000);
    assert_eq!(convert(dec!(50000), &Currency::Vnd, &Currency::Usd, rate), dec!(2));
    assert_eq!(convert(dec!(3), &Currency::Usd, &Currency::Vnd, rate), dec!(75000));
    assert_eq!(convert(dec!(7), &Currency::Usd, &Currency::Usd, rate), dec!(7));

    let eur = Currency::from_code("eur");
    assert_eq!(convert(dec!(9), &eur, &Currency::Vnd, rate), dec!(9));
    assert_eq!(convert(dec!(9), &Currency::Vnd, &eur, rate), dec!(9));
}
