// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::currency::{DEFAULT_RATE, RATE_KEY, convert, exchange_rate, set_exchange_rate};
use crate::models::Currency;
use crate::utils::{get_setting, parse_decimal};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set-rate", sub)) => {
            let rate = parse_decimal(sub.get_one::<String>("rate").unwrap())?;
            set_exchange_rate(conn, rate)?;
            println!("Exchange rate set to {} VND per USD", rate.normalize());
        }
        Some(("show", _)) => show_rate(conn)?,
        Some(("convert", sub)) => convert_amount(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show_rate(conn: &Connection) -> Result<()> {
    let rate = exchange_rate(conn)?;
    if get_setting(conn, RATE_KEY)?.is_some() {
        println!("1 USD = {} VND", rate.normalize());
    } else {
        println!("1 USD = {} VND (default)", DEFAULT_RATE);
    }
    Ok(())
}

fn convert_amount(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = Currency::from_code(sub.get_one::<String>("from").unwrap());
    let to = Currency::from_code(sub.get_one::<String>("to").unwrap());
    let res = convert(amount, &from, &to, exchange_rate(conn)?);
    println!("{} {} -> {:.4} {}", amount, from, res, to);
    Ok(())
}
