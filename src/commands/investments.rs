// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{parse_amount, user_id};
use crate::db;
use crate::models::{AssetType, InvestmentKind, InvestmentTransaction};
use crate::utils::{maybe_print_json, parse_date, pretty_table};
use anyhow::{Result, bail};
use rust_decimal::Decimal;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn optional_amount(sub: &clap::ArgMatches, field: &str) -> Result<Decimal> {
    match sub.get_one::<String>(field) {
        Some(raw) => parse_amount(raw, field),
        None => Ok(Decimal::ZERO),
    }
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let symbol = sub
        .get_one::<String>("symbol")
        .map(|s| s.trim().to_uppercase())
        .unwrap();
    if symbol.is_empty() {
        bail!("symbol must not be empty");
    }
    let inv = InvestmentTransaction {
        id: 0,
        user_id: user_id(sub),
        date: parse_date(sub.get_one::<String>("date").unwrap())?,
        symbol,
        asset_type: sub.get_one::<AssetType>("asset-type").copied().unwrap_or_default(),
        r#type: sub.get_one::<InvestmentKind>("type").unwrap().clone(),
        quantity: parse_amount(sub.get_one::<String>("quantity").unwrap(), "quantity")?,
        price: parse_amount(sub.get_one::<String>("price").unwrap(), "price")?,
        fee: optional_amount(sub, "fee")?,
        tax: optional_amount(sub, "tax")?,
        note: sub.get_one::<String>("note").cloned(),
    };
    let id = db::insert_investment_transaction(conn, &inv)?;
    println!(
        "Recorded #{} {} {} x {} @ {} VND (fee {}, tax {})",
        id, inv.r#type, inv.quantity, inv.symbol, inv.price, inv.fee, inv.tax
    );
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if !db::delete_investment_transaction(conn, user_id(sub), id)? {
        bail!("Investment record #{} not found", id);
    }
    println!("Removed investment record #{}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let records = db::list_investment_transactions(conn, user_id(sub))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &records)? {
        return Ok(());
    }
    let rows = records
        .into_iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.date.to_string(),
                r.r#type.to_string(),
                r.symbol,
                r.asset_type.to_string(),
                r.quantity.to_string(),
                r.price.to_string(),
                r.fee.to_string(),
                r.tax.to_string(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Date", "Type", "Symbol", "Asset", "Qty", "Price", "Fee", "Tax"],
            rows
        )
    );
    Ok(())
}
