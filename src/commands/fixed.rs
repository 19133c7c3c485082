// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::{apply_entry_edits, template_from_args};
use crate::commands::user_id;
use crate::db;
use crate::utils::{maybe_print_json, parse_date, pretty_table};
use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        Some(("generate", sub)) => {
            let date = match sub.get_one::<String>("date") {
                Some(raw) => parse_date(raw)?,
                None => Local::now().date_naive(),
            };
            let count = generate(conn, user_id(sub), date)?;
            println!("Generated {} transactions dated {}", count, date);
        }
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let item = template_from_args(sub)?;
    let id = db::insert_fixed_item(conn, &item)?;
    println!(
        "Added fixed item #{} {} {} {} ({})",
        id, item.r#type, item.amount, item.currency, item.category
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let Some(mut item) = db::get_fixed_item(conn, user_id(sub), id)? else {
        bail!("Fixed item #{} not found", id);
    };
    let changed = apply_entry_edits(sub, &mut item)?;
    if changed == 0 {
        bail!("Nothing to change for fixed item #{}", id);
    }
    db::update_fixed_item(conn, &item)?;
    println!("Updated fixed item #{} ({} field(s))", id, changed);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if !db::delete_fixed_item(conn, user_id(sub), id)? {
        bail!("Fixed item #{} not found", id);
    }
    println!("Removed fixed item #{}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let items = db::list_fixed_items(conn, user_id(sub))?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &items)? {
        return Ok(());
    }
    let rows = items
        .into_iter()
        .map(|i| {
            vec![
                i.id.to_string(),
                i.r#type.to_string(),
                i.category,
                i.amount.to_string(),
                i.currency.to_string(),
                i.source.to_string(),
                i.description.unwrap_or_default(),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["ID", "Type", "Category", "Amount", "CCY", "Source", "Description"],
            rows
        )
    );
    Ok(())
}

/// Copies every template of `user_id` into a transaction on `date`, atomically.
pub fn generate(conn: &mut Connection, user_id: i64, date: NaiveDate) -> Result<usize> {
    let tx = conn.transaction()?;
    let items = db::list_fixed_items(&tx, user_id)?;
    for item in &items {
        db::insert_transaction(&tx, &item.to_transaction(date))?;
    }
    tx.commit()?;
    info!(user_id, count = items.len(), %date, "fixed items generated");
    Ok(items.len())
}
