// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{parse_amount, user_id};
use crate::db;
use crate::models::{Currency, FixedItem, Fund, Source, TxType};
use crate::period::{DateRange, resolve_today};
use crate::utils::{maybe_print_json, parse_date, parse_month, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;
use tracing::warn;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("edit", sub)) => edit(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Reads the entry flags shared by `tx add` and `fixed add`.
pub(crate) fn template_from_args(sub: &clap::ArgMatches) -> Result<FixedItem> {
    let r#type = sub.get_one::<TxType>("type").unwrap().clone();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap(), "amount")?;
    let category = sub.get_one::<String>("category").unwrap().trim().to_string();
    if category.is_empty() {
        bail!("category must not be empty");
    }
    let fund = match sub.get_one::<String>("fund") {
        Some(raw) => Some(fund_tag(raw, &r#type)?),
        None => None,
    };
    Ok(FixedItem {
        id: 0,
        user_id: user_id(sub),
        amount,
        currency: sub.get_one::<Currency>("ccy").cloned().unwrap_or_default(),
        r#type,
        category,
        description: sub.get_one::<String>("description").cloned(),
        source: sub.get_one::<Source>("source").copied().unwrap_or_default(),
        destination: sub.get_one::<Source>("destination").copied().unwrap_or_default(),
        destination_category: sub.get_one::<String>("dest-category").cloned(),
        fund,
    })
}

fn fund_tag(raw: &str, kind: &TxType) -> Result<String> {
    let fund: Fund = raw.parse()?;
    if *kind != TxType::Expense {
        warn!(fund = %fund, kind = %kind, "fund tag only affects expenses");
    }
    Ok(fund.name().to_string())
}

/// Overwrites the entry fields whose flags were given; returns how many were.
pub(crate) fn apply_entry_edits(sub: &clap::ArgMatches, item: &mut FixedItem) -> Result<usize> {
    let mut changed = 0;
    if let Some(kind) = sub.get_one::<TxType>("type") {
        item.r#type = kind.clone();
        changed += 1;
    }
    if let Some(raw) = sub.get_one::<String>("amount") {
        item.amount = parse_amount(raw, "amount")?;
        changed += 1;
    }
    if let Some(raw) = sub.get_one::<String>("category") {
        let category = raw.trim();
        if category.is_empty() {
            bail!("category must not be empty");
        }
        item.category = category.to_string();
        changed += 1;
    }
    if let Some(ccy) = sub.get_one::<Currency>("ccy") {
        item.currency = ccy.clone();
        changed += 1;
    }
    if let Some(source) = sub.get_one::<Source>("source") {
        item.source = *source;
        changed += 1;
    }
    if let Some(dest) = sub.get_one::<Source>("destination") {
        item.destination = *dest;
        changed += 1;
    }
    if let Some(cat) = sub.get_one::<String>("dest-category") {
        item.destination_category = Some(cat.trim().to_string()).filter(|c| !c.is_empty());
        changed += 1;
    }
    if let Some(raw) = sub.get_one::<String>("fund") {
        item.fund = Some(fund_tag(raw, &item.r#type)?);
        changed += 1;
    }
    if let Some(desc) = sub.get_one::<String>("description") {
        item.description = Some(desc.clone()).filter(|d| !d.is_empty());
        changed += 1;
    }
    Ok(changed)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let t = template_from_args(sub)?.to_transaction(date);
    let id = db::insert_transaction(conn, &t)?;
    println!(
        "Recorded #{} {} {} {} ({}, {}) on {}",
        id, t.r#type, t.amount, t.currency, t.category, t.source, date
    );
    Ok(())
}

fn edit(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    let Some(current) = db::get_transaction(conn, user_id(sub), id)? else {
        bail!("Transaction #{} not found", id);
    };
    let mut template = current.template();
    let mut changed = apply_entry_edits(sub, &mut template)?;
    let date = match sub.get_one::<String>("date") {
        Some(raw) => {
            changed += 1;
            parse_date(raw)?
        }
        None => current.date,
    };
    if changed == 0 {
        bail!("Nothing to change for transaction #{}", id);
    }
    let mut updated = template.to_transaction(date);
    updated.id = id;
    db::update_transaction(conn, &updated)?;
    println!("Updated transaction #{} ({} field(s))", id, changed);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    if !db::delete_transaction(conn, user_id(sub), id)? {
        bail!("Transaction #{} not found", id);
    }
    println!("Removed transaction #{}", id);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.r#type.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.currency.clone(),
                    r.source.clone(),
                    r.target.clone(),
                    r.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Type", "Category", "Amount", "CCY", "Source", "To / Fund", "Description"],
                rows,
            )
        );
    }
    Ok(())
}

/// Window chosen by `--month`, or `--period` with `--from/--to`.
///
/// Bare `--from/--to` imply `custom`; with no range flags at all,
/// `default_period` applies.
pub fn range_from_args(sub: &clap::ArgMatches, default_period: &str) -> Result<DateRange> {
    if let Some(month) = sub.try_get_one::<String>("month").ok().flatten() {
        return Ok(DateRange::month_of(parse_month(month)?));
    }
    let from = sub
        .get_one::<String>("from")
        .map(|s| parse_date(s))
        .transpose()?;
    let to = sub.get_one::<String>("to").map(|s| parse_date(s)).transpose()?;
    let period = match sub.get_one::<String>("period") {
        Some(p) => p.as_str(),
        None if from.is_some() || to.is_some() => "custom",
        None => default_period,
    };
    Ok(resolve_today(period, from, to))
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub r#type: String,
    pub category: String,
    pub amount: String,
    pub currency: String,
    pub source: String,
    pub target: String,
    pub description: String,
}

/// Newest first, honouring `--limit`.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let range = range_from_args(sub, "all")?;
    let mut txs = db::list_transactions(conn, user_id(sub), &range)?;
    txs.reverse();
    if let Some(limit) = sub.get_one::<usize>("limit") {
        txs.truncate(*limit);
    }
    Ok(txs
        .into_iter()
        .map(|t| {
            let target = match t.r#type {
                TxType::Allocation => format!(
                    "{} / {}",
                    t.destination_category.as_deref().unwrap_or("total"),
                    t.destination
                ),
                _ => t.fund.clone().unwrap_or_default(),
            };
            TransactionRow {
                id: t.id,
                date: t.date.to_string(),
                r#type: t.r#type.to_string(),
                category: t.category,
                amount: t.amount.to_string(),
                currency: t.currency.to_string(),
                source: t.source.to_string(),
                target,
                description: t.description.unwrap_or_default(),
            }
        })
        .collect())
}
