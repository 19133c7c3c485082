// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::user_id;
use crate::db;
use crate::models::Transaction;
use crate::period::DateRange;
use crate::utils::parse_month;
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
            let out = sub.get_one::<String>("out").unwrap();
            let range = match sub.get_one::<String>("month") {
                Some(month) => DateRange::month_of(parse_month(month)?),
                None => DateRange::unbounded(),
            };
            let count = export_transactions(conn, user_id(sub), &range, &fmt, Path::new(out))?;
            println!("Exported {} transactions to {}", count, out);
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Flat file layout shared with the importer.
#[derive(Debug, Serialize)]
pub struct TransactionRecord {
    pub date: String,
    pub r#type: String,
    pub category: String,
    pub amount: String,
    pub currency: String,
    pub source: String,
    pub destination: String,
    pub destination_category: String,
    pub fund: String,
    pub description: String,
}

impl From<Transaction> for TransactionRecord {
    fn from(t: Transaction) -> Self {
        TransactionRecord {
            date: t.date.to_string(),
            r#type: t.r#type.to_string(),
            category: t.category,
            amount: t.amount.to_string(),
            currency: t.currency.to_string(),
            source: t.source.to_string(),
            destination: t.destination.to_string(),
            destination_category: t.destination_category.unwrap_or_default(),
            fund: t.fund.unwrap_or_default(),
            description: t.description.unwrap_or_default(),
        }
    }
}

pub fn export_transactions(
    conn: &Connection,
    user_id: i64,
    range: &DateRange,
    fmt: &str,
    out: &Path,
) -> Result<usize> {
    let records: Vec<TransactionRecord> = db::list_transactions(conn, user_id, range)?
        .into_iter()
        .map(TransactionRecord::from)
        .collect();

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            for rec in &records {
                wtr.serialize(rec)?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&records)?)?;
        }
        other => return Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
    Ok(records.len())
}
