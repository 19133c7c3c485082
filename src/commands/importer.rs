// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{parse_amount, user_id};
use crate::db;
use crate::models::{Currency, Source, Transaction, TxType};
use crate::utils::parse_date;
use anyhow::{Context, Result, anyhow};
use csv::ReaderBuilder;
use rusqlite::Connection;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => {
            let path = sub.get_one::<String>("path").unwrap().trim();
            let format = match sub.get_one::<String>("format") {
                Some(f) => f.clone(),
                None => format_from_extension(path)?,
            };
            let count = import_transactions(conn, user_id(sub), Path::new(path), &format)?;
            println!("Imported {} transactions from {}", count, path);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn format_from_extension(path: &str) -> Result<String> {
    match Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("csv") => Ok("csv".into()),
        Some("json") => Ok("json".into()),
        _ => Err(anyhow!(
            "Cannot infer format of '{}', pass --format csv|json",
            path
        )),
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(f64),
}

/// One imported row; optional columns may be absent or blank.
#[derive(Debug, Deserialize)]
struct ImportRecord {
    date: String,
    r#type: String,
    category: String,
    amount: RawAmount,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    destination_category: Option<String>,
    #[serde(default)]
    fund: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

fn lower(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_lowercase())
}

fn blank_to_none(v: Option<String>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl ImportRecord {
    fn into_transaction(self, user_id: i64) -> Result<Transaction> {
        let amount_raw = match self.amount {
            RawAmount::Text(s) => s,
            RawAmount::Number(n) => n.to_string(),
        };
        Ok(Transaction {
            id: 0,
            user_id,
            date: parse_date(&self.date)?,
            amount: parse_amount(&amount_raw, "amount")?,
            currency: self
                .currency
                .as_deref()
                .filter(|c| !c.trim().is_empty())
                .map(Currency::from_code)
                .unwrap_or_default(),
            r#type: self.r#type.parse::<TxType>()?,
            category: self.category.trim().to_string(),
            description: blank_to_none(self.description),
            source: Source::normalize(lower(self.source).as_deref()),
            destination: Source::normalize(lower(self.destination).as_deref()),
            destination_category: blank_to_none(self.destination_category),
            fund: blank_to_none(self.fund),
        })
    }
}

fn read_records(path: &Path, format: &str) -> Result<Vec<ImportRecord>> {
    match format {
        "csv" => {
            let mut rdr = ReaderBuilder::new()
                .has_headers(true)
                .trim(csv::Trim::Headers)
                .from_path(path)
                .with_context(|| format!("Open CSV {}", path.display()))?;
            let mut out = Vec::new();
            for (idx, rec) in rdr.deserialize::<ImportRecord>().enumerate() {
                // Header is line 1
                out.push(rec.with_context(|| format!("CSV line {}", idx + 2))?);
            }
            Ok(out)
        }
        "json" => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Read {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("Parse JSON {}", path.display()))
        }
        other => Err(anyhow!("Unknown format: {} (use csv|json)", other)),
    }
}

/// Inserts every record of the file for `user_id`; nothing is kept if any row fails.
pub fn import_transactions(
    conn: &mut Connection,
    user_id: i64,
    path: &Path,
    format: &str,
) -> Result<usize> {
    let records = read_records(path, format)?;
    let tx = conn.transaction()?;
    let mut count = 0;
    for (idx, rec) in records.into_iter().enumerate() {
        let t = rec
            .into_transaction(user_id)
            .with_context(|| format!("Record {} of {}", idx + 1, path.display()))?;
        db::insert_transaction(&tx, &t)?;
        count += 1;
    }
    tx.commit()?;
    info!(user_id, count, path = %path.display(), "transactions imported");
    Ok(count)
}
