// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::models::{
    AssetType, Currency, FixedItem, InvestmentKind, InvestmentTransaction, Source, Transaction,
    TxType, User,
};
use crate::period::DateRange;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.parfin", "ParFin", "parfin"));

pub const DB_ENV: &str = "PARFIN_DB";

/// Owner seeded by the schema and selected when `--user` is absent.
pub const DEFAULT_USER_ID: i64 = 1;

/// `PARFIN_DB` wins over the platform data directory.
pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("parfin.sqlite"))
}

pub fn open_or_init(path_override: Option<&str>) -> Result<Connection> {
    let path = match path_override {
        Some(p) => PathBuf::from(p),
        None => db_path()?,
    };
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    INSERT OR IGNORE INTO users(id, username, role) VALUES (1, 'admin', 'admin');

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL DEFAULT 'VND',
        type TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT,
        source TEXT DEFAULT 'cash',
        destination TEXT,
        destination_category TEXT,
        fund TEXT,
        date TEXT NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user_date ON transactions(user_id, date);

    CREATE TABLE IF NOT EXISTS investment_transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        symbol TEXT NOT NULL,
        asset_type TEXT NOT NULL DEFAULT 'stock',
        type TEXT NOT NULL,
        quantity TEXT NOT NULL,
        price TEXT NOT NULL,
        fee TEXT NOT NULL DEFAULT '0',
        tax TEXT NOT NULL DEFAULT '0',
        date TEXT NOT NULL,
        note TEXT,
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_investments_user_date ON investment_transactions(user_id, date);

    CREATE TABLE IF NOT EXISTS fixed_items(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        currency TEXT NOT NULL DEFAULT 'VND',
        type TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT,
        source TEXT DEFAULT 'cash',
        destination TEXT,
        destination_category TEXT,
        fund TEXT,
        FOREIGN KEY(user_id) REFERENCES users(id) ON DELETE CASCADE
    );
    "#,
    )?;
    Ok(())
}

fn stored_decimal(raw: &str, field: &str, id: i64) -> Result<Decimal> {
    Decimal::from_str_exact(raw.trim())
        .or_else(|_| Decimal::from_scientific(raw.trim()))
        .with_context(|| format!("Invalid stored {} '{}' on row {}", field, raw, id))
}

fn stored_date(raw: &str, id: i64) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid stored date '{}' on row {}", raw, id))
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.is_empty())
}

// ---- users ----

pub fn add_user(conn: &Connection, username: &str, role: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO users(username, role) VALUES (?1, ?2)",
        params![username, role],
    )
    .with_context(|| format!("User '{}' could not be created", username))?;
    Ok(conn.last_insert_rowid())
}

/// Removes a user and, through the foreign keys, everything they own.
pub fn delete_user(conn: &Connection, id: i64) -> Result<bool> {
    if id == DEFAULT_USER_ID {
        bail!("User #{} is the default ledger owner and cannot be removed", id);
    }
    let n = conn.execute("DELETE FROM users WHERE id=?1", params![id])?;
    Ok(n > 0)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, username, role FROM users ORDER BY id")?;
    let rows = stmt.query_map([], |r| {
        Ok(User {
            id: r.get(0)?,
            username: r.get(1)?,
            role: r.get(2)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

// ---- transactions ----

const TX_COLUMNS: &str = "id, user_id, amount, currency, type, category, description, source, \
                          destination, destination_category, fund, date";

struct RawTransaction {
    id: i64,
    user_id: i64,
    amount: String,
    currency: Option<String>,
    r#type: String,
    category: String,
    description: Option<String>,
    source: Option<String>,
    destination: Option<String>,
    destination_category: Option<String>,
    fund: Option<String>,
    date: String,
}

impl RawTransaction {
    fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(RawTransaction {
            id: r.get(0)?,
            user_id: r.get(1)?,
            amount: r.get(2)?,
            currency: r.get(3)?,
            r#type: r.get(4)?,
            category: r.get(5)?,
            description: r.get(6)?,
            source: r.get(7)?,
            destination: r.get(8)?,
            destination_category: r.get(9)?,
            fund: r.get(10)?,
            date: r.get(11)?,
        })
    }

    fn into_model(self) -> Result<Transaction> {
        Ok(Transaction {
            amount: stored_decimal(&self.amount, "amount", self.id)?,
            date: stored_date(&self.date, self.id)?,
            currency: self
                .currency
                .as_deref()
                .map(Currency::from_code)
                .unwrap_or_default(),
            r#type: TxType::from_db(&self.r#type),
            source: Source::normalize(self.source.as_deref()),
            destination: Source::normalize(self.destination.as_deref()),
            id: self.id,
            user_id: self.user_id,
            category: self.category,
            description: non_empty(self.description),
            destination_category: non_empty(self.destination_category),
            fund: non_empty(self.fund),
        })
    }
}

/// A user's transactions with `date` inside `range`, oldest first.
pub fn list_transactions(
    conn: &Connection,
    user_id: i64,
    range: &DateRange,
) -> Result<Vec<Transaction>> {
    let mut sql = format!("SELECT {} FROM transactions WHERE user_id=?", TX_COLUMNS);
    let mut args: Vec<String> = vec![user_id.to_string()];
    if let Some(start) = range.start {
        sql.push_str(" AND date >= ?");
        args.push(start.to_string());
    }
    if let Some(end) = range.end {
        sql.push_str(" AND date <= ?");
        args.push(end.to_string());
    }
    sql.push_str(" ORDER BY date, id");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(args.iter()), RawTransaction::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?.into_model()?);
    }
    Ok(out)
}

pub fn insert_transaction(conn: &Connection, t: &Transaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions(user_id, amount, currency, type, category, description, source,
                                  destination, destination_category, fund, date)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11)",
        params![
            t.user_id,
            t.amount.to_string(),
            t.currency.code(),
            t.r#type.as_str(),
            t.category,
            t.description,
            t.source.as_str(),
            t.destination.as_str(),
            t.destination_category,
            t.fund,
            t.date.to_string(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_transaction(conn: &Connection, user_id: i64, id: i64) -> Result<Option<Transaction>> {
    let raw = conn
        .query_row(
            &format!("SELECT {} FROM transactions WHERE id=?1 AND user_id=?2", TX_COLUMNS),
            params![id, user_id],
            RawTransaction::from_row,
        )
        .optional()?;
    raw.map(RawTransaction::into_model).transpose()
}

/// Rewrites every column of `t` in place; false when the row is not the owner's.
pub fn update_transaction(conn: &Connection, t: &Transaction) -> Result<bool> {
    let n = conn.execute(
        "UPDATE transactions
         SET amount=?1, currency=?2, type=?3, category=?4, description=?5, source=?6,
             destination=?7, destination_category=?8, fund=?9, date=?10
         WHERE id=?11 AND user_id=?12",
        params![
            t.amount.to_string(),
            t.currency.code(),
            t.r#type.as_str(),
            t.category,
            t.description,
            t.source.as_str(),
            t.destination.as_str(),
            t.destination_category,
            t.fund,
            t.date.to_string(),
            t.id,
            t.user_id,
        ],
    )?;
    Ok(n > 0)
}

pub fn delete_transaction(conn: &Connection, user_id: i64, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM transactions WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    Ok(n > 0)
}

// ---- investments ----

/// A user's investment records ordered by date ascending.
pub fn list_investment_transactions(
    conn: &Connection,
    user_id: i64,
) -> Result<Vec<InvestmentTransaction>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, user_id, symbol, asset_type, type, quantity, price, fee, tax, date, note
         FROM investment_transactions WHERE user_id=?1 ORDER BY date, id",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, Option<String>>(7)?,
            r.get::<_, Option<String>>(8)?,
            r.get::<_, String>(9)?,
            r.get::<_, Option<String>>(10)?,
        ))
    })?;

    let mut out = Vec::new();
    for row in rows {
        let (id, user_id, symbol, asset_s, kind, qty_s, price_s, fee_s, tax_s, date_s, note) = row?;
        let asset_type = match asset_s.as_deref() {
            None | Some("") => AssetType::default(),
            Some(raw) => raw.parse::<AssetType>().unwrap_or_else(|err| {
                tracing::warn!(id, %err, "falling back to stock");
                AssetType::default()
            }),
        };
        out.push(InvestmentTransaction {
            id,
            user_id,
            date: stored_date(&date_s, id)?,
            asset_type,
            r#type: InvestmentKind::from_db(&kind),
            quantity: stored_decimal(&qty_s, "quantity", id)?,
            price: stored_decimal(&price_s, "price", id)?,
            fee: stored_decimal(fee_s.as_deref().unwrap_or("0"), "fee", id)?,
            tax: stored_decimal(tax_s.as_deref().unwrap_or("0"), "tax", id)?,
            symbol,
            note: non_empty(note),
        });
    }
    Ok(out)
}

pub fn insert_investment_transaction(conn: &Connection, inv: &InvestmentTransaction) -> Result<i64> {
    conn.execute(
        "INSERT INTO investment_transactions(user_id, symbol, asset_type, type, quantity, price, fee, tax, date, note)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        params![
            inv.user_id,
            inv.symbol,
            inv.asset_type.as_str(),
            inv.r#type.as_str(),
            inv.quantity.to_string(),
            inv.price.to_string(),
            inv.fee.to_string(),
            inv.tax.to_string(),
            inv.date.to_string(),
            inv.note,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn delete_investment_transaction(conn: &Connection, user_id: i64, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM investment_transactions WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    Ok(n > 0)
}

// ---- fixed items ----

pub fn list_fixed_items(conn: &Connection, user_id: i64) -> Result<Vec<FixedItem>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, amount, currency, type, category, description, source,
                destination, destination_category, fund
         FROM fixed_items WHERE user_id=?1 ORDER BY id",
    )?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, i64>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, Option<String>>(6)?,
            r.get::<_, Option<String>>(7)?,
            r.get::<_, Option<String>>(8)?,
            r.get::<_, Option<String>>(9)?,
            r.get::<_, Option<String>>(10)?,
        ))
    })?;
    let mut out = Vec::new();
    for row in rows {
        let (id, user_id, amount, ccy, kind, category, description, source, dest, dest_cat, fund) =
            row?;
        out.push(FixedItem {
            id,
            user_id,
            amount: stored_decimal(&amount, "amount", id)?,
            currency: ccy.as_deref().map(Currency::from_code).unwrap_or_default(),
            r#type: TxType::from_db(&kind),
            category,
            description: non_empty(description),
            source: Source::normalize(source.as_deref()),
            destination: Source::normalize(dest.as_deref()),
            destination_category: non_empty(dest_cat),
            fund: non_empty(fund),
        });
    }
    Ok(out)
}

pub fn insert_fixed_item(conn: &Connection, item: &FixedItem) -> Result<i64> {
    conn.execute(
        "INSERT INTO fixed_items(user_id, amount, currency, type, category, description, source,
                                 destination, destination_category, fund)
         VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)",
        params![
            item.user_id,
            item.amount.to_string(),
            item.currency.code(),
            item.r#type.as_str(),
            item.category,
            item.description,
            item.source.as_str(),
            item.destination.as_str(),
            item.destination_category,
            item.fund,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_fixed_item(conn: &Connection, user_id: i64, id: i64) -> Result<Option<FixedItem>> {
    Ok(list_fixed_items(conn, user_id)?.into_iter().find(|i| i.id == id))
}

pub fn update_fixed_item(conn: &Connection, item: &FixedItem) -> Result<bool> {
    let n = conn.execute(
        "UPDATE fixed_items
         SET amount=?1, currency=?2, type=?3, category=?4, description=?5, source=?6,
             destination=?7, destination_category=?8, fund=?9
         WHERE id=?10 AND user_id=?11",
        params![
            item.amount.to_string(),
            item.currency.code(),
            item.r#type.as_str(),
            item.category,
            item.description,
            item.source.as_str(),
            item.destination.as_str(),
            item.destination_category,
            item.fund,
            item.id,
            item.user_id,
        ],
    )?;
    Ok(n > 0)
}

pub fn delete_fixed_item(conn: &Connection, user_id: i64, id: i64) -> Result<bool> {
    let n = conn.execute(
        "DELETE FROM fixed_items WHERE id=?1 AND user_id=?2",
        params![id, user_id],
    )?;
    Ok(n > 0)
}
