// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::{target_currency, user_id};
use crate::ledger::build_portfolio;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("value", sub)) => value(conn, sub),
        _ => Ok(()),
    }
}

fn value(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ccy = target_currency(sub);
    let result = build_portfolio(conn, user_id(sub), &ccy)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &result)? {
        return Ok(());
    }

    let rows = result
        .holdings
        .iter()
        .map(|h| {
            vec![
                h.symbol.clone(),
                h.asset_type.to_string(),
                format!("{:.4}", h.quantity),
                fmt_money(&h.avg_price, &ccy),
                fmt_money(&h.market_price, &ccy),
                fmt_money(&h.total_value, &ccy),
                format!("{:.2}%", h.pl_percent),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &["Symbol", "Type", "Qty", "Avg Price", "Price", "Value", "P/L"],
            rows
        )
    );

    let s = &result.summary;
    let rows = vec![
        vec!["Invested".to_string(), fmt_money(&s.total_invested, &ccy)],
        vec!["Current value".to_string(), fmt_money(&s.total_current_value, &ccy)],
        vec!["P/L".to_string(), format!("{:.2}%", s.total_pl_percent)],
        vec!["Net cash flow".to_string(), fmt_money(&s.net_cash_flow, &ccy)],
    ];
    println!("{}", pretty_table(&["Summary", "Amount"], rows));
    Ok(())
}
