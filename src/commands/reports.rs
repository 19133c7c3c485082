// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::transactions::range_from_args;
use crate::commands::{target_currency, user_id};
use crate::ledger::{BalancesResult, Bucket, build_report};
use crate::models::{Currency, Fund};
use crate::utils::{fmt_money, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("balances", sub)) => balances(conn, sub),
        _ => Ok(()),
    }
}

fn balances(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let range = range_from_args(sub, "this_month")?;
    let ccy = target_currency(sub);
    let report = build_report(conn, user_id(sub), &range, &ccy)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }
    print_report(&report, &ccy);
    Ok(())
}

fn print_report(report: &BalancesResult, ccy: &Currency) {
    let b = &report.balances;
    let mut rows = Vec::new();
    let buckets = std::iter::once(("Total", Bucket::Total))
        .chain(Fund::ALL.into_iter().map(|f| (f.name(), Bucket::Fund(f))));
    for (label, bucket) in buckets {
        let bal = b.bucket(bucket);
        rows.push(vec![
            label.to_string(),
            fmt_money(&bal.cash, ccy),
            fmt_money(&bal.bank, ccy),
            fmt_money(&bal.sum(), ccy),
        ]);
    }
    rows.push(vec![
        "Grand total".into(),
        String::new(),
        String::new(),
        fmt_money(&b.grand_total, ccy),
    ]);
    println!("{}", pretty_table(&["Account", "Cash", "Bank", "Sum"], rows));

    let stats = &report.period_stats;
    let rows = vec![
        vec![
            "Income".to_string(),
            fmt_money(&stats.income.cash, ccy),
            fmt_money(&stats.income.bank, ccy),
            fmt_money(&stats.income.total, ccy),
        ],
        vec![
            "Expense".to_string(),
            fmt_money(&stats.expense.cash, ccy),
            fmt_money(&stats.expense.bank, ccy),
            fmt_money(&stats.expense.total, ccy),
        ],
    ];
    println!("{}", pretty_table(&["Period", "Cash", "Bank", "Total"], rows));

    let chart = &report.chart_data;
    if !chart.labels.is_empty() {
        let rows = chart
            .labels
            .iter()
            .zip(chart.datasets.cash.iter().zip(&chart.datasets.bank))
            .map(|(label, (cash, bank))| {
                vec![
                    label.clone(),
                    fmt_money(cash, ccy),
                    fmt_money(bank, ccy),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Cash", "Bank"], rows));
    }
}
