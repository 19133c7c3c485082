// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Aggregation engine: balances, period statistics and the portfolio.
//!
//! The folds in the submodules are pure functions over record slices. The
//! `build_*` entry points read one snapshot of a user's ledger and hand it to
//! them; nothing computed here is stored.

pub mod balances;
pub mod portfolio;
pub mod stats;

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::currency::{convert, exchange_rate};
use crate::db;
use crate::models::{Currency, InvestmentKind, InvestmentTransaction};
use crate::period::DateRange;

pub use balances::{Balance, Balances, Bucket, compute_balances};
pub use portfolio::{Holding, PortfolioResult, PortfolioSummary, compute_portfolio};
pub use stats::{ChartData, ChartDatasets, PeriodStats, Tally, compute_period_stats};

/// Investment money fields converted out of VND; quantity is unitless.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ConvertedTrade {
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
    pub tax: Decimal,
}

impl ConvertedTrade {
    pub(crate) fn from_record(inv: &InvestmentTransaction, target: &Currency, rate: Decimal) -> Self {
        ConvertedTrade {
            quantity: inv.quantity,
            price: convert(inv.price, &Currency::Vnd, target, rate),
            fee: convert(inv.fee, &Currency::Vnd, target, rate),
            tax: convert(inv.tax, &Currency::Vnd, target, rate),
        }
    }

    pub(crate) fn gross(&self) -> Decimal {
        self.quantity.saturating_mul(self.price)
    }
}

/// Cash effect of one investment record: buys spend, sells and dividends return.
pub(crate) fn cash_impact(kind: &InvestmentKind, trade: &ConvertedTrade) -> Decimal {
    match kind {
        InvestmentKind::Buy => -trade.gross().saturating_add(trade.fee),
        InvestmentKind::Sell => trade.gross().saturating_sub(trade.fee).saturating_sub(trade.tax),
        InvestmentKind::Dividend => trade.gross().saturating_sub(trade.tax),
        InvestmentKind::Other(_) => Decimal::ZERO,
    }
}

/// `num / den` clamped to the representable range when the quotient overflows.
///
/// Callers rule out a zero `den` before dividing.
pub(crate) fn clamped_div(num: Decimal, den: Decimal) -> Decimal {
    num.checked_div(den).unwrap_or_else(|| {
        warn!(%num, %den, "quotient out of range, clamped");
        if num.is_sign_negative() == den.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        }
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BalancesResult {
    pub balances: Balances,
    pub period_stats: PeriodStats,
    pub chart_data: ChartData,
}

/// Global balances plus statistics for the transactions inside `range`.
pub fn build_report(
    conn: &Connection,
    user_id: i64,
    range: &DateRange,
    target: &Currency,
) -> Result<BalancesResult> {
    let snapshot = conn.unchecked_transaction()?;
    let rate = exchange_rate(&snapshot)?;
    let all = db::list_transactions(&snapshot, user_id, &DateRange::unbounded())?;
    let investments = db::list_investment_transactions(&snapshot, user_id)?;
    let in_period = db::list_transactions(&snapshot, user_id, range)?;
    snapshot.finish()?;

    let balances = compute_balances(&all, &investments, target, rate);
    let (period_stats, chart_data) = compute_period_stats(&in_period, target, rate);
    Ok(BalancesResult {
        balances,
        period_stats,
        chart_data,
    })
}

pub fn build_portfolio(conn: &Connection, user_id: i64, target: &Currency) -> Result<PortfolioResult> {
    let snapshot = conn.unchecked_transaction()?;
    let rate = exchange_rate(&snapshot)?;
    let investments = db::list_investment_transactions(&snapshot, user_id)?;
    snapshot.finish()?;
    Ok(compute_portfolio(&investments, target, rate))
}
