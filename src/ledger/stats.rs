// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::balances::Balance;
use crate::currency::convert;
use crate::models::{Currency, Fund, Source, Transaction, TxType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub total: Decimal,
    pub cash: Decimal,
    pub bank: Decimal,
}

impl Tally {
    fn add(&mut self, source: Source, amount: Decimal) {
        self.total = self.total.saturating_add(amount);
        match source {
            Source::Cash => self.cash = self.cash.saturating_add(amount),
            Source::Bank => self.bank = self.bank.saturating_add(amount),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub income: Tally,
    pub expense: Tally,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartDatasets {
    pub cash: Vec<Decimal>,
    pub bank: Vec<Decimal>,
}

/// Spending per category; labels keep first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: ChartDatasets,
}

/// Folds the transactions of one period into income/expense tallies and the
/// expense-by-category chart. Fund-category expenses and allocations move money
/// between buckets and are left out.
pub fn compute_period_stats(
    transactions: &[Transaction],
    target: &Currency,
    rate: Decimal,
) -> (PeriodStats, ChartData) {
    let mut stats = PeriodStats::default();
    let mut categories: Vec<(String, Balance)> = Vec::new();
    let mut index_by_category: HashMap<String, usize> = HashMap::new();

    for t in transactions {
        let amount = convert(t.amount, &t.currency, target, rate);
        match t.r#type {
            TxType::Income => stats.income.add(t.source, amount),
            TxType::Expense if !Fund::is_fund_category(&t.category) => {
                stats.expense.add(t.source, amount);
                let idx = *index_by_category
                    .entry(t.category.clone())
                    .or_insert_with(|| {
                        categories.push((t.category.clone(), Balance::default()));
                        categories.len() - 1
                    });
                categories[idx].1.post(t.source, amount);
            }
            _ => {}
        }
    }

    let mut chart = ChartData::default();
    for (label, spent) in categories {
        chart.labels.push(label);
        chart.datasets.cash.push(spent.cash);
        chart.datasets.bank.push(spent.bank);
    }
    debug!(
        transactions = transactions.len(),
        categories = chart.labels.len(),
        "period stats folded"
    );
    (stats, chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(kind: &str, amount: Decimal, category: &str, source: Source) -> Transaction {
        Transaction {
            id: 1,
            user_id: 1,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            amount,
            currency: Currency::Vnd,
            r#type: TxType::from_db(kind),
            category: category.to_string(),
            description: None,
            source,
            destination: Source::Cash,
            destination_category: None,
            fund: None,
        }
    }

    #[test]
    fn income_and_expense_split_by_source() {
        let txs = [
            tx("income", dec!(1000), "Salary", Source::Bank),
            tx("income", dec!(200), "Saving", Source::Cash),
            tx("expense", dec!(30), "Food", Source::Cash),
            tx("expense", dec!(70), "Bills", Source::Bank),
        ];
        let (stats, _) = compute_period_stats(&txs, &Currency::Vnd, dec!(25000));
        assert_eq!(stats.income.total, dec!(1200));
        assert_eq!(stats.income.bank, dec!(1000));
        assert_eq!(stats.income.cash, dec!(200));
        assert_eq!(stats.expense.total, dec!(100));
        assert_eq!(stats.expense.cash, dec!(30));
        assert_eq!(stats.expense.bank, dec!(70));
    }

    #[test]
    fn transfers_are_excluded() {
        let txs = [
            tx("expense", dec!(500), "Saving", Source::Cash),
            tx("allocation", dec!(500), "Salary", Source::Cash),
            tx("refund", dec!(5), "Food", Source::Cash),
        ];
        let (stats, chart) = compute_period_stats(&txs, &Currency::Vnd, dec!(25000));
        assert_eq!(stats, PeriodStats::default());
        assert!(chart.labels.is_empty());
    }

    #[test]
    fn chart_keeps_first_seen_order() {
        let txs = [
            tx("expense", dec!(10), "Transport", Source::Cash),
            tx("expense", dec!(20), "Food", Source::Bank),
            tx("expense", dec!(5), "Transport", Source::Bank),
            tx("expense", dec!(1), "Bills", Source::Cash),
        ];
        let (_, chart) = compute_period_stats(&txs, &Currency::Vnd, dec!(25000));
        assert_eq!(chart.labels, vec!["Transport", "Food", "Bills"]);
        assert_eq!(chart.datasets.cash, vec![dec!(10), dec!(0), dec!(1)]);
        assert_eq!(chart.datasets.bank, vec![dec!(5), dec!(20), dec!(0)]);
    }

    #[test]
    fn converts_into_target() {
        let txs = [tx("expense", dec!(50000), "Food", Source::Cash)];
        let (stats, chart) = compute_period_stats(&txs, &Currency::Usd, dec!(25000));
        assert_eq!(stats.expense.total, dec!(2));
        assert_eq!(chart.datasets.cash, vec![dec!(2)]);
    }
}
