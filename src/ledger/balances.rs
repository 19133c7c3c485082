// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::{ConvertedTrade, cash_impact};
use crate::currency::convert;
use crate::models::{Currency, Fund, InvestmentTransaction, Source, Transaction, TxType};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Balance {
    pub cash: Decimal,
    pub bank: Decimal,
}

impl Balance {
    pub fn post(&mut self, source: Source, amount: Decimal) {
        match source {
            Source::Cash => self.cash = self.cash.saturating_add(amount),
            Source::Bank => self.bank = self.bank.saturating_add(amount),
        }
    }

    pub fn sum(&self) -> Decimal {
        self.cash.saturating_add(self.bank)
    }
}

/// Account a posting lands in: the general account or one of the funds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Total,
    Fund(Fund),
}

impl Bucket {
    /// Fund bucket when `category` names a fund, otherwise the general account.
    pub fn for_category(category: Option<&str>) -> Bucket {
        match category.and_then(Fund::from_category) {
            Some(fund) => Bucket::Fund(fund),
            None => Bucket::Total,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Balances {
    pub total: Balance,
    pub saving: Balance,
    pub support: Balance,
    pub investment: Balance,
    pub together: Balance,
    pub grand_total: Decimal,
}

impl Balances {
    pub fn bucket(&self, bucket: Bucket) -> &Balance {
        match bucket {
            Bucket::Total => &self.total,
            Bucket::Fund(Fund::Saving) => &self.saving,
            Bucket::Fund(Fund::Support) => &self.support,
            Bucket::Fund(Fund::Investment) => &self.investment,
            Bucket::Fund(Fund::Together) => &self.together,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Balance {
        match bucket {
            Bucket::Total => &mut self.total,
            Bucket::Fund(Fund::Saving) => &mut self.saving,
            Bucket::Fund(Fund::Support) => &mut self.support,
            Bucket::Fund(Fund::Investment) => &mut self.investment,
            Bucket::Fund(Fund::Together) => &mut self.together,
        }
    }

    fn post(&mut self, bucket: Bucket, source: Source, amount: Decimal) {
        self.bucket_mut(bucket).post(source, amount);
    }

    /// Sum of all ten bucket sides.
    pub fn sum_all(&self) -> Decimal {
        std::iter::once(Bucket::Total)
            .chain(Fund::ALL.into_iter().map(Bucket::Fund))
            .map(|b| self.bucket(b).sum())
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn apply_transaction(&mut self, t: &Transaction, target: &Currency, rate: Decimal) {
        let amount = convert(t.amount, &t.currency, target, rate);
        let source = t.source;
        match &t.r#type {
            TxType::Income => {
                self.post(Bucket::for_category(Some(&t.category)), source, amount);
            }
            TxType::Expense => match t.fund.as_deref().filter(|f| !f.is_empty()) {
                Some(tag) => match Fund::from_category(tag) {
                    // The fund absorbs the spend on the transaction's own source side.
                    Some(fund) => self.post(Bucket::Fund(fund), source, -amount),
                    None => warn!(id = t.id, fund = tag, "expense tagged with unknown fund ignored"),
                },
                None => {
                    self.post(Bucket::Total, source, -amount);
                    // Legacy dual posting: an untagged expense filed under a fund
                    // category also credits that fund.
                    if let Some(fund) = Fund::from_category(&t.category) {
                        self.post(Bucket::Fund(fund), source, amount);
                    }
                }
            },
            TxType::Allocation => {
                self.post(Bucket::for_category(Some(&t.category)), source, -amount);
                self.post(
                    Bucket::for_category(t.destination_category.as_deref()),
                    t.destination,
                    amount,
                );
            }
            TxType::Other(kind) => {
                warn!(id = t.id, kind = %kind, "transaction with unknown type ignored");
            }
        }
    }

    /// Investment activity settles against the investment fund's bank side only.
    pub fn apply_investment(&mut self, inv: &InvestmentTransaction, target: &Currency, rate: Decimal) {
        let trade = ConvertedTrade::from_record(inv, target, rate);
        self.investment.post(Source::Bank, cash_impact(&inv.r#type, &trade));
    }
}

/// Folds the whole ledger of a user into current balances.
pub fn compute_balances(
    transactions: &[Transaction],
    investments: &[InvestmentTransaction],
    target: &Currency,
    rate: Decimal,
) -> Balances {
    let mut balances = Balances::default();
    for t in transactions {
        balances.apply_transaction(t, target, rate);
    }
    for inv in investments {
        balances.apply_investment(inv, target, rate);
    }
    balances.grand_total = balances.sum_all();
    debug!(
        transactions = transactions.len(),
        investments = investments.len(),
        target = %target,
        rate = %rate,
        "balances folded"
    );
    balances
}
