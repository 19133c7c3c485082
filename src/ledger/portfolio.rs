// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use super::{ConvertedTrade, cash_impact, clamped_div};
use crate::models::{AssetType, Currency, InvestmentKind, InvestmentTransaction};

/// Remaining quantities at or below this are treated as closed positions.
pub const QUANTITY_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 4);

/// Pooled lot for one symbol under average-cost accounting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub symbol: String,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    pub total_cost: Decimal,
}

impl Position {
    fn new(symbol: &str, asset_type: AssetType) -> Position {
        Position {
            symbol: symbol.to_string(),
            asset_type,
            quantity: Decimal::ZERO,
            total_cost: Decimal::ZERO,
        }
    }

    pub fn avg_cost(&self) -> Decimal {
        if self.quantity > Decimal::ZERO {
            clamped_div(self.total_cost, self.quantity)
        } else {
            Decimal::ZERO
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Holding {
    pub symbol: String,
    pub asset_type: AssetType,
    pub quantity: Decimal,
    pub avg_price: Decimal,
    pub market_price: Decimal,
    pub total_value: Decimal,
    pub pl_percent: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub total_invested: Decimal,
    pub total_current_value: Decimal,
    pub total_pl_percent: Decimal,
    pub net_cash_flow: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioResult {
    pub holdings: Vec<Holding>,
    pub summary: PortfolioSummary,
}

/// Running state of the portfolio fold.
#[derive(Debug, Default)]
pub struct Book {
    positions: Vec<Position>,
    index_by_symbol: HashMap<String, usize>,
    pub net_cash_flow: Decimal,
}

impl Book {
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.index_by_symbol.get(symbol).map(|&idx| &self.positions[idx])
    }

    fn position_mut(&mut self, symbol: &str, asset_type: AssetType) -> &mut Position {
        let idx = match self.index_by_symbol.get(symbol) {
            Some(&idx) => idx,
            None => {
                self.positions.push(Position::new(symbol, asset_type));
                let idx = self.positions.len() - 1;
                self.index_by_symbol.insert(symbol.to_string(), idx);
                idx
            }
        };
        &mut self.positions[idx]
    }

    pub fn apply(&mut self, inv: &InvestmentTransaction, target: &Currency, rate: Decimal) {
        let trade = ConvertedTrade::from_record(inv, target, rate);
        let position = self.position_mut(&inv.symbol, inv.asset_type);
        match &inv.r#type {
            InvestmentKind::Buy => {
                position.quantity = position.quantity.saturating_add(trade.quantity);
                position.total_cost = position
                    .total_cost
                    .saturating_add(trade.gross().saturating_add(trade.fee));
            }
            InvestmentKind::Sell => {
                let avg_cost = position.avg_cost();
                position.quantity = position.quantity.saturating_sub(trade.quantity);
                position.total_cost = position
                    .total_cost
                    .saturating_sub(avg_cost.saturating_mul(trade.quantity));
            }
            InvestmentKind::Dividend => {}
            InvestmentKind::Other(kind) => {
                warn!(id = inv.id, kind = %kind, "investment record with unknown type ignored");
            }
        }
        self.net_cash_flow = self
            .net_cash_flow
            .saturating_add(cash_impact(&inv.r#type, &trade));
    }

    /// Open positions valued at average cost, in first-seen symbol order.
    pub fn finish(self) -> PortfolioResult {
        let mut summary = PortfolioSummary {
            net_cash_flow: self.net_cash_flow,
            ..PortfolioSummary::default()
        };
        let mut holdings = Vec::new();
        for position in self.positions {
            if position.quantity <= QUANTITY_EPSILON {
                continue;
            }
            let avg_price = position.avg_cost();
            // No live quotes: the average cost stands in for the market price.
            let market_price = avg_price;
            let total_value = market_price.saturating_mul(position.quantity);
            summary.total_invested = summary.total_invested.saturating_add(position.total_cost);
            summary.total_current_value = summary.total_current_value.saturating_add(total_value);
            holdings.push(Holding {
                symbol: position.symbol,
                asset_type: position.asset_type,
                quantity: position.quantity.round_dp(4),
                avg_price,
                market_price,
                total_value,
                pl_percent: Decimal::ZERO,
            });
        }
        summary.total_pl_percent = if summary.total_invested > Decimal::ZERO {
            let gain = summary
                .total_current_value
                .saturating_sub(summary.total_invested);
            clamped_div(gain, summary.total_invested).saturating_mul(Decimal::ONE_HUNDRED)
        } else {
            Decimal::ZERO
        };
        PortfolioResult { holdings, summary }
    }
}

/// Folds investment records, oldest first, into holdings and net cash flow.
pub fn compute_portfolio(
    investments: &[InvestmentTransaction],
    target: &Currency,
    rate: Decimal,
) -> PortfolioResult {
    let mut book = Book::default();
    for inv in investments {
        book.apply(inv, target, rate);
    }
    let result = book.finish();
    debug!(
        records = investments.len(),
        open = result.holdings.len(),
        "portfolio folded"
    );
    result
}
