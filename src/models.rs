// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Currency codes the ledger knows how to convert between.
///
/// Any other code is carried through as `Other` and converted as a passthrough.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Currency {
    #[default]
    Vnd,
    Usd,
    Other(String),
}

impl Currency {
    /// Lenient mapping used for stored rows and imported files.
    pub fn from_code(code: &str) -> Currency {
        let code = code.trim().to_uppercase();
        match code.as_str() {
            "VND" => Currency::Vnd,
            "USD" => Currency::Usd,
            _ => Currency::Other(code),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Currency::Vnd => "VND",
            Currency::Usd => "USD",
            Currency::Other(code) => code,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Currency::from_code(s) {
            Currency::Other(code) => Err(ModelError::UnknownCurrency(code)),
            known => Ok(known),
        }
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Currency::from_code(&s)
    }
}

impl From<Currency> for String {
    fn from(c: Currency) -> Self {
        c.code().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TxType {
    Income,
    Expense,
    Allocation,
    /// Out-of-model value kept verbatim; contributes nothing to aggregates.
    Other(String),
}

impl TxType {
    pub fn from_db(s: &str) -> TxType {
        match s {
            "income" => TxType::Income,
            "expense" => TxType::Expense,
            "allocation" => TxType::Allocation,
            other => TxType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TxType::Income => "income",
            TxType::Expense => "expense",
            TxType::Allocation => "allocation",
            TxType::Other(s) => s,
        }
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match TxType::from_db(&s.trim().to_lowercase()) {
            TxType::Other(other) => Err(ModelError::UnknownTxType(other)),
            known => Ok(known),
        }
    }
}

impl From<String> for TxType {
    fn from(s: String) -> Self {
        TxType::from_db(&s)
    }
}

impl From<TxType> for String {
    fn from(t: TxType) -> Self {
        t.as_str().to_string()
    }
}

/// Cash-vs-bank side of an account bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Cash,
    Bank,
}

impl Source {
    /// Anything other than exactly `bank` lands in cash.
    pub fn normalize(raw: Option<&str>) -> Source {
        match raw {
            Some("bank") => Source::Bank,
            _ => Source::Cash,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Cash => "cash",
            Source::Bank => "bank",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(Source::Cash),
            "bank" => Ok(Source::Bank),
            other => Err(ModelError::UnknownSource(other.to_string())),
        }
    }
}

/// Earmarked sub-accounts tracked apart from the general `total` bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fund {
    Saving,
    Support,
    Investment,
    Together,
}

impl Fund {
    /// The fund-category set. Every fund-aware rule consults this list.
    pub const ALL: [Fund; 4] = [Fund::Saving, Fund::Support, Fund::Investment, Fund::Together];

    pub fn name(&self) -> &'static str {
        match self {
            Fund::Saving => "Saving",
            Fund::Support => "Support",
            Fund::Investment => "Investment",
            Fund::Together => "Together",
        }
    }

    /// Exact, case-sensitive match of a category label against the fund set.
    pub fn from_category(category: &str) -> Option<Fund> {
        Fund::ALL.into_iter().find(|f| f.name() == category)
    }

    pub fn is_fund_category(category: &str) -> bool {
        Fund::from_category(category).is_some()
    }
}

impl fmt::Display for Fund {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Fund {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Fund::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ModelError::UnknownFund(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InvestmentKind {
    Buy,
    Sell,
    Dividend,
    Other(String),
}

impl InvestmentKind {
    pub fn from_db(s: &str) -> InvestmentKind {
        match s {
            "buy" => InvestmentKind::Buy,
            "sell" => InvestmentKind::Sell,
            "dividend" => InvestmentKind::Dividend,
            other => InvestmentKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InvestmentKind::Buy => "buy",
            InvestmentKind::Sell => "sell",
            InvestmentKind::Dividend => "dividend",
            InvestmentKind::Other(s) => s,
        }
    }
}

impl fmt::Display for InvestmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvestmentKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match InvestmentKind::from_db(&s.trim().to_lowercase()) {
            InvestmentKind::Other(other) => Err(ModelError::UnknownInvestmentKind(other)),
            known => Ok(known),
        }
    }
}

impl From<String> for InvestmentKind {
    fn from(s: String) -> Self {
        InvestmentKind::from_db(&s)
    }
}

impl From<InvestmentKind> for String {
    fn from(k: InvestmentKind) -> Self {
        k.as_str().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Stock,
    Bond,
    Crypto,
    Fund,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "stock",
            AssetType::Bond => "bond",
            AssetType::Crypto => "crypto",
            AssetType::Fund => "fund",
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stock" => Ok(AssetType::Stock),
            "bond" => Ok(AssetType::Bond),
            "crypto" => Ok(AssetType::Crypto),
            "fund" => Ok(AssetType::Fund),
            other => Err(ModelError::UnknownAssetType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub currency: Currency,
    pub r#type: TxType,
    pub category: String,
    pub description: Option<String>,
    pub source: Source,
    pub destination: Source,
    pub destination_category: Option<String>,
    pub fund: Option<String>,
}

impl Transaction {
    /// Everything but the date, in the shape shared with fixed items.
    pub fn template(&self) -> FixedItem {
        FixedItem {
            id: self.id,
            user_id: self.user_id,
            amount: self.amount,
            currency: self.currency.clone(),
            r#type: self.r#type.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            source: self.source,
            destination: self.destination,
            destination_category: self.destination_category.clone(),
            fund: self.fund.clone(),
        }
    }
}

/// Investment activity. Money fields are recorded in VND.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentTransaction {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub symbol: String,
    pub asset_type: AssetType,
    pub r#type: InvestmentKind,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
    pub tax: Decimal,
    pub note: Option<String>,
}

/// Recurring template copied into a dated transaction by `fixed generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedItem {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub currency: Currency,
    pub r#type: TxType,
    pub category: String,
    pub description: Option<String>,
    pub source: Source,
    pub destination: Source,
    pub destination_category: Option<String>,
    pub fund: Option<String>,
}

impl FixedItem {
    pub fn to_transaction(&self, date: NaiveDate) -> Transaction {
        Transaction {
            id: 0,
            user_id: self.user_id,
            date,
            amount: self.amount,
            currency: self.currency.clone(),
            r#type: self.r#type.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            source: self.source,
            destination: self.destination,
            destination_category: self.destination_category.clone(),
            fund: self.fund.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fund_lookup_is_exact() {
        assert_eq!(Fund::from_category("Saving"), Some(Fund::Saving));
        assert_eq!(Fund::from_category("saving"), None);
        assert_eq!(Fund::from_category("Salary"), None);
        assert_eq!("together".parse::<Fund>().unwrap(), Fund::Together);
    }

    #[test]
    fn source_normalizes_to_cash() {
        assert_eq!(Source::normalize(Some("bank")), Source::Bank);
        assert_eq!(Source::normalize(Some("BANK")), Source::Cash);
        assert_eq!(Source::normalize(Some("wallet")), Source::Cash);
        assert_eq!(Source::normalize(None), Source::Cash);
    }

    #[test]
    fn currency_parsing() {
        assert_eq!(Currency::from_code(" usd "), Currency::Usd);
        assert_eq!(Currency::from_code("eur"), Currency::Other("EUR".into()));
        assert!("EUR".parse::<Currency>().is_err());
        let json = serde_json::to_string(&Currency::Vnd).unwrap();
        assert_eq!(json, "\"VND\"");
    }

    #[test]
    fn unknown_types_are_kept() {
        assert_eq!(TxType::from_db("refund"), TxType::Other("refund".into()));
        assert!("refund".parse::<TxType>().is_err());
        assert_eq!("Dividend".parse::<InvestmentKind>().unwrap(), InvestmentKind::Dividend);
    }
}
