// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Rejections raised when user input names a value outside a closed set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("unknown currency '{0}', expected VND or USD")]
    UnknownCurrency(String),
    #[error("unknown transaction type '{0}', expected income, expense or allocation")]
    UnknownTxType(String),
    #[error("unknown source '{0}', expected cash or bank")]
    UnknownSource(String),
    #[error("unknown fund '{0}', expected Saving, Support, Investment or Together")]
    UnknownFund(String),
    #[error("unknown investment type '{0}', expected buy, sell or dividend")]
    UnknownInvestmentKind(String),
    #[error("unknown asset type '{0}', expected stock, bond, crypto or fund")]
    UnknownAssetType(String),
}
