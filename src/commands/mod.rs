// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod exporter;
pub mod fixed;
pub mod fx;
pub mod importer;
pub mod investments;
pub mod portfolio;
pub mod reports;
pub mod transactions;
pub mod users;

use anyhow::{Result, bail};
use rust_decimal::Decimal;

use crate::models::Currency;
use crate::utils::parse_decimal;

/// Ledger owner selected by the global `--user` flag.
pub fn user_id(m: &clap::ArgMatches) -> i64 {
    m.get_one::<i64>("user").copied().unwrap_or(crate::db::DEFAULT_USER_ID)
}

/// Display currency selected by the global `--currency` flag.
pub fn target_currency(m: &clap::ArgMatches) -> Currency {
    m.get_one::<Currency>("currency").cloned().unwrap_or_default()
}

pub(crate) fn parse_amount(raw: &str, field: &str) -> Result<Decimal> {
    let v = parse_decimal(raw)?;
    if v.is_sign_negative() && !v.is_zero() {
        bail!("{} must not be negative, got {}", field, v);
    }
    Ok(v)
}
