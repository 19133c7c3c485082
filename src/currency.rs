// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! USD/VND conversion backed by the `exchange_rate_usd_vnd` setting.

use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use rusqlite::Connection;
use tracing::warn;

use crate::models::Currency;
use crate::utils::{get_setting, set_setting};

pub const RATE_KEY: &str = "exchange_rate_usd_vnd";

/// VND per USD when no rate has been configured.
pub const DEFAULT_RATE: Decimal = Decimal::from_parts(25000, 0, 0, false, 0);

/// Reads the configured rate on every call; nothing is cached.
pub fn exchange_rate(conn: &Connection) -> Result<Decimal> {
    match get_setting(conn, RATE_KEY)? {
        Some(raw) => raw
            .trim()
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(raw.trim()))
            .with_context(|| format!("Invalid {} setting '{}'", RATE_KEY, raw)),
        None => Ok(DEFAULT_RATE),
    }
}

pub fn set_exchange_rate(conn: &Connection, rate: Decimal) -> Result<()> {
    if rate <= Decimal::ZERO {
        bail!("Exchange rate must be positive, got {}", rate);
    }
    set_setting(conn, RATE_KEY, &rate.normalize().to_string())
}

/// Converts `amount` between VND and USD using `rate` VND per USD.
///
/// Same-currency and unsupported pairs return `amount` unchanged. A zero or
/// negative rate is never applied: the value passes through as-is rather than
/// flipping its sign or dividing by zero. Results beyond the `Decimal` range
/// clamp to `Decimal::MAX`/`Decimal::MIN`.
pub fn convert(amount: Decimal, from: &Currency, to: &Currency, rate: Decimal) -> Decimal {
    if from == to {
        return amount;
    }
    if rate <= Decimal::ZERO {
        return amount;
    }
    match (from, to) {
        (Currency::Vnd, Currency::Usd) => amount.checked_div(rate).unwrap_or_else(|| {
            warn!(%amount, %rate, "VND to USD conversion out of range, clamped");
            if amount.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            }
        }),
        (Currency::Usd, Currency::Vnd) => amount.checked_mul(rate).unwrap_or_else(|| {
            warn!(%amount, %rate, "USD to VND conversion out of range, clamped");
            amount.saturating_mul(rate)
        }),
        _ => amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn identity_and_pair() {
        let rate = dec!(25000);
        assert_eq!(convert(dec!(10), &Currency::Usd, &Currency::Usd, rate), dec!(10));
        assert_eq!(convert(dec!(50000), &Currency::Vnd, &Currency::Usd, rate), dec!(2));
        assert_eq!(convert(dec!(2), &Currency::Usd, &Currency::Vnd, rate), dec!(50000));
    }

    #[test]
    fn unsupported_pair_passes_through() {
        let eur = Currency::Other("EUR".into());
        assert_eq!(convert(dec!(12.5), &eur, &Currency::Vnd, dec!(25000)), dec!(12.5));
        assert_eq!(convert(dec!(12.5), &Currency::Usd, &eur, dec!(25000)), dec!(12.5));
    }

    #[test]
    fn round_trip_is_close() {
        let rate = dec!(24350.5);
        let x = dec!(1234567.89);
        let back = convert(
            convert(x, &Currency::Vnd, &Currency::Usd, rate),
            &Currency::Usd,
            &Currency::Vnd,
            rate,
        );
        assert!((back - x).abs() < dec!(0.000001));
    }

    #[test]
    fn zero_rate_is_passthrough() {
        assert_eq!(convert(dec!(7), &Currency::Vnd, &Currency::Usd, Decimal::ZERO), dec!(7));
    }

    #[test]
    fn negative_rate_is_passthrough() {
        assert_eq!(convert(dec!(7), &Currency::Vnd, &Currency::Usd, dec!(-25000)), dec!(7));
        assert_eq!(convert(dec!(7), &Currency::Usd, &Currency::Vnd, dec!(-25000)), dec!(7));
    }

    #[test]
    fn out_of_range_results_clamp() {
        let huge = Decimal::from_i128_with_scale(10i128.pow(25), 0);
        assert_eq!(convert(huge, &Currency::Usd, &Currency::Vnd, dec!(25000)), Decimal::MAX);
        assert_eq!(convert(-huge, &Currency::Usd, &Currency::Vnd, dec!(25000)), Decimal::MIN);
        assert_eq!(convert(Decimal::MAX, &Currency::Vnd, &Currency::Usd, dec!(0.5)), Decimal::MAX);
    }
}
