// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::str::FromStr;

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

use crate::models::{AssetType, Currency, InvestmentKind, Source, TxType};

const PERIODS: [&str; 6] = [
    "this_month",
    "last_month",
    "this_year",
    "last_year",
    "custom",
    "all",
];

fn json_args() -> [Arg; 2] {
    [
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    ]
}

/// Arguments shared by ledger entries and fixed-item templates.
fn entry_args() -> Vec<Arg> {
    vec![
        Arg::new("type")
            .long("type")
            .required(true)
            .value_parser(TxType::from_str)
            .help("income | expense | allocation"),
        Arg::new("amount")
            .long("amount")
            .required(true)
            .allow_negative_numbers(true),
        Arg::new("category").long("category").required(true),
        Arg::new("ccy")
            .long("ccy")
            .value_parser(Currency::from_str)
            .help("Currency of the amount (default VND)"),
        Arg::new("source")
            .long("source")
            .value_parser(Source::from_str)
            .help("cash | bank (default cash)"),
        Arg::new("destination")
            .long("destination")
            .value_parser(Source::from_str)
            .help("Allocation target side: cash | bank"),
        Arg::new("dest-category")
            .long("dest-category")
            .help("Allocation target bucket, e.g. Saving"),
        Arg::new("fund")
            .long("fund")
            .help("Pay an expense out of this fund"),
        Arg::new("description").long("description").short('d'),
    ]
}

/// The entry flags with nothing required, for in-place edits.
fn edit_args() -> impl Iterator<Item = Arg> {
    entry_args().into_iter().map(|a| a.required(false))
}

fn id_arg() -> Arg {
    Arg::new("id")
        .required(true)
        .value_parser(value_parser!(i64))
}

fn range_args() -> [Arg; 3] {
    [
        Arg::new("period")
            .long("period")
            .value_parser(PERIODS)
            .help("Reporting window"),
        Arg::new("from")
            .long("from")
            .help("Custom start date YYYY-MM-DD"),
        Arg::new("to").long("to").help("Custom end date YYYY-MM-DD"),
    ]
}

pub fn build_cli() -> Command {
    Command::new("parfin")
        .version(crate_version!())
        .about("Personal ledger with fund buckets, period statistics and an average-cost portfolio")
        .arg(
            Arg::new("db")
                .long("db")
                .global(true)
                .help("SQLite database path (overrides PARFIN_DB)"),
        )
        .arg(
            Arg::new("user")
                .long("user")
                .short('u')
                .global(true)
                .default_value("1")
                .value_parser(value_parser!(i64))
                .help("Ledger owner id"),
        )
        .arg(
            Arg::new("currency")
                .long("currency")
                .short('c')
                .global(true)
                .default_value("VND")
                .value_parser(Currency::from_str)
                .help("Display currency: VND | USD"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable debug logging"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("user")
                .about("Ledger owners")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("username").required(true))
                        .arg(
                            Arg::new("role")
                                .long("role")
                                .default_value("user")
                                .value_parser(["user", "admin"]),
                        ),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a user and everything they own")
                        .arg(id_arg()),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Ledger transactions")
                .subcommand(
                    Command::new("add")
                        .args(entry_args())
                        .arg(Arg::new("date").long("date").required(true)),
                )
                .subcommand(
                    Command::new("list")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .conflicts_with_all(["period", "from", "to"])
                                .help("YYYY-MM"),
                        )
                        .args(range_args())
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .args(json_args()),
                )
                .subcommand(
                    Command::new("edit")
                        .about("Change the given fields of a transaction")
                        .arg(id_arg())
                        .args(edit_args())
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("invest")
                .about("Investment activity (money fields in VND)")
                .subcommand(
                    Command::new("add")
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .required(true)
                                .value_parser(InvestmentKind::from_str)
                                .help("buy | sell | dividend"),
                        )
                        .arg(Arg::new("symbol").long("symbol").required(true))
                        .arg(
                            Arg::new("asset-type")
                                .long("asset-type")
                                .default_value("stock")
                                .value_parser(AssetType::from_str),
                        )
                        .arg(Arg::new("quantity").long("quantity").required(true))
                        .arg(Arg::new("price").long("price").required(true))
                        .arg(Arg::new("fee").long("fee"))
                        .arg(Arg::new("tax").long("tax"))
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("note").long("note")),
                )
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(Command::new("rm").arg(id_arg())),
        )
        .subcommand(
            Command::new("fixed")
                .about("Recurring transaction templates")
                .subcommand(Command::new("add").args(entry_args()))
                .subcommand(Command::new("list").args(json_args()))
                .subcommand(
                    Command::new("edit")
                        .about("Change the given fields of a template")
                        .arg(id_arg())
                        .args(edit_args()),
                )
                .subcommand(Command::new("rm").arg(id_arg()))
                .subcommand(
                    Command::new("generate")
                        .about("Copy every template into a transaction")
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .help("Transaction date (default today)"),
                        ),
                ),
        )
        .subcommand(
            Command::new("report").about("Balances and statistics").subcommand(
                Command::new("balances")
                    .about("Balances plus period statistics (default window: this month)")
                    .args(range_args())
                    .args(json_args()),
            ),
        )
        .subcommand(
            Command::new("portfolio")
                .about("Holdings valued at average cost")
                .subcommand(Command::new("value").args(json_args())),
        )
        .subcommand(
            Command::new("fx")
                .about("USD/VND exchange rate")
                .subcommand(
                    Command::new("set-rate").arg(
                        Arg::new("rate")
                            .required(true)
                            .help("VND per 1 USD"),
                    ),
                )
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("convert")
                        .arg(Arg::new("amount").required(true))
                        .arg(Arg::new("from").long("from").required(true))
                        .arg(Arg::new("to").long("to").required(true)),
                ),
        )
        .subcommand(
            Command::new("import").about("Load transactions from a file").subcommand(
                Command::new("transactions")
                    .arg(Arg::new("path").required(true))
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .value_parser(["csv", "json"])
                            .help("Defaults to the file extension"),
                    ),
            ),
        )
        .subcommand(
            Command::new("export").about("Write transactions to a file").subcommand(
                Command::new("transactions")
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .value_parser(["csv", "json"]),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(Arg::new("month").long("month").help("YYYY-MM")),
            ),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::transactions::range_from_args;
    use crate::period::{DateRange, resolve_today};
    use chrono::NaiveDate;

    #[test]
    fn cli_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn globals_reach_subcommands() {
        let m = build_cli().get_matches_from([
            "parfin", "report", "balances", "--currency", "usd", "--user", "7",
        ]);
        let (_, report) = m.subcommand().unwrap();
        let (_, balances) = report.subcommand().unwrap();
        assert_eq!(balances.get_one::<Currency>("currency"), Some(&Currency::Usd));
        assert_eq!(balances.get_one::<i64>("user"), Some(&7));
    }

    fn balances_range(args: &[&str]) -> DateRange {
        let argv = ["parfin", "report", "balances"].iter().chain(args.iter()).copied();
        let m = build_cli().get_matches_from(argv);
        let (_, report) = m.subcommand().unwrap();
        let (_, balances) = report.subcommand().unwrap();
        range_from_args(balances, "this_month").unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn report_window_defaults_to_this_month() {
        assert_eq!(balances_range(&[]), resolve_today("this_month", None, None));
    }

    #[test]
    fn report_bounds_alone_select_custom_window() {
        let r = balances_range(&["--from", "2020-01-01", "--to", "2020-12-31"]);
        assert_eq!(r.start, Some(d(2020, 1, 1)));
        assert_eq!(r.end, Some(d(2020, 12, 31)));

        let r = balances_range(&["--from", "2020-06-01"]);
        assert_eq!(r.start, Some(d(2020, 6, 1)));
        assert_eq!(r.end, None);
    }

    #[test]
    fn report_named_period_wins() {
        assert_eq!(balances_range(&["--period", "all"]), DateRange::unbounded());
        assert_eq!(
            balances_range(&["--period", "last_year"]),
            resolve_today("last_year", None, None)
        );
    }
}
