// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use parfin::{cli, commands, db, log::init_logging};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    init_logging(matches.get_flag("verbose"));

    let db_override = matches.get_one::<String>("db").map(String::as_str);
    let mut conn = db::open_or_init(db_override)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            match db_override {
                Some(p) => println!("Database initialized at {}", p),
                None => println!("Database initialized at {}", db::db_path()?.display()),
            }
            Ok(())
        }
        Some(("user", sub)) => commands::users::handle(&conn, sub),
        Some(("tx", sub)) => commands::transactions::handle(&conn, sub),
        Some(("invest", sub)) => commands::investments::handle(&conn, sub),
        Some(("fixed", sub)) => commands::fixed::handle(&mut conn, sub),
        Some(("report", sub)) => commands::reports::handle(&conn, sub),
        Some(("portfolio", sub)) => commands::portfolio::handle(&conn, sub),
        Some(("fx", sub)) => commands::fx::handle(&conn, sub),
        Some(("import", sub)) => commands::importer::handle(&mut conn, sub),
        Some(("export", sub)) => commands::exporter::handle(&conn, sub),
        _ => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    }
}
