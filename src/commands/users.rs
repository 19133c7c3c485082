// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("username").unwrap().trim();
            let role = sub.get_one::<String>("role").unwrap();
            let id = db::add_user(conn, name, role)?;
            println!("Added user '{}' ({}) with id {}", name, role, id);
        }
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            if !db::delete_user(conn, id)? {
                bail!("User #{} not found", id);
            }
            println!("Removed user #{} and their records", id);
        }
        Some(("list", sub)) => {
            let users = db::list_users(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &users)? {
                let rows = users
                    .into_iter()
                    .map(|u| vec![u.id.to_string(), u.username, u.role])
                    .collect();
                println!("{}", pretty_table(&["ID", "Username", "Role"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
