// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use parfin::{cli, commands::users, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn count(conn: &Connection, table: &str, user_id: i64) -> i64 {
    conn.query_row(
        &format!("SELECT COUNT(*) FROM {} WHERE user_id=?1", table),
        [user_id],
        |r| r.get(0),
    )
    .unwrap()
}

#[test]
fn removing_a_user_drops_their_records() {
    let conn = setup();
    let bob = db::add_user(&conn, "bob", "user").unwrap();
    conn.execute(
        "INSERT INTO transactions(user_id,amount,type,category,date) VALUES (?1,'5','income','Gift','2025-01-01')",
        [bob],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO fixed_items(user_id,amount,type,category) VALUES (?1,'5','expense','Rent')",
        [bob],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO transactions(user_id,amount,type,category,date) VALUES (1,'9','income','Salary','2025-01-01')",
        [],
    )
    .unwrap();

    let bob_id = bob.to_string();
    let matches = cli::build_cli().get_matches_from(["parfin", "user", "rm", bob_id.as_str()]);
    let (_, user_m) = matches.subcommand().unwrap();
    users::handle(&conn, user_m).unwrap();

    let names: Vec<String> = db::list_users(&conn).unwrap().into_iter().map(|u| u.username).collect();
    assert_eq!(names, vec!["admin".to_string()]);
    assert_eq!(count(&conn, "transactions", bob), 0);
    assert_eq!(count(&conn, "fixed_items", bob), 0);
    assert_eq!(count(&conn, "transactions", 1), 1);
}

#[test]
fn default_and_missing_users_are_not_removed() {
    let conn = setup();
    assert!(db::delete_user(&conn, db::DEFAULT_USER_ID).is_err());
    assert!(!db::delete_user(&conn, 42).unwrap());
    assert_eq!(db::list_users(&conn).unwrap().len(), 1);
}
