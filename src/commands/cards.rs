// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::StateStore;
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, pretty_table, required, resolve_user,
    today,
};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Serialize)]
pub struct CardRow {
    pub id: String,
    pub name: String,
    pub active: bool,
    pub annual_fee: f64,
    pub fee_balance: f64,
    pub last_paid: String,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, m)?;
    let day = today();
    let mut state = conn.load_or_seed(&user, day)?;

    match m.subcommand() {
        Some(("list", sub)) => {
            let rows: Vec<CardRow> = state
                .cards
                .iter()
                .map(|c| CardRow {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    active: state.is_active(&c.id),
                    annual_fee: state.total_annual_fee(c),
                    fee_balance: state.fee_balance(c),
                    last_paid: state
                        .annual_fee_dates
                        .get(&c.id)
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                })
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let table_rows = rows
                    .into_iter()
                    .map(|r| {
                        vec![
                            r.id,
                            r.name,
                            if r.active { "yes" } else { "no" }.to_string(),
                            fmt_money(r.annual_fee),
                            fmt_money(r.fee_balance),
                            r.last_paid,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["ID", "Card", "Active", "Annual Fee", "Left to Earn Back", "Last Paid"],
                        table_rows
                    )
                );
            }
            return Ok(());
        }
        Some(("toggle", sub)) => {
            let id = required(sub, "id")?;
            let active = state.toggle_active(id)?;
            println!(
                "Card {} is now {}",
                id,
                if active { "active" } else { "inactive" }
            );
        }
        Some(("fee", sub)) => {
            let id = required(sub, "id")?;
            let card = state.card(id)?.clone();
            let total = sub
                .get_one::<String>("total")
                .map(|s| parse_amount(s))
                .unwrap_or_else(|| state.total_annual_fee(&card));
            let balance = sub
                .get_one::<String>("balance")
                .map(|s| parse_amount(s))
                .unwrap_or_else(|| state.fee_balance(&card));
            let date = match sub.get_one::<String>("date") {
                Some(s) => parse_date(s)?,
                None => state.annual_fee_dates.get(id).copied().unwrap_or(day),
            };
            state.update_fee(id, balance, date, total)?;
            println!(
                "{}: fee {} with {} left, last paid {}",
                card.name,
                fmt_money(total),
                fmt_money(balance),
                date
            );
        }
        Some(("renew", sub)) => {
            let id = required(sub, "id")?;
            let next = state.renew_card(id, day)?;
            println!("Renewed {} through {}", id, next);
        }
        _ => return Ok(()),
    }
    conn.save(&user, &state)?;
    Ok(())
}
