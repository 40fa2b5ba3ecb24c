// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::StateStore;
use crate::models::{Benefit, BenefitKind, Frequency};
use crate::utils::{
    fmt_money, maybe_print_json, parse_amount, parse_date, parse_optional_amount, pretty_table,
    required, resolve_user, today,
};
use anyhow::{Result, anyhow};
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

#[derive(Serialize)]
pub struct PerkRow {
    pub card: String,
    pub id: String,
    pub name: String,
    pub balance: f64,
    pub maximum: f64,
    pub frequency: Frequency,
    pub expires: String,
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, m)?;
    let mut state = conn.load_or_seed(&user, today())?;

    match m.subcommand() {
        Some(("list", sub)) => {
            let card_filter = sub.get_one::<String>("card").map(|s| s.trim());
            let st = &state;
            let rows: Vec<PerkRow> = st
                .cards
                .iter()
                .filter(|c| card_filter.is_none_or(|f| c.id == f))
                .flat_map(|c| {
                    c.benefits.iter().map(move |b| PerkRow {
                        card: c.id.clone(),
                        id: b.id.clone(),
                        name: b.name.clone(),
                        balance: st.benefit_balance(&b.id),
                        maximum: b.amount,
                        frequency: b.frequency,
                        expires: b
                            .expiration_date
                            .map(|d| d.to_string())
                            .unwrap_or_default(),
                    })
                })
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let table_rows = rows
                    .into_iter()
                    .map(|r| {
                        vec![
                            r.card,
                            r.id,
                            r.name,
                            format!("{} / {}", fmt_money(r.balance), fmt_money(r.maximum)),
                            format!("{:?}", r.frequency).to_lowercase(),
                            r.expires,
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["Card", "ID", "Benefit", "Balance", "Renews", "Expires"],
                        table_rows
                    )
                );
            }
            return Ok(());
        }
        Some(("add", sub)) => {
            let card_id = required(sub, "card")?;
            let id = sub
                .get_one::<String>("id")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("benefit-{}", Uuid::new_v4().simple()));
            let benefit = Benefit {
                id: id.clone(),
                name: required(sub, "name")?.to_string(),
                merchant_filter: filters(sub).unwrap_or_default(),
                amount: parse_amount(required(sub, "amount")?),
                frequency: frequency(sub)?.unwrap_or(Frequency::Monthly),
                kind: BenefitKind::Credit,
                expiration_date: expiry(sub)?,
            };
            let balance = parse_optional_amount(sub.get_one::<String>("balance"));
            state.add_benefit(card_id, benefit, balance)?;
            println!("Added benefit {} to {}", id, card_id);
        }
        Some(("edit", sub)) => {
            let card_id = required(sub, "card")?;
            let id = required(sub, "id")?;
            let mut benefit = state
                .card(card_id)?
                .benefit(id)
                .cloned()
                .ok_or_else(|| anyhow!("Benefit '{}' not found on {}", id, card_id))?;
            if let Some(name) = sub.get_one::<String>("name") {
                benefit.name = name.trim().to_string();
            }
            if let Some(amount) = parse_optional_amount(sub.get_one::<String>("amount")) {
                benefit.amount = amount;
            }
            if let Some(f) = frequency(sub)? {
                benefit.frequency = f;
            }
            if let Some(f) = filters(sub) {
                benefit.merchant_filter = f;
            }
            if let Some(exp) = expiry(sub)? {
                benefit.expiration_date = Some(exp);
            }
            let balance = parse_optional_amount(sub.get_one::<String>("balance"));
            state.update_benefit(card_id, benefit, balance)?;
            println!("Updated benefit {}", id);
        }
        Some(("set", sub)) => {
            let id = required(sub, "id")?;
            let v = state.set_benefit_balance(id, parse_amount(required(sub, "balance")?))?;
            println!("Benefit {} balance set to {}", id, fmt_money(v));
        }
        Some(("rm", sub)) => {
            let card_id = required(sub, "card")?;
            let id = required(sub, "id")?;
            state.delete_benefit(card_id, id)?;
            println!("Removed benefit {} from {}", id, card_id);
        }
        _ => return Ok(()),
    }
    conn.save(&user, &state)?;
    Ok(())
}

fn filters(sub: &clap::ArgMatches) -> Option<Vec<String>> {
    sub.get_one::<String>("filter").map(|s| {
        s.split(',')
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect()
    })
}

fn frequency(sub: &clap::ArgMatches) -> Result<Option<Frequency>> {
    sub.get_one::<String>("frequency")
        .map(|s| s.parse::<Frequency>().map_err(|e| anyhow!(e)))
        .transpose()
}

fn expiry(sub: &clap::ArgMatches) -> Result<Option<chrono::NaiveDate>> {
    sub.get_one::<String>("expires")
        .map(|s| parse_date(s))
        .transpose()
}
