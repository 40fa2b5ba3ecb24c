// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::StateStore;
use crate::ledger::Ledger;
use crate::models::{OffsetKind, TransactionRecord};
use crate::utils::{fmt_money, maybe_print_json, pretty_table, required, resolve_user, today};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("export", sub)) => export(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.card.clone(),
                    r.merchant.clone(),
                    fmt_money(r.amount),
                    fmt_money(r.fee_offset),
                    r.offsets.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Card", "Merchant", "Amount", "Fee Offset", "Offsets"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: String,
    pub date: String,
    pub card: String,
    pub merchant: String,
    pub amount: f64,
    pub fee_offset: f64,
    pub offsets: String,
}

fn describe_offsets(tx: &TransactionRecord) -> String {
    tx.offset_details
        .iter()
        .map(|d| {
            let tag = match d.kind {
                OffsetKind::Perk => "perk",
                OffsetKind::Offer => "offer",
            };
            format!("{} {} ({})", tag, d.name, fmt_money(d.value))
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// History rows, newest first, filtered by `--card` and cut at `--limit`.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>> {
    let user = resolve_user(conn, sub)?;
    let state = conn.load_or_seed(&user, today())?;
    let card_filter = sub.get_one::<String>("card").map(|s| s.trim());
    let limit = sub.get_one::<usize>("limit").copied().unwrap_or(usize::MAX);

    let data = state
        .transaction_history
        .iter()
        .filter(|t| card_filter.is_none_or(|c| t.card_id == c))
        .take(limit)
        .map(|t| TransactionRow {
            id: t.id.clone(),
            date: t.date.format("%Y-%m-%d %H:%M").to_string(),
            card: state
                .card(&t.card_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|_| t.card_id.clone()),
            merchant: t.merchant_name.clone(),
            amount: t.amount,
            fee_offset: t.fee_offset,
            offsets: describe_offsets(t),
        })
        .collect();
    Ok(data)
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let id = required(sub, "id")?;
    let ledger = Ledger::new(conn, user);
    let (_, report) = ledger.reverse(id, today())?;
    for w in &report.warnings {
        eprintln!("warning: {}", w);
    }
    println!(
        "Removed {} ({} at '{}'), restored {} to the fee balance",
        report.transaction.id,
        fmt_money(report.transaction.amount),
        report.transaction.merchant_name,
        fmt_money(report.transaction.fee_offset)
    );
    Ok(())
}

fn export(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let fmt = required(sub, "format")?.to_lowercase();
    let out = required(sub, "out")?;
    let state = conn.load_or_seed(&user, today())?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "date", "card_id", "merchant", "amount", "fee_offset", "offsets",
            ])?;
            for t in &state.transaction_history {
                wtr.write_record([
                    t.id.clone(),
                    t.date.to_rfc3339(),
                    t.card_id.clone(),
                    t.merchant_name.clone(),
                    format!("{:.2}", t.amount),
                    format!("{:.2}", t.fee_offset),
                    describe_offsets(t),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&state.transaction_history)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    println!("Exported transactions to {}", out);
    Ok(())
}
