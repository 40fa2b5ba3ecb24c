// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::classifier::{category_for_benefit, guess_category};
use crate::db::StateStore;
use crate::ledger::Ledger;
use crate::ranker::{RankedResult, rank_for_state};
use crate::utils::{
    fmt_money, maybe_print_json, parse_spend, pretty_table, required, resolve_user, today,
};
use crate::valuation::Purchase;
use anyhow::{Result, anyhow};
use rusqlite::Connection;

/// Category used when neither a benefit nor the merchant suggests one.
pub const DEFAULT_CATEGORY: &str = "Dining";

/// Category for a purchase: explicit choice, else the category implied by a
/// chosen benefit, else a guess from the merchant, else the default.
pub fn resolve_category(explicit: Option<&str>, benefit: Option<&str>, merchant: &str) -> String {
    if let Some(c) = explicit.map(str::trim).filter(|c| !c.is_empty()) {
        return c.to_string();
    }
    if let Some(b) = benefit.filter(|b| !b.is_empty()) {
        return category_for_benefit(b).to_string();
    }
    guess_category(merchant)
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string()
}

pub fn handle(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, sub)?;
    let merchant = required(sub, "merchant")?;
    let amount = parse_spend(required(sub, "amount")?);
    let benefit = sub.get_one::<String>("benefit").map(|s| s.trim());
    let category = resolve_category(
        sub.get_one::<String>("category").map(|s| s.as_str()),
        benefit,
        merchant,
    );
    let day = today();

    let ranked = rank(conn, &user, merchant, amount, &category, benefit)?;

    if !sub.get_flag("use") {
        if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &ranked)? {
            println!("Category: {}", category);
            println!("{}", ranking_table(&ranked));
        }
        return Ok(());
    }

    let pick = *sub.get_one::<usize>("pick").unwrap_or(&1);
    let chosen = pick
        .checked_sub(1)
        .and_then(|i| ranked.get(i))
        .ok_or_else(|| anyhow!("No card at rank {} ({} ranked)", pick, ranked.len()))?;
    let ledger = Ledger::new(conn, user);
    let (state, tx_id) = ledger.apply(chosen, merchant, amount, day)?;
    let fee_left = state.fee_balance(&chosen.card);
    println!(
        "Recorded {} at '{}' on {} ({}): offset {}, fee balance now {}",
        fmt_money(amount),
        merchant,
        chosen.card.name,
        tx_id,
        fmt_money(chosen.valuation.benefits_value + chosen.valuation.offers_value),
        fmt_money(fee_left)
    );
    Ok(())
}

pub fn rank(
    store: &impl StateStore,
    user: &str,
    merchant: &str,
    amount: f64,
    category: &str,
    benefit: Option<&str>,
) -> Result<Vec<RankedResult>> {
    let day = today();
    let state = store.load_or_seed(user, day)?;
    let purchase = Purchase::new(merchant, amount, category).with_benefit(benefit);
    Ok(rank_for_state(&state, &purchase, day))
}

fn ranking_table(ranked: &[RankedResult]) -> comfy_table::Table {
    let rows = ranked
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let v = &r.valuation;
            let mut matched: Vec<String> = v.matched_benefit_names.clone();
            matched.extend(v.matched_offer_names.iter().map(|n| format!("offer: {}", n)));
            vec![
                (i + 1).to_string(),
                r.card.name.clone(),
                fmt_money(r.total_value),
                format!(
                    "{}x {} ({})",
                    v.multiplier,
                    v.currency.code(),
                    v.matched_category
                ),
                fmt_money(v.points_value),
                fmt_money(v.benefits_value),
                fmt_money(v.offers_value),
                matched.join(", "),
            ]
        })
        .collect();
    pretty_table(
        &["#", "Card", "Total", "Earn", "Points", "Perks", "Offers", "Matched"],
        rows,
    )
}
