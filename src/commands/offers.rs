// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::StateStore;
use crate::models::{Offer, OfferReward};
use crate::ranker::eligible_offers;
use crate::utils::{
    maybe_print_json, parse_date, parse_optional_amount, pretty_table, required, resolve_user,
    today,
};
use anyhow::{Result, bail};
use rusqlite::Connection;
use serde::Serialize;
use uuid::Uuid;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, m)?;
    let day = today();
    let mut state = conn.load_or_seed(&user, day)?;

    match m.subcommand() {
        Some(("add", sub)) => {
            let card_id = required(sub, "card")?.to_string();
            let merchant = required(sub, "merchant")?.to_string();
            let reward = match reward_from_args(sub, None) {
                Some(r) => r,
                None => bail!("Give --percent or --min-spend/--reward"),
            };
            let id = sub
                .get_one::<String>("id")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("custom-{}", Uuid::new_v4().simple()));
            let offer = Offer {
                id: id.clone(),
                card_id,
                merchant_name: merchant,
                reward,
                expiration_date: expiry(sub)?,
                is_used: false,
            };
            let terms = offer.reward.describe();
            state.add_offer(offer)?;
            println!("Added offer {} ({})", id, terms);
        }
        Some(("edit", sub)) => {
            let id = required(sub, "id")?;
            let mut offer = state
                .active_offers
                .iter()
                .find(|o| o.id == id)
                .cloned()
                .ok_or_else(|| crate::error::EngineError::not_found("offer", id))?;
            if let Some(card) = sub.get_one::<String>("card") {
                state.card(card.trim())?;
                offer.card_id = card.trim().to_string();
            }
            if let Some(merchant) = sub.get_one::<String>("merchant") {
                offer.merchant_name = merchant.trim().to_string();
            }
            if let Some(reward) = reward_from_args(sub, Some(&offer.reward)) {
                offer.reward = reward;
            }
            if let Some(exp) = expiry(sub)? {
                offer.expiration_date = Some(exp);
            }
            let id = offer.id.clone();
            state.update_offer(offer)?;
            println!("Updated offer {}", id);
        }
        Some(("list", sub)) => {
            let offers = if sub.get_flag("eligible") {
                eligible_offers(&state, day)
            } else {
                state.active_offers.clone()
            };
            let rows: Vec<OfferRow> = offers
                .iter()
                .map(|o| OfferRow {
                    id: o.id.clone(),
                    card: o.card_id.clone(),
                    merchant: o.merchant_name.clone(),
                    terms: o.reward.describe(),
                    expires: o
                        .expiration_date
                        .map(|d| d.to_string())
                        .unwrap_or_default(),
                    status: if o.is_used {
                        "used"
                    } else if o.is_expired(day) {
                        "expired"
                    } else {
                        "open"
                    }
                    .to_string(),
                })
                .collect();
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let table_rows = rows
                    .into_iter()
                    .map(|r| vec![r.id, r.card, r.merchant, r.terms, r.expires, r.status])
                    .collect();
                println!(
                    "{}",
                    pretty_table(
                        &["ID", "Card", "Merchant", "Terms", "Expires", "Status"],
                        table_rows
                    )
                );
            }
            return Ok(());
        }
        Some(("used", sub)) => {
            let id = required(sub, "id")?;
            state.mark_offer_used(id)?;
            println!("Marked offer {} as used", id);
        }
        Some(("rm", sub)) => {
            let id = required(sub, "id")?;
            state.delete_offer(id)?;
            println!("Removed offer {}", id);
        }
        _ => return Ok(()),
    }
    conn.save(&user, &state)?;
    Ok(())
}

#[derive(Serialize)]
pub struct OfferRow {
    pub id: String,
    pub card: String,
    pub merchant: String,
    pub terms: String,
    pub expires: String,
    pub status: String,
}

fn expiry(sub: &clap::ArgMatches) -> Result<Option<chrono::NaiveDate>> {
    sub.get_one::<String>("expires")
        .map(|s| parse_date(s))
        .transpose()
}

/// Reward terms from `--percent/--max` or `--min-spend/--reward`. Fields not
/// given keep the values of `current` when it has the same shape.
fn reward_from_args(
    sub: &clap::ArgMatches,
    current: Option<&OfferReward>,
) -> Option<OfferReward> {
    let percent = parse_optional_amount(sub.get_one::<String>("percent"));
    let max = parse_optional_amount(sub.get_one::<String>("max"));
    let min_spend = parse_optional_amount(sub.get_one::<String>("min-spend"));
    let fixed = parse_optional_amount(sub.get_one::<String>("reward"));

    if percent.is_some() || max.is_some() {
        let (cur_pct, cur_max) = match current {
            Some(OfferReward::PercentBack {
                percent_back,
                max_reward,
            }) => (*percent_back, *max_reward),
            _ => (0.0, None),
        };
        return Some(OfferReward::PercentBack {
            percent_back: percent.unwrap_or(cur_pct),
            max_reward: max.filter(|m| *m > 0.0).or(cur_max),
        });
    }
    if min_spend.is_some() || fixed.is_some() {
        let (cur_min, cur_fixed) = match current {
            Some(OfferReward::SpendThreshold {
                min_spend,
                fixed_reward,
            }) => (*min_spend, *fixed_reward),
            _ => (0.0, 0.0),
        };
        return Some(OfferReward::SpendThreshold {
            min_spend: min_spend.unwrap_or(cur_min),
            fixed_reward: fixed.unwrap_or(cur_fixed),
        });
    }
    None
}
