// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Card, Offer};
use crate::state::PersistedState;
use crate::valuation::{CardValuation, Purchase, calculate_card_value};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferUse {
    pub offer_id: String,
    pub offer_name: String,
    pub used_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub card: Card,
    pub total_value: f64,
    pub valuation: CardValuation,
    pub offer_details: Vec<OfferUse>,
}

/// Value every card and order them best first. Cards with equal totals keep
/// their input order.
pub fn calculate_best_cards(
    cards: &[Card],
    offers: &[Offer],
    purchase: &Purchase<'_>,
    balances: &BTreeMap<String, f64>,
    today: NaiveDate,
) -> Vec<RankedResult> {
    let mut results: Vec<RankedResult> = cards
        .iter()
        .map(|card| {
            let valuation = calculate_card_value(purchase, card, offers, balances, today);
            // offers value is split evenly; the ledger records these shares
            let matched = valuation.matched_offer_ids.len();
            let share = if matched > 0 {
                valuation.offers_value / matched as f64
            } else {
                0.0
            };
            let offer_details = valuation
                .matched_offer_ids
                .iter()
                .zip(&valuation.matched_offer_names)
                .map(|(id, name)| OfferUse {
                    offer_id: id.clone(),
                    offer_name: name.clone(),
                    used_amount: share,
                })
                .collect();
            RankedResult {
                card: card.clone(),
                total_value: valuation.total_value,
                valuation,
                offer_details,
            }
        })
        .collect();

    // sort_by is stable
    results.sort_by(|a, b| {
        b.total_value
            .partial_cmp(&a.total_value)
            .unwrap_or(Ordering::Equal)
    });
    results
}

/// Offers that may take part in a recommendation: unused, on an active card
/// and not past their expiration date.
pub fn eligible_offers(state: &PersistedState, today: NaiveDate) -> Vec<Offer> {
    state
        .active_offers
        .iter()
        .filter(|o| !o.is_used && state.is_active(&o.card_id) && !o.is_expired(today))
        .cloned()
        .collect()
}

/// Rank the active cards of `state` for `purchase`.
pub fn rank_for_state(
    state: &PersistedState,
    purchase: &Purchase<'_>,
    today: NaiveDate,
) -> Vec<RankedResult> {
    let cards = state.active_cards();
    let offers = eligible_offers(state, today);
    calculate_best_cards(&cards, &offers, purchase, &state.benefit_balances, today)
}
