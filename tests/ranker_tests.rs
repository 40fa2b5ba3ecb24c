// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use whatcard::models::{BonusCategory, Card, Currency, Issuer, Offer, OfferReward};
use whatcard::ranker::{calculate_best_cards, eligible_offers, rank_for_state};
use whatcard::state::PersistedState;
use whatcard::valuation::Purchase;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn flat_card(id: &str, multiplier: f64) -> Card {
    Card {
        id: id.to_string(),
        name: format!("Card {}", id),
        issuer: Issuer::Chase,
        annual_fee: 0.0,
        base_bonus_categories: vec![BonusCategory {
            id: format!("{}-other", id),
            name: "Other".into(),
            multiplier,
            currency: Currency::Cash,
            cap_amount: None,
        }],
        benefits: vec![],
    }
}

fn offer(id: &str, card_id: &str, merchant: &str, reward: OfferReward) -> Offer {
    Offer {
        id: id.to_string(),
        card_id: card_id.to_string(),
        merchant_name: merchant.to_string(),
        reward,
        expiration_date: None,
        is_used: false,
    }
}

#[test]
fn results_are_sorted_by_total_value() {
    let cards = vec![flat_card("a", 1.0), flat_card("b", 3.0), flat_card("c", 2.0)];
    let p = Purchase::new("Corner Store", 100.0, "Other");
    let ranked = calculate_best_cards(&cards, &[], &p, &BTreeMap::new(), today());

    let ids: Vec<&str> = ranked.iter().map(|r| r.card.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
    assert!((ranked[0].total_value - 3.0).abs() < 1e-9);
    assert_eq!(ranked[0].total_value, ranked[0].valuation.total_value);
}

#[test]
fn equal_totals_keep_input_order() {
    let cards = vec![flat_card("first", 2.0), flat_card("second", 2.0), flat_card("third", 2.0)];
    let p = Purchase::new("Corner Store", 50.0, "Other");
    let ranked = calculate_best_cards(&cards, &[], &p, &BTreeMap::new(), today());

    let ids: Vec<&str> = ranked.iter().map(|r| r.card.id.as_str()).collect();
    assert_eq!(ids, vec!["first", "second", "third"]);
}

#[test]
fn offer_value_is_split_evenly_across_matches() {
    let cards = vec![flat_card("a", 1.0)];
    let offers = vec![
        offer(
            "pct",
            "a",
            "Nike",
            OfferReward::PercentBack {
                percent_back: 5.0,
                max_reward: None,
            },
        ),
        offer(
            "fixed",
            "a",
            "Nike",
            OfferReward::SpendThreshold {
                min_spend: 50.0,
                fixed_reward: 10.0,
            },
        ),
    ];
    let p = Purchase::new("Nike", 100.0, "Shopping");
    let ranked = calculate_best_cards(&cards, &offers, &p, &BTreeMap::new(), today());

    let details = &ranked[0].offer_details;
    assert_eq!(details.len(), 2);
    // 5 + 10 shared as 7.5 each, not attributed per offer
    assert!(details.iter().all(|d| (d.used_amount - 7.5).abs() < 1e-9));
    assert_eq!(details[0].offer_id, "pct");
    assert_eq!(details[1].offer_name, "Nike");
}

#[test]
fn no_offer_details_without_matches() {
    let cards = vec![flat_card("a", 1.0)];
    let p = Purchase::new("Grocer", 10.0, "Groceries");
    let ranked = calculate_best_cards(&cards, &[], &p, &BTreeMap::new(), today());
    assert!(ranked[0].offer_details.is_empty());
}

#[test]
fn eligible_offers_drop_used_inactive_and_expired() {
    let mut state = PersistedState::default_state(today());
    state.mark_offer_used("offer-hilton").unwrap();
    state.toggle_active("chase-sapphire-preferred").unwrap();
    state
        .active_offers
        .iter_mut()
        .find(|o| o.id == "offer-sweetgreen")
        .unwrap()
        .expiration_date = NaiveDate::from_ymd_opt(2026, 10, 17);

    let ids: Vec<String> = eligible_offers(&state, today())
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(ids, vec!["offer-nike".to_string()]);
}

#[test]
fn offer_expiring_today_is_still_eligible() {
    let mut state = PersistedState::default_state(today());
    state.active_offers[0].expiration_date = Some(today());
    assert!(
        eligible_offers(&state, today())
            .iter()
            .any(|o| o.id == state.active_offers[0].id)
    );
}

#[test]
fn default_wallet_prefers_platinum_for_nike() {
    let state = PersistedState::default_state(today());
    let p = Purchase::new("Nike", 200.0, "Shopping");
    let ranked = rank_for_state(&state, &p, today());

    assert_eq!(ranked.len(), state.active_card_ids.len());
    assert_eq!(ranked[0].card.id, "amex-platinum");
    // 200 MR at 2 cents plus the 15 dollar offer cap
    assert!((ranked[0].total_value - 19.0).abs() < 1e-9);
    assert_eq!(ranked[0].offer_details[0].offer_id, "offer-nike");
}

#[test]
fn inactive_cards_are_not_ranked() {
    let mut state = PersistedState::default_state(today());
    state.toggle_active("amex-platinum").unwrap();
    let p = Purchase::new("Nike", 200.0, "Shopping");
    let ranked = rank_for_state(&state, &p, today());

    assert!(ranked.iter().all(|r| r.card.id != "amex-platinum"));
    // 1x UR at 2.05 cents
    assert_eq!(ranked[0].card.id, "chase-sapphire-reserve");
    assert!((ranked[0].total_value - 4.1).abs() < 1e-9);
}
