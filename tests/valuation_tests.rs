// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use whatcard::models::{
    Benefit, BenefitKind, BonusCategory, Card, Currency, Frequency, Issuer, Offer, OfferReward,
};
use whatcard::valuation::{Purchase, calculate_card_value};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

fn bonus(name: &str, multiplier: f64, currency: Currency) -> BonusCategory {
    BonusCategory {
        id: format!("b-{}", name.to_lowercase()),
        name: name.to_string(),
        multiplier,
        currency,
        cap_amount: None,
    }
}

fn benefit(id: &str, name: &str, filters: &[&str], amount: f64) -> Benefit {
    Benefit {
        id: id.to_string(),
        name: name.to_string(),
        merchant_filter: filters.iter().map(|s| s.to_string()).collect(),
        amount,
        frequency: Frequency::Monthly,
        kind: BenefitKind::Credit,
        expiration_date: None,
    }
}

fn card(id: &str, issuer: Issuer, cats: Vec<BonusCategory>, benefits: Vec<Benefit>) -> Card {
    Card {
        id: id.to_string(),
        name: id.to_string(),
        issuer,
        annual_fee: 250.0,
        base_bonus_categories: cats,
        benefits,
    }
}

fn percent_offer(id: &str, card_id: &str, merchant: &str, pct: f64, max: Option<f64>) -> Offer {
    Offer {
        id: id.to_string(),
        card_id: card_id.to_string(),
        merchant_name: merchant.to_string(),
        reward: OfferReward::PercentBack {
            percent_back: pct,
            max_reward: max,
        },
        expiration_date: None,
        is_used: false,
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn travel_multiplier_beats_other() {
    let c = card(
        "mr",
        Issuer::Amex,
        vec![
            bonus("Other", 1.0, Currency::MembershipRewards),
            bonus("Travel", 3.0, Currency::MembershipRewards),
        ],
        vec![],
    );
    let p = Purchase::new("Delta Airlines", 100.0, "Travel");
    let v = calculate_card_value(&p, &c, &[], &BTreeMap::new(), today());

    assert_eq!(v.multiplier, 3.0);
    assert!(close(v.points_earned, 300.0));
    assert!(close(v.points_value, 6.0));
    assert_eq!(v.benefits_value, 0.0);
    assert_eq!(v.offers_value, 0.0);
    assert!(close(v.total_value, 6.0));
    assert_eq!(v.matched_category, "Travel");
}

#[test]
fn uber_credit_covers_purchase_and_zeroes_points() {
    let c = card(
        "plat",
        Issuer::Amex,
        vec![bonus("Other", 1.0, Currency::MembershipRewards)],
        vec![benefit("uber", "Uber Cash", &["uber"], 50.0)],
    );
    let balances = BTreeMap::from([("uber".to_string(), 50.0)]);
    let p = Purchase::new("Uber Eats", 20.0, "Dining");
    let v = calculate_card_value(&p, &c, &[], &balances, today());

    assert_eq!(v.benefits_value, 20.0);
    assert_eq!(v.points_value, 0.0);
    assert_eq!(v.total_value, 20.0);
    assert_eq!(v.matched_benefit_ids, vec!["uber".to_string()]);
    assert_eq!(v.benefit_details[0].used_amount, 20.0);
}

#[test]
fn percent_offer_is_capped() {
    let c = card(
        "chase",
        Issuer::Chase,
        vec![bonus("Other", 1.0, Currency::UltimateRewards)],
        vec![],
    );
    let offers = vec![percent_offer("nike", "chase", "Nike", 10.0, Some(15.0))];
    let p = Purchase::new("Nike Store", 200.0, "Shopping");
    let v = calculate_card_value(&p, &c, &offers, &BTreeMap::new(), today());

    assert_eq!(v.offers_value, 15.0);
    assert_eq!(v.matched_offer_names, vec!["Nike".to_string()]);
}

#[test]
fn offers_on_other_cards_are_ignored_and_matches_stack() {
    let c = card(
        "gold",
        Issuer::Amex,
        vec![bonus("Other", 1.0, Currency::MembershipRewards)],
        vec![],
    );
    let offers = vec![
        percent_offer("a", "gold", "nike", 5.0, None),
        Offer {
            id: "b".into(),
            card_id: "gold".into(),
            merchant_name: "NIKE".into(),
            reward: OfferReward::SpendThreshold {
                min_spend: 50.0,
                fixed_reward: 10.0,
            },
            expiration_date: None,
            is_used: false,
        },
        Offer {
            id: "c".into(),
            card_id: "gold".into(),
            merchant_name: "Nike".into(),
            reward: OfferReward::SpendThreshold {
                min_spend: 500.0,
                fixed_reward: 100.0,
            },
            expiration_date: None,
            is_used: false,
        },
        percent_offer("d", "someone-else", "Nike", 50.0, None),
    ];
    let p = Purchase::new("Nike Outlet", 100.0, "Shopping");
    let v = calculate_card_value(&p, &c, &offers, &BTreeMap::new(), today());

    // 5% of 100 plus the fixed 10; the 500 minimum is not met
    assert!(close(v.offers_value, 15.0));
    assert_eq!(v.matched_offer_ids, vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn stacked_perks_each_cover_the_full_amount() {
    let c = card(
        "plat",
        Issuer::Amex,
        vec![bonus("Other", 1.0, Currency::MembershipRewards)],
        vec![
            benefit("uber", "Uber Cash", &["uber"], 15.0),
            benefit("ride", "Ride Credit", &["uber"], 50.0),
        ],
    );
    let balances = BTreeMap::from([("uber".to_string(), 15.0), ("ride".to_string(), 50.0)]);
    let p = Purchase::new("Uber", 30.0, "Travel");
    let v = calculate_card_value(&p, &c, &[], &balances, today());

    // 15 + 30 in value, but the points base only drops to zero
    assert_eq!(v.benefits_value, 45.0);
    assert_eq!(v.points_value, 0.0);
    assert_eq!(v.total_value, 45.0);
}

#[test]
fn expired_and_empty_benefits_are_skipped() {
    let mut expired = benefit("old", "Old Credit", &["shop"], 20.0);
    expired.expiration_date = NaiveDate::from_ymd_opt(2026, 10, 17);
    let mut today_only = benefit("edge", "Edge Credit", &["shop"], 20.0);
    today_only.expiration_date = Some(today());
    let c = card(
        "x",
        Issuer::Chase,
        vec![bonus("Other", 1.0, Currency::Cash)],
        vec![expired, today_only, benefit("empty", "Empty Credit", &["shop"], 20.0)],
    );
    let balances = BTreeMap::from([
        ("old".to_string(), 20.0),
        ("edge".to_string(), 5.0),
        ("empty".to_string(), 0.0),
    ]);
    let p = Purchase::new("Shop Co", 10.0, "Shopping");
    let v = calculate_card_value(&p, &c, &[], &balances, today());

    assert_eq!(v.matched_benefit_ids, vec!["edge".to_string()]);
    assert_eq!(v.benefits_value, 5.0);
    // five uncovered dollars at 1x cash
    assert!(close(v.points_value, 0.05));
}

#[test]
fn benefit_override_matches_by_exact_name_only() {
    let c = card(
        "csr",
        Issuer::Chase,
        vec![bonus("Other", 1.0, Currency::UltimateRewards)],
        vec![
            benefit("travel", "Annual Travel Credit", &[], 300.0),
            benefit("dd", "DoorDash Credit", &["doordash"], 5.0),
        ],
    );
    let balances = BTreeMap::from([("travel".to_string(), 300.0), ("dd".to_string(), 5.0)]);
    let p = Purchase::new("DoorDash", 40.0, "Dining").with_benefit(Some("Annual Travel Credit"));
    let v = calculate_card_value(&p, &c, &[], &balances, today());

    assert_eq!(v.matched_benefit_names, vec!["Annual Travel Credit".to_string()]);
    assert_eq!(v.benefits_value, 40.0);
}

#[test]
fn travel_named_benefit_matches_travel_categories() {
    let c = card(
        "csr",
        Issuer::Chase,
        vec![bonus("Other", 1.0, Currency::UltimateRewards)],
        vec![benefit("travel", "Annual Travel Credit", &[], 300.0)],
    );
    let balances = BTreeMap::from([("travel".to_string(), 300.0)]);
    for cat in ["Travel", "flights", "Hotels"] {
        let v = calculate_card_value(
            &Purchase::new("Somewhere", 120.0, cat),
            &c,
            &[],
            &balances,
            today(),
        );
        assert_eq!(v.benefits_value, 120.0, "category {}", cat);
    }
    let v = calculate_card_value(
        &Purchase::new("Somewhere", 120.0, "Dining"),
        &c,
        &[],
        &balances,
        today(),
    );
    assert_eq!(v.benefits_value, 0.0);
}

#[test]
fn ties_keep_the_first_matching_category() {
    let c = card(
        "csr",
        Issuer::Chase,
        vec![
            bonus("Dining", 3.0, Currency::UltimateRewards),
            bonus("Restaurants", 3.0, Currency::Cash),
            bonus("Other", 1.0, Currency::UltimateRewards),
        ],
        vec![],
    );
    let v = calculate_card_value(
        &Purchase::new("Joe's Grill", 10.0, "Dining"),
        &c,
        &[],
        &BTreeMap::new(),
        today(),
    );
    assert_eq!(v.matched_category, "Dining");
    assert_eq!(v.currency, Currency::UltimateRewards);
}

#[test]
fn default_currency_follows_issuer_without_other_category() {
    let amex = card("a", Issuer::Amex, vec![], vec![]);
    let chase = card("c", Issuer::Chase, vec![], vec![]);
    let p = Purchase::new("Anything", 100.0, "Other");

    let va = calculate_card_value(&p, &amex, &[], &BTreeMap::new(), today());
    let vc = calculate_card_value(&p, &chase, &[], &BTreeMap::new(), today());
    assert_eq!(va.currency, Currency::MembershipRewards);
    assert_eq!(va.multiplier, 1.0);
    assert!(close(va.points_value, 2.0));
    assert_eq!(vc.currency, Currency::UltimateRewards);
    assert!(close(vc.points_value, 2.05));
    assert_eq!(vc.matched_category, "Other");
}

#[test]
fn total_is_exact_sum_of_parts() {
    let c = card(
        "mix",
        Issuer::Amex,
        vec![
            bonus("Other", 1.0, Currency::MembershipRewards),
            bonus("Dining", 4.0, Currency::MembershipRewards),
        ],
        vec![benefit("resy", "Resy Credit", &["resy"], 7.33)],
    );
    let offers = vec![percent_offer("o", "mix", "resy", 7.5, None)];
    let balances = BTreeMap::from([("resy".to_string(), 7.33)]);
    for amount in [0.0, 3.21, 19.99, 123.45] {
        let v = calculate_card_value(
            &Purchase::new("Resy Bistro", amount, "Dining"),
            &c,
            &offers,
            &balances,
            today(),
        );
        assert_eq!(v.total_value, v.points_value + v.benefits_value + v.offers_value);
    }
}
