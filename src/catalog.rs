// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Built-in card catalog and the offers every new wallet starts with.
//!
//! The catalog is the reference for benefit maximums: reversing a transaction
//! looks caps up here rather than in a user's (possibly edited) card list.

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::models::{
    Benefit, BenefitKind, BonusCategory, Card, Currency, Frequency, Issuer, Offer, OfferReward,
};

static CATALOG: Lazy<Vec<Card>> = Lazy::new(build_catalog);

pub fn all_cards() -> &'static [Card] {
    &CATALOG
}

pub fn find_card(card_id: &str) -> Option<&'static Card> {
    CATALOG.iter().find(|c| c.id == card_id)
}

/// Maximum of `benefit_id` on `card_id` according to the catalog.
pub fn benefit_cap(card_id: &str, benefit_id: &str) -> Option<f64> {
    find_card(card_id)
        .and_then(|c| c.benefit(benefit_id))
        .map(|b| b.amount)
}

fn bonus(id: &str, name: &str, multiplier: f64, currency: Currency) -> BonusCategory {
    BonusCategory {
        id: id.to_string(),
        name: name.to_string(),
        multiplier,
        currency,
        cap_amount: None,
    }
}

fn credit(id: &str, name: &str, filters: &[&str], amount: f64, frequency: Frequency) -> Benefit {
    Benefit {
        id: id.to_string(),
        name: name.to_string(),
        merchant_filter: filters.iter().map(|f| f.to_string()).collect(),
        amount,
        frequency,
        kind: BenefitKind::Credit,
        expiration_date: None,
    }
}

fn build_catalog() -> Vec<Card> {
    use Currency::{Cash, MembershipRewards as MR, UltimateRewards as UR};
    use Frequency::*;

    let mut gold_groceries = bonus("gold-supermarkets", "Supermarkets", 4.0, MR);
    gold_groceries.cap_amount = Some(25_000.0);

    vec![
        Card {
            id: "amex-platinum".into(),
            name: "Amex Platinum".into(),
            issuer: Issuer::Amex,
            annual_fee: 695.0,
            base_bonus_categories: vec![
                bonus("plat-flights", "Flights", 5.0, MR),
                bonus("plat-hotels", "Hotels", 5.0, MR),
                bonus("plat-other", "Other", 1.0, MR),
            ],
            benefits: vec![
                credit("plat-uber", "Uber Cash", &["uber"], 15.0, Monthly),
                credit(
                    "plat-digital",
                    "Digital Entertainment Credit",
                    &["disney", "hulu", "espn", "peacock", "nytimes", "wall street journal"],
                    20.0,
                    Monthly,
                ),
                credit("plat-saks", "Saks Credit", &["saks"], 50.0, Quarterly),
                credit(
                    "plat-airline",
                    "Airline Fee Credit",
                    &["delta", "united", "american airlines", "jetblue", "southwest"],
                    200.0,
                    Annually,
                ),
                credit(
                    "plat-hotel",
                    "Hotel Credit",
                    &["fine hotels", "amex travel"],
                    200.0,
                    Annually,
                ),
            ],
        },
        Card {
            id: "amex-gold".into(),
            name: "Amex Gold".into(),
            issuer: Issuer::Amex,
            annual_fee: 325.0,
            base_bonus_categories: vec![
                bonus("gold-dining", "Restaurants", 4.0, MR),
                gold_groceries,
                bonus("gold-flights", "Flights", 3.0, MR),
                bonus("gold-other", "Other", 1.0, MR),
            ],
            benefits: vec![
                credit("gold-uber", "Uber Cash", &["uber"], 10.0, Monthly),
                credit(
                    "gold-dining-credit",
                    "Dining Credit",
                    &["grubhub", "cheesecake factory", "goldbelly", "wine.com", "five guys"],
                    10.0,
                    Monthly,
                ),
                credit("gold-resy", "Resy Credit", &["resy"], 50.0, Quarterly),
                credit("gold-dunkin", "Dunkin' Credit", &["dunkin"], 7.0, Monthly),
            ],
        },
        Card {
            id: "chase-sapphire-reserve".into(),
            name: "Chase Sapphire Reserve".into(),
            issuer: Issuer::Chase,
            annual_fee: 550.0,
            base_bonus_categories: vec![
                bonus("csr-chase-hotels", "Chase Hotels", 10.0, UR),
                bonus("csr-lyft", "Lyft", 10.0, UR),
                bonus("csr-travel", "Travel", 3.0, UR),
                bonus("csr-dining", "Dining", 3.0, UR),
                bonus("csr-other", "Other", 1.0, UR),
            ],
            benefits: vec![
                credit("csr-travel-credit", "Annual Travel Credit", &[], 300.0, Annually),
                credit("csr-doordash", "DoorDash Credit", &["doordash"], 5.0, Monthly),
            ],
        },
        Card {
            id: "chase-sapphire-preferred".into(),
            name: "Chase Sapphire Preferred".into(),
            issuer: Issuer::Chase,
            annual_fee: 95.0,
            base_bonus_categories: vec![
                bonus("csp-chase-hotels", "Chase Hotels", 5.0, UR),
                bonus("csp-dining", "Dining", 3.0, UR),
                bonus("csp-online-grocery", "Online Grocery", 3.0, UR),
                bonus("csp-streaming", "Streaming", 3.0, UR),
                bonus("csp-travel", "Travel", 2.0, UR),
                bonus("csp-other", "Other", 1.0, UR),
            ],
            benefits: vec![credit(
                "csp-hotel-credit",
                "Chase Travel Hotel Credit",
                &["chase travel"],
                50.0,
                Annually,
            )],
        },
        Card {
            id: "chase-freedom-unlimited".into(),
            name: "Chase Freedom Unlimited".into(),
            issuer: Issuer::Chase,
            annual_fee: 0.0,
            base_bonus_categories: vec![
                bonus("cfu-chase-travel", "Chase Hotels", 5.0, Cash),
                bonus("cfu-dining", "Dining", 3.0, Cash),
                bonus("cfu-drugstore", "Drugstore", 3.0, Cash),
                bonus("cfu-other", "Other", 1.5, Cash),
            ],
            benefits: vec![],
        },
    ]
}

/// Offers seeded into a fresh wallet.
pub fn sample_offers() -> Vec<Offer> {
    let exp = |y, m, d| NaiveDate::from_ymd_opt(y, m, d);
    vec![
        Offer {
            id: "offer-nike".into(),
            card_id: "amex-platinum".into(),
            merchant_name: "Nike".into(),
            reward: OfferReward::PercentBack {
                percent_back: 10.0,
                max_reward: Some(15.0),
            },
            expiration_date: exp(2027, 3, 31),
            is_used: false,
        },
        Offer {
            id: "offer-hilton".into(),
            card_id: "amex-gold".into(),
            merchant_name: "Hilton".into(),
            reward: OfferReward::SpendThreshold {
                min_spend: 250.0,
                fixed_reward: 50.0,
            },
            expiration_date: exp(2027, 1, 15),
            is_used: false,
        },
        Offer {
            id: "offer-sweetgreen".into(),
            card_id: "chase-sapphire-reserve".into(),
            merchant_name: "Sweetgreen".into(),
            reward: OfferReward::PercentBack {
                percent_back: 15.0,
                max_reward: Some(5.0),
            },
            expiration_date: exp(2026, 12, 31),
            is_used: false,
        },
        Offer {
            id: "offer-best-buy".into(),
            card_id: "chase-sapphire-preferred".into(),
            merchant_name: "Best Buy".into(),
            reward: OfferReward::SpendThreshold {
                min_spend: 100.0,
                fixed_reward: 20.0,
            },
            expiration_date: exp(2027, 2, 28),
            is_used: false,
        },
    ]
}
