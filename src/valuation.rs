// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Values one card for one hypothetical purchase.
//!
//! Three independent passes are summed: statement credits (perks), points
//! or cashback on the part of the purchase no credit covered, and merchant
//! offers enrolled on the card.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::matcher::is_category_match;
use crate::models::{BenefitKind, Card, Currency, Issuer, Offer, OTHER_CATEGORY};

const TRAVEL_BENEFIT_CATEGORIES: &[&str] = &["travel", "flights", "hotels"];

/// The purchase being evaluated.
#[derive(Debug, Clone, Copy)]
pub struct Purchase<'a> {
    pub merchant: &'a str,
    pub amount: f64,
    pub category: &'a str,
    /// When set, only the benefit with exactly this name is considered.
    pub benefit_override: Option<&'a str>,
}

impl<'a> Purchase<'a> {
    pub fn new(merchant: &'a str, amount: f64, category: &'a str) -> Self {
        Self {
            merchant,
            amount,
            category,
            benefit_override: None,
        }
    }

    pub fn with_benefit(mut self, name: Option<&'a str>) -> Self {
        self.benefit_override = name.filter(|n| !n.is_empty());
        self
    }

    /// Amount the passes work with: negative or non-finite input counts as 0.
    pub fn spend(&self) -> f64 {
        if self.amount.is_finite() {
            self.amount.max(0.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BenefitUse {
    pub benefit_id: String,
    pub used_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardValuation {
    pub total_value: f64,
    pub points_value: f64,
    pub benefits_value: f64,
    pub offers_value: f64,
    pub points_earned: f64,
    pub multiplier: f64,
    pub currency: Currency,
    pub matched_category: String,
    pub matched_benefit_ids: Vec<String>,
    pub matched_benefit_names: Vec<String>,
    pub matched_offer_ids: Vec<String>,
    pub matched_offer_names: Vec<String>,
    pub benefit_details: Vec<BenefitUse>,
}

struct PerkPass {
    value: f64,
    covered: f64,
    ids: Vec<String>,
    names: Vec<String>,
    details: Vec<BenefitUse>,
}

struct OfferPass {
    value: f64,
    ids: Vec<String>,
    names: Vec<String>,
}

struct PointsPass {
    multiplier: f64,
    currency: Currency,
    category: String,
}

/// Value `card` for `purchase`, given the user's offers and perk balances.
pub fn calculate_card_value(
    purchase: &Purchase<'_>,
    card: &Card,
    offers: &[Offer],
    balances: &BTreeMap<String, f64>,
    today: NaiveDate,
) -> CardValuation {
    let merchant = purchase.merchant.to_lowercase();
    let category = purchase.category.to_lowercase();

    let amount = purchase.spend();
    let perks = perk_pass(purchase, amount, &merchant, &category, card, balances, today);

    let taxable = (amount - perks.covered).max(0.0);
    let best = best_multiplier(card, &category, &merchant);
    let points_earned = taxable * best.multiplier;
    let points_value = points_earned * best.currency.point_value();

    let offer_pass = offer_pass(amount, &merchant, card, offers);

    debug!(
        card = %card.id,
        multiplier = best.multiplier,
        covered = perks.covered,
        perks = perks.value,
        offers = offer_pass.value,
        "valued card"
    );

    CardValuation {
        total_value: points_value + perks.value + offer_pass.value,
        points_value,
        benefits_value: perks.value,
        offers_value: offer_pass.value,
        points_earned,
        multiplier: best.multiplier,
        currency: best.currency,
        matched_category: best.category,
        matched_benefit_ids: perks.ids,
        matched_benefit_names: perks.names,
        matched_offer_ids: offer_pass.ids,
        matched_offer_names: offer_pass.names,
        benefit_details: perks.details,
    }
}

// Every matching credit is measured against the full purchase amount, so two
// perks can each cover the same dollars. Only the points base is clamped.
fn perk_pass(
    purchase: &Purchase<'_>,
    amount: f64,
    merchant: &str,
    category: &str,
    card: &Card,
    balances: &BTreeMap<String, f64>,
    today: NaiveDate,
) -> PerkPass {
    let mut pass = PerkPass {
        value: 0.0,
        covered: 0.0,
        ids: Vec::new(),
        names: Vec::new(),
        details: Vec::new(),
    };

    for benefit in &card.benefits {
        if benefit.is_expired(today) {
            continue;
        }
        let remaining = balances.get(&benefit.id).copied().unwrap_or(0.0);
        if remaining <= 0.0 {
            continue;
        }

        let matched = match purchase.benefit_override {
            Some(name) => benefit.name == name,
            None => {
                let by_merchant = benefit
                    .merchant_filter
                    .iter()
                    .any(|f| merchant.contains(&f.to_lowercase()));
                let by_category = benefit.name.contains("Travel")
                    && TRAVEL_BENEFIT_CATEGORIES.contains(&category);
                by_merchant || by_category
            }
        };
        if !matched {
            continue;
        }

        let used = amount.min(remaining);
        pass.value += used;
        if benefit.kind == BenefitKind::Credit {
            pass.covered += used;
        }
        pass.ids.push(benefit.id.clone());
        pass.names.push(benefit.name.clone());
        pass.details.push(BenefitUse {
            benefit_id: benefit.id.clone(),
            used_amount: used,
        });
    }

    pass.covered = pass.covered.min(amount);
    pass
}

fn best_multiplier(card: &Card, category: &str, merchant: &str) -> PointsPass {
    let mut best = match card
        .base_bonus_categories
        .iter()
        .find(|c| c.name == OTHER_CATEGORY)
    {
        Some(other) => PointsPass {
            multiplier: other.multiplier,
            currency: other.currency,
            category: OTHER_CATEGORY.to_string(),
        },
        None => PointsPass {
            multiplier: 1.0,
            currency: match card.issuer {
                Issuer::Amex => Currency::MembershipRewards,
                _ => Currency::UltimateRewards,
            },
            category: OTHER_CATEGORY.to_string(),
        },
    };

    for cat in &card.base_bonus_categories {
        if cat.name == OTHER_CATEGORY {
            continue;
        }
        // strictly greater: on ties the earlier category keeps the win
        if cat.multiplier > best.multiplier && is_category_match(category, &cat.name, merchant) {
            best.multiplier = cat.multiplier;
            best.currency = cat.currency;
            best.category = cat.name.clone();
        }
    }
    best
}

fn offer_pass(amount: f64, merchant: &str, card: &Card, offers: &[Offer]) -> OfferPass {
    let mut pass = OfferPass {
        value: 0.0,
        ids: Vec::new(),
        names: Vec::new(),
    };
    for offer in offers.iter().filter(|o| o.card_id == card.id) {
        if !merchant.contains(&offer.merchant_name.to_lowercase()) {
            continue;
        }
        if let Some(reward) = offer.reward.reward_for(amount) {
            pass.value += reward;
            pass.ids.push(offer.id.clone());
            pass.names.push(offer.merchant_name.clone());
        }
    }
    pass
}
