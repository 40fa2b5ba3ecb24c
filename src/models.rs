// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Label of the catch-all bonus category every card may carry.
pub const OTHER_CATEGORY: &str = "Other";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Issuer {
    Amex,
    Chase,
}

/// Reward currency a bonus category earns in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "MR")]
    MembershipRewards,
    #[serde(rename = "UR")]
    UltimateRewards,
    #[serde(rename = "USD")]
    Cash,
}

impl Currency {
    /// Cash value of a single point (or cent, for cashback).
    pub fn point_value(self) -> f64 {
        match self {
            Currency::MembershipRewards => 0.02,
            Currency::UltimateRewards => 0.0205,
            Currency::Cash => 0.01,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Currency::MembershipRewards => "MR",
            Currency::UltimateRewards => "UR",
            Currency::Cash => "USD",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusCategory {
    pub id: String,
    pub name: String,
    pub multiplier: f64,
    pub currency: Currency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_amount: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Annually,
    Once,
}

impl std::str::FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Frequency::Monthly),
            "quarterly" => Ok(Frequency::Quarterly),
            "annually" | "annual" | "yearly" => Ok(Frequency::Annually),
            "once" => Ok(Frequency::Once),
            other => Err(format!(
                "Unknown frequency '{}' (use monthly|quarterly|annually|once)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenefitKind {
    #[default]
    Credit,
}

/// A statement credit attached to a card. The remaining balance lives in
/// `PersistedState::benefit_balances`, keyed by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Benefit {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub merchant_filter: Vec<String>,
    pub amount: f64, // maximum value per period
    pub frequency: Frequency,
    #[serde(rename = "type", default)]
    pub kind: BenefitKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}

impl Benefit {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date.is_some_and(|d| d < today)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: String,
    pub name: String,
    pub issuer: Issuer,
    pub annual_fee: f64,
    pub base_bonus_categories: Vec<BonusCategory>,
    pub benefits: Vec<Benefit>,
}

impl Card {
    pub fn benefit(&self, benefit_id: &str) -> Option<&Benefit> {
        self.benefits.iter().find(|b| b.id == benefit_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "offerType")]
pub enum OfferReward {
    #[serde(rename = "spend_X_get_Y", rename_all = "camelCase")]
    SpendThreshold {
        #[serde(default)]
        min_spend: f64,
        #[serde(default)]
        fixed_reward: f64,
    },
    #[serde(rename = "percent_back", rename_all = "camelCase")]
    PercentBack {
        #[serde(default)]
        percent_back: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_reward: Option<f64>,
    },
}

impl OfferReward {
    /// Reward for a purchase of `amount`, or `None` when the offer does not trigger.
    pub fn reward_for(&self, amount: f64) -> Option<f64> {
        match *self {
            OfferReward::SpendThreshold {
                min_spend,
                fixed_reward,
            } => (amount >= min_spend).then_some(fixed_reward),
            OfferReward::PercentBack {
                percent_back,
                max_reward,
            } => {
                let reward = amount * (percent_back / 100.0);
                Some(match max_reward {
                    Some(cap) if cap > 0.0 && reward > cap => cap,
                    _ => reward,
                })
            }
        }
    }

    pub fn describe(&self) -> String {
        match *self {
            OfferReward::SpendThreshold {
                min_spend,
                fixed_reward,
            } => format!("Spend ${:.2}, get ${:.2}", min_spend, fixed_reward),
            OfferReward::PercentBack {
                percent_back,
                max_reward: Some(cap),
            } => format!("{}% back (max ${:.2})", percent_back, cap),
            OfferReward::PercentBack { percent_back, .. } => format!("{}% back", percent_back),
        }
    }
}

/// A merchant offer enrolled on one card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub card_id: String,
    pub merchant_name: String,
    #[serde(flatten)]
    pub reward: OfferReward,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
    #[serde(default)]
    pub is_used: bool,
}

impl Offer {
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date.is_some_and(|d| d < today)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetKind {
    Perk,
    Offer,
}

/// One perk or offer that offset the annual fee in a recorded transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetDetail {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: OffsetKind,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub benefit_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_id: Option<String>,
    /// Catalog maximum of the benefit when the perk was applied; unset for
    /// benefits the user added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub card_id: String,
    pub merchant_name: String,
    pub date: DateTime<Utc>,
    pub amount: f64,
    pub fee_offset: f64,
    pub offset_details: Vec<OffsetDetail>,
}
