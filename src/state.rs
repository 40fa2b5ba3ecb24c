// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The per-user snapshot and the wallet edits that operate on it.

use std::collections::BTreeMap;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog;
use crate::error::{EngineError, EngineResult};
use crate::models::{Benefit, Card, Offer, TransactionRecord};

pub const CURRENT_VERSION: u32 = 1;

/// Everything the engine knows about one user. Persisted as a single JSON
/// document; every write replaces the whole snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub version: u32,
    pub cards: Vec<Card>,
    pub active_card_ids: Vec<String>,
    pub active_offers: Vec<Offer>,
    pub transaction_history: Vec<TransactionRecord>, // most recent first
    pub benefit_balances: BTreeMap<String, f64>,
    pub custom_annual_fees: BTreeMap<String, f64>,
    pub annual_fee_balances: BTreeMap<String, f64>,
    pub annual_fee_dates: BTreeMap<String, NaiveDate>,
}

impl PersistedState {
    /// Fresh wallet: every catalog card active, sample offers, full balances.
    pub fn default_state(today: NaiveDate) -> Self {
        let cards = catalog::all_cards().to_vec();
        let last_fee_date = today.checked_sub_months(Months::new(2)).unwrap_or(today);

        let mut benefit_balances = BTreeMap::new();
        let mut annual_fee_balances = BTreeMap::new();
        let mut annual_fee_dates = BTreeMap::new();
        for card in &cards {
            for b in &card.benefits {
                benefit_balances.insert(b.id.clone(), b.amount);
            }
            annual_fee_balances.insert(card.id.clone(), card.annual_fee);
            annual_fee_dates.insert(card.id.clone(), last_fee_date);
        }

        Self {
            version: CURRENT_VERSION,
            active_card_ids: cards.iter().map(|c| c.id.clone()).collect(),
            cards,
            active_offers: catalog::sample_offers(),
            transaction_history: Vec::new(),
            benefit_balances,
            custom_annual_fees: BTreeMap::new(),
            annual_fee_balances,
            annual_fee_dates,
        }
    }

    /// Fill in defaults for catalog entries the stored snapshot predates.
    /// Stored values always win.
    pub fn merge_with_defaults(mut self, today: NaiveDate) -> Self {
        let defaults = Self::default_state(today);
        for (k, v) in defaults.benefit_balances {
            self.benefit_balances.entry(k).or_insert(v);
        }
        for (k, v) in defaults.annual_fee_balances {
            self.annual_fee_balances.entry(k).or_insert(v);
        }
        for (k, v) in defaults.annual_fee_dates {
            self.annual_fee_dates.entry(k).or_insert(v);
        }
        self.version = CURRENT_VERSION;
        self
    }

    pub fn from_json(raw: &str) -> EngineResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| EngineError::Validation(format!("invalid state payload: {}", e)))
    }

    pub fn card(&self, card_id: &str) -> EngineResult<&Card> {
        self.cards
            .iter()
            .find(|c| c.id == card_id)
            .ok_or_else(|| EngineError::not_found("card", card_id))
    }

    fn card_mut(&mut self, card_id: &str) -> EngineResult<&mut Card> {
        self.cards
            .iter_mut()
            .find(|c| c.id == card_id)
            .ok_or_else(|| EngineError::not_found("card", card_id))
    }

    pub fn is_active(&self, card_id: &str) -> bool {
        self.active_card_ids.iter().any(|id| id == card_id)
    }

    /// Active cards in wallet order.
    pub fn active_cards(&self) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|c| self.is_active(&c.id))
            .cloned()
            .collect()
    }

    /// Flip a card in or out of the active set. Returns the new state.
    pub fn toggle_active(&mut self, card_id: &str) -> EngineResult<bool> {
        self.card(card_id)?;
        if self.is_active(card_id) {
            self.active_card_ids.retain(|id| id != card_id);
            Ok(false)
        } else {
            self.active_card_ids.push(card_id.to_string());
            Ok(true)
        }
    }

    pub fn total_annual_fee(&self, card: &Card) -> f64 {
        self.custom_annual_fees
            .get(&card.id)
            .copied()
            .unwrap_or(card.annual_fee)
    }

    /// Remaining annual fee to earn back; negative means the card is in profit.
    pub fn fee_balance(&self, card: &Card) -> f64 {
        self.annual_fee_balances
            .get(&card.id)
            .copied()
            .unwrap_or_else(|| self.total_annual_fee(card))
    }

    pub fn benefit_balance(&self, benefit_id: &str) -> f64 {
        self.benefit_balances.get(benefit_id).copied().unwrap_or(0.0)
    }

    pub fn update_fee(
        &mut self,
        card_id: &str,
        balance: f64,
        paid_on: NaiveDate,
        total_fee: f64,
    ) -> EngineResult<()> {
        self.card(card_id)?;
        self.annual_fee_balances.insert(card_id.to_string(), balance);
        self.annual_fee_dates.insert(card_id.to_string(), paid_on);
        self.custom_annual_fees.insert(card_id.to_string(), total_fee);
        Ok(())
    }

    /// Start a new card year: last-paid date moves forward a year and the
    /// balance resets to the full fee.
    pub fn renew_card(&mut self, card_id: &str, today: NaiveDate) -> EngineResult<NaiveDate> {
        let card = self.card(card_id)?;
        let total = self.total_annual_fee(card);
        let last = self.annual_fee_dates.get(card_id).copied().unwrap_or(today);
        let next = last
            .checked_add_months(Months::new(12))
            .ok_or_else(|| EngineError::Validation(format!("cannot renew past {}", last)))?;
        self.update_fee(card_id, total, next, total)?;
        Ok(next)
    }

    pub fn add_offer(&mut self, offer: Offer) -> EngineResult<()> {
        self.card(&offer.card_id)?;
        if self.active_offers.iter().any(|o| o.id == offer.id) {
            return Err(EngineError::Validation(format!(
                "offer '{}' already exists",
                offer.id
            )));
        }
        debug!(offer = %offer.id, card = %offer.card_id, "offer added");
        self.active_offers.push(offer);
        Ok(())
    }

    pub fn update_offer(&mut self, offer: Offer) -> EngineResult<()> {
        let slot = self
            .active_offers
            .iter_mut()
            .find(|o| o.id == offer.id)
            .ok_or_else(|| EngineError::not_found("offer", offer.id.clone()))?;
        *slot = offer;
        Ok(())
    }

    pub fn delete_offer(&mut self, offer_id: &str) -> EngineResult<()> {
        let before = self.active_offers.len();
        self.active_offers.retain(|o| o.id != offer_id);
        if self.active_offers.len() == before {
            return Err(EngineError::not_found("offer", offer_id));
        }
        Ok(())
    }

    pub fn mark_offer_used(&mut self, offer_id: &str) -> EngineResult<()> {
        let offer = self
            .active_offers
            .iter_mut()
            .find(|o| o.id == offer_id)
            .ok_or_else(|| EngineError::not_found("offer", offer_id))?;
        offer.is_used = true;
        Ok(())
    }

    /// Attach a custom benefit. Its balance starts at `balance` or the maximum.
    pub fn add_benefit(
        &mut self,
        card_id: &str,
        benefit: Benefit,
        balance: Option<f64>,
    ) -> EngineResult<()> {
        if self.cards.iter().any(|c| c.benefit(&benefit.id).is_some()) {
            return Err(EngineError::Validation(format!(
                "benefit '{}' already exists",
                benefit.id
            )));
        }
        let start = clamp_balance(balance.unwrap_or(benefit.amount), benefit.amount);
        let id = benefit.id.clone();
        self.card_mut(card_id)?.benefits.push(benefit);
        self.benefit_balances.insert(id, start);
        Ok(())
    }

    pub fn update_benefit(
        &mut self,
        card_id: &str,
        benefit: Benefit,
        balance: Option<f64>,
    ) -> EngineResult<()> {
        let card = self.card_mut(card_id)?;
        let slot = card
            .benefits
            .iter_mut()
            .find(|b| b.id == benefit.id)
            .ok_or_else(|| EngineError::not_found("benefit", benefit.id.clone()))?;
        let start = clamp_balance(balance.unwrap_or(benefit.amount), benefit.amount);
        let id = benefit.id.clone();
        *slot = benefit;
        self.benefit_balances.insert(id, start);
        Ok(())
    }

    pub fn delete_benefit(&mut self, card_id: &str, benefit_id: &str) -> EngineResult<()> {
        let card = self.card_mut(card_id)?;
        let before = card.benefits.len();
        card.benefits.retain(|b| b.id != benefit_id);
        if card.benefits.len() == before {
            return Err(EngineError::not_found("benefit", benefit_id));
        }
        self.benefit_balances.remove(benefit_id);
        Ok(())
    }

    /// Hand-edit a perk balance; clamped to `[0, maximum]`.
    pub fn set_benefit_balance(&mut self, benefit_id: &str, amount: f64) -> EngineResult<f64> {
        let max = self
            .cards
            .iter()
            .find_map(|c| c.benefit(benefit_id))
            .map(|b| b.amount)
            .ok_or_else(|| EngineError::not_found("benefit", benefit_id))?;
        let v = clamp_balance(amount, max);
        self.benefit_balances.insert(benefit_id.to_string(), v);
        Ok(v)
    }
}

fn clamp_balance(v: f64, max: f64) -> f64 {
    v.min(max).max(0.0)
}
