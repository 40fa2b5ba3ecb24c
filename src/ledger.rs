// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Recording card use against a wallet, and undoing it.
//!
//! `apply_transaction` and `reverse_transaction` are inverses as long as the
//! catalog cap of every touched benefit is unchanged and balances are not
//! hand-edited in between. Reversal trusts the amounts stored on the record,
//! never a recomputation.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog;
use crate::db::StateStore;
use crate::error::{EngineError, EngineResult, Warning};
use crate::models::{OffsetDetail, OffsetKind, TransactionRecord};
use crate::ranker::RankedResult;
use crate::state::PersistedState;

const DEFAULT_MERCHANT: &str = "Purchase";

/// Commit `chosen` to the wallet: draw down perk balances, burn matched
/// offers, offset the annual fee and record the transaction at the head of
/// the history. Returns the new transaction id.
pub fn apply_transaction(
    state: &mut PersistedState,
    chosen: &RankedResult,
    merchant: &str,
    amount: f64,
    now: DateTime<Utc>,
) -> EngineResult<String> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(EngineError::Validation(format!(
            "purchase amount must be a non-negative number, got {}",
            amount
        )));
    }
    let card = state.card(&chosen.card.id)?.clone();
    let v = &chosen.valuation;
    let shares = v
        .benefit_details
        .iter()
        .map(|b| b.used_amount)
        .chain(chosen.offer_details.iter().map(|o| o.used_amount));
    for share in shares {
        if !share.is_finite() || share < 0.0 {
            return Err(EngineError::Validation(format!(
                "offset value must be a non-negative number, got {}",
                share
            )));
        }
    }

    // points never offset a fee
    let incentive = v.benefits_value + v.offers_value;
    let new_fee = state.fee_balance(&card) - incentive;
    state.annual_fee_balances.insert(card.id.clone(), new_fee);

    let mut details = Vec::with_capacity(v.benefit_details.len() + chosen.offer_details.len());
    for used in &v.benefit_details {
        let current = state.benefit_balance(&used.benefit_id);
        state
            .benefit_balances
            .insert(used.benefit_id.clone(), (current - used.used_amount).max(0.0));

        if let Some(benefit) = chosen.card.benefit(&used.benefit_id) {
            details.push(OffsetDetail {
                name: benefit.name.clone(),
                kind: OffsetKind::Perk,
                value: used.used_amount,
                benefit_id: Some(benefit.id.clone()),
                offer_id: None,
                cap: catalog::benefit_cap(&card.id, &benefit.id),
            });
        }
    }

    for offer in state
        .active_offers
        .iter_mut()
        .filter(|o| v.matched_offer_ids.contains(&o.id))
    {
        offer.is_used = true;
    }
    for od in &chosen.offer_details {
        details.push(OffsetDetail {
            name: od.offer_name.clone(),
            kind: OffsetKind::Offer,
            value: od.used_amount,
            benefit_id: None,
            offer_id: Some(od.offer_id.clone()),
            cap: None,
        });
    }

    let merchant = merchant.trim();
    let record = TransactionRecord {
        id: format!("tx-{}", Uuid::new_v4().simple()),
        card_id: card.id.clone(),
        merchant_name: if merchant.is_empty() {
            DEFAULT_MERCHANT.to_string()
        } else {
            merchant.to_string()
        },
        date: now,
        amount,
        fee_offset: incentive,
        offset_details: details,
    };
    let id = record.id.clone();
    info!(
        tx = %id,
        card = %card.id,
        fee_offset = incentive,
        fee_balance = new_fee,
        "transaction applied"
    );
    state.transaction_history.insert(0, record);
    Ok(id)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReversalReport {
    pub transaction: TransactionRecord,
    pub warnings: Vec<Warning>,
}

/// Undo the transaction `tx_id`: restore perk balances (capped at the
/// catalog maximum), clear the used flag of its offers, add the fee offset
/// back and drop the record. Missing offers or benefits only produce
/// warnings; a missing transaction is an error and leaves `state` untouched.
pub fn reverse_transaction(
    state: &mut PersistedState,
    tx_id: &str,
) -> EngineResult<ReversalReport> {
    let tx_id = tx_id.trim();
    if tx_id.is_empty() {
        return Err(EngineError::Validation("transaction id is required".into()));
    }
    let idx = state
        .transaction_history
        .iter()
        .position(|t| t.id == tx_id)
        .ok_or_else(|| EngineError::not_found("transaction", tx_id))?;
    let tx = state.transaction_history.remove(idx);
    let mut warnings = Vec::new();

    for detail in &tx.offset_details {
        match (detail.kind, &detail.benefit_id, &detail.offer_id) {
            (OffsetKind::Perk, Some(benefit_id), _) => {
                let cap = catalog::benefit_cap(&tx.card_id, benefit_id);
                if let Some(recorded) = detail.cap {
                    if cap != Some(recorded) {
                        let w = Warning::StateInconsistency {
                            benefit_id: benefit_id.clone(),
                            recorded_cap: recorded,
                            catalog_cap: cap,
                        };
                        warn!(tx = %tx.id, "{}", w);
                        warnings.push(w);
                    }
                }
                let current = state.benefit_balance(benefit_id);
                let restored = (current + detail.value).min(cap.unwrap_or(f64::INFINITY));
                state.benefit_balances.insert(benefit_id.clone(), restored);
            }
            (OffsetKind::Offer, _, Some(offer_id)) => {
                match state.active_offers.iter_mut().find(|o| &o.id == offer_id) {
                    Some(offer) => offer.is_used = false,
                    None => {
                        let w = Warning::MissingOffer {
                            offer_id: offer_id.clone(),
                        };
                        warn!(tx = %tx.id, "{}", w);
                        warnings.push(w);
                    }
                }
            }
            // records written without a reference id carry nothing to restore
            _ => {}
        }
    }

    *state
        .annual_fee_balances
        .entry(tx.card_id.clone())
        .or_insert(0.0) += tx.fee_offset;

    info!(tx = %tx.id, card = %tx.card_id, restored = tx.fee_offset, "transaction reversed");
    Ok(ReversalReport {
        transaction: tx,
        warnings,
    })
}

/// Read-modify-write wrapper around a [`StateStore`].
pub struct Ledger<'a, S: StateStore> {
    store: &'a S,
    user: String,
}

impl<'a, S: StateStore> Ledger<'a, S> {
    pub fn new(store: &'a S, user: impl Into<String>) -> Self {
        Self {
            store,
            user: user.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn state(&self, today: NaiveDate) -> Result<PersistedState> {
        self.store.load_or_seed(&self.user, today)
    }

    pub fn apply(
        &self,
        chosen: &RankedResult,
        merchant: &str,
        amount: f64,
        today: NaiveDate,
    ) -> Result<(PersistedState, String)> {
        let mut state = self.state(today)?;
        let id = apply_transaction(&mut state, chosen, merchant, amount, Utc::now())?;
        self.store.save(&self.user, &state)?;
        Ok((state, id))
    }

    pub fn reverse(
        &self,
        tx_id: &str,
        today: NaiveDate,
    ) -> Result<(PersistedState, ReversalReport)> {
        let mut state = self.state(today)?;
        let report = reverse_transaction(&mut state, tx_id)?;
        self.store.save(&self.user, &state)?;
        Ok((state, report))
    }
}
