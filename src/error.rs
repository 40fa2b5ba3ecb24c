// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },
}

impl EngineError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Non-fatal conditions noticed while reversing a transaction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    /// The catalog cap differs from the cap recorded when the perk was applied.
    #[error(
        "benefit '{benefit_id}' had cap {recorded_cap:.2} when applied, catalog now has {}",
        describe_cap(.catalog_cap)
    )]
    StateInconsistency {
        benefit_id: String,
        recorded_cap: f64,
        catalog_cap: Option<f64>,
    },

    #[error("offer '{offer_id}' was deleted; nothing to restore")]
    MissingOffer { offer_id: String },
}

fn describe_cap(cap: &Option<f64>) -> String {
    match cap {
        Some(c) => format!("{:.2}", c),
        None => "no such benefit".to_string(),
    }
}
