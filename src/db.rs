// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::state::PersistedState;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "WhatCard", "whatcard"));

/// Environment variable that overrides the database location.
pub const DB_ENV: &str = "WHATCARD_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Ok(p) = std::env::var(DB_ENV) {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p));
        }
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("whatcard.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    debug!(path = %path.display(), "database ready");
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    -- one JSON snapshot per user, always written whole
    CREATE TABLE IF NOT EXISTS user_state(
        user_id TEXT PRIMARY KEY,
        snapshot TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

/// Whole-snapshot persistence for per-user state.
///
/// There is no compare-and-swap: concurrent writers for the same user race
/// and the last `save` wins.
pub trait StateStore {
    fn load(&self, user: &str) -> Result<Option<PersistedState>>;
    fn save(&self, user: &str, state: &PersistedState) -> Result<()>;
    fn clear(&self, user: &str) -> Result<()>;

    /// Stored state merged with catalog defaults, or a fresh default wallet.
    fn load_or_seed(&self, user: &str, today: NaiveDate) -> Result<PersistedState> {
        Ok(match self.load(user)? {
            Some(s) => s.merge_with_defaults(today),
            None => PersistedState::default_state(today),
        })
    }
}

impl StateStore for Connection {
    fn load(&self, user: &str) -> Result<Option<PersistedState>> {
        let raw: Option<String> = self
            .query_row(
                "SELECT snapshot FROM user_state WHERE user_id=?1",
                params![user],
                |r| r.get(0),
            )
            .optional()?;
        match raw {
            Some(s) => {
                let st = PersistedState::from_json(&s)
                    .with_context(|| format!("Stored state for '{}' is unreadable", user))?;
                Ok(Some(st))
            }
            None => Ok(None),
        }
    }

    fn save(&self, user: &str, state: &PersistedState) -> Result<()> {
        let json = serde_json::to_string(state)?;
        self.execute(
            "INSERT INTO user_state(user_id, snapshot, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(user_id) DO UPDATE SET snapshot=excluded.snapshot, updated_at=excluded.updated_at",
            params![user, json],
        )?;
        info!(user, transactions = state.transaction_history.len(), "state saved");
        Ok(())
    }

    fn clear(&self, user: &str) -> Result<()> {
        self.execute("DELETE FROM user_state WHERE user_id=?1", params![user])?;
        Ok(())
    }
}
