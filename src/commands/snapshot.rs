// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db::StateStore;
use crate::state::PersistedState;
use crate::utils::{required, resolve_user, today};
use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let user = resolve_user(conn, m)?;
    let day = today();

    match m.subcommand() {
        Some(("show", _)) => {
            let state = conn.load_or_seed(&user, day)?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
        Some(("export", sub)) => {
            let out = required(sub, "out")?;
            let state = conn.load_or_seed(&user, day)?;
            std::fs::write(out, serde_json::to_string_pretty(&state)?)
                .with_context(|| format!("write {}", out))?;
            println!("Exported state for '{}' to {}", user, out);
        }
        Some(("import", sub)) => {
            let file = required(sub, "file")?;
            let raw =
                std::fs::read_to_string(file).with_context(|| format!("read {}", file))?;
            let state = PersistedState::from_json(&raw)?.merge_with_defaults(day);
            conn.save(&user, &state)?;
            println!(
                "Imported state for '{}' ({} cards, {} transactions)",
                user,
                state.cards.len(),
                state.transaction_history.len()
            );
        }
        Some(("reset", _)) => {
            conn.clear(&user)?;
            conn.save(&user, &PersistedState::default_state(day))?;
            println!("Reset '{}' to a fresh wallet", user);
        }
        _ => {}
    }
    Ok(())
}
