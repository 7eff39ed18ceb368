// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Organize: a left fold of page actions over a document buffer.

use blattwerk_core::error::Result;
use blattwerk_core::{CallId, InsertRequest, MoveRequest, OrganizeAction, Position, parse_actions};
use tracing::{debug, info, instrument, warn};

use super::PageEngine;
use crate::validate;

impl PageEngine {
    /// Apply `actions` in order. Each action sees the output of the previous
    /// one, so indices always refer to the current state of the document.
    ///
    /// The first failing action aborts the whole pipeline; no partial result
    /// is returned.
    #[instrument(skip_all, fields(call_id = %CallId::new(), bytes_len = document.len(), actions = actions.len()))]
    pub async fn organize(&self, document: &[u8], actions: &[OrganizeAction]) -> Result<Vec<u8>> {
        validate::require_non_empty(actions, "organize", "action")?;

        let mut current = document.to_vec();
        for (step, action) in actions.iter().enumerate() {
            current = match self.apply_action(&current, action).await {
                Ok(next) => next,
                Err(err) => {
                    warn!(step, action = action.name(), error = %err, "Organize step failed");
                    return Err(err);
                }
            };
            debug!(step, action = action.name(), "Organize step applied");
        }

        info!(actions = actions.len(), "Document organized");
        Ok(current)
    }

    /// [`PageEngine::organize`] driven by a JSON array of action descriptors.
    pub async fn organize_json(&self, document: &[u8], actions_json: &str) -> Result<Vec<u8>> {
        let actions = parse_actions(actions_json)?;
        self.organize(document, &actions).await
    }

    async fn apply_action(&self, current: &[u8], action: &OrganizeAction) -> Result<Vec<u8>> {
        match action {
            OrganizeAction::Remove { position } => self.remove(current, &[*position]).await,
            OrganizeAction::Insert { document, position } => {
                self.insert(current, &[InsertRequest::new(document.clone(), *position)])
                    .await
            }
            OrganizeAction::Replace { document, position } => {
                // The replacement fills the slot the removed page vacated.
                let removed = self.remove(current, &[*position]).await?;
                self.insert(
                    &removed,
                    &[InsertRequest::new(document.clone(), Position::Index(*position))],
                )
                .await
            }
            OrganizeAction::Rotate { position, degrees } => {
                self.rotate(current, *degrees, Some(std::slice::from_ref(position)))
                    .await
            }
            OrganizeAction::Move { from, to } => {
                self.move_page(current, MoveRequest { from: *from, to: *to })
                    .await
            }
        }
    }
}
