//! Checkbox selection state, tracked independently of cache identity.
//!
//! The store's lifecycle is tied to the registration cache: whenever a fresh
//! list arrives, [`SelectionStore::rebuild`] resets every known id to
//! unselected and drops ids that no longer exist.

use std::collections::HashMap;

use crate::registration::{Registration, RegistrationId};

/// Which registrations the user currently has checked.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selected: HashMap<RegistrationId, bool>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset to "nothing selected" over exactly the ids in `records`.
    pub fn rebuild(&mut self, records: &[Registration]) {
        self.selected = records.iter().map(|r| (r.id, false)).collect();
    }

    /// Flip the checkbox for one id. Ids not known to the store are ignored.
    pub fn toggle(&mut self, id: RegistrationId) {
        if let Some(checked) = self.selected.get_mut(&id) {
            *checked = !*checked;
        }
    }

    /// Apply a select-all toggle.
    ///
    /// Turning select-all on checks exactly the ids in `visible` (the
    /// currently filtered subset) and unchecks every other id; turning it
    /// off unchecks every id in `all`.
    pub fn select_all(&mut self, visible: &[Registration], all: &[Registration], checked: bool) {
        if checked {
            let visible_ids: std::collections::HashSet<RegistrationId> =
                visible.iter().map(|r| r.id).collect();
            self.selected = all
                .iter()
                .map(|r| (r.id, visible_ids.contains(&r.id)))
                .collect();
        } else {
            self.selected = all.iter().map(|r| (r.id, false)).collect();
        }
    }

    pub fn is_selected(&self, id: RegistrationId) -> bool {
        self.selected.get(&id).copied().unwrap_or(false)
    }

    /// Ids currently checked, in ascending order for determinism.
    pub fn selected_ids(&self) -> Vec<RegistrationId> {
        let mut ids: Vec<RegistrationId> = self
            .selected
            .iter()
            .filter(|(_, checked)| **checked)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }
}
