//! Alert actions and the single state-transition function.
//!
//! Every local mutation of a [`Registration`] goes through [`AlertAction::apply`]
//! so the coupling between `is_active` and `close_notification` (turning an
//! alert on or off always clears the close-notification preference) lives in
//! exactly one place.

use serde::Serialize;

use crate::error::CoreError;
use crate::registration::Registration;

/// A user-requested mutation of one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertAction {
    /// Turn the alert on (resubscribe).
    Enable,
    /// Turn the alert off (cancel).
    Disable,
    /// Also notify when the section closes again.
    EnableClosedNotif,
    /// Stop notifying on section close.
    DisableClosedNotif,
    /// Remove the registration entirely.
    Delete,
}

impl AlertAction {
    /// Check whether this action is a legal transition for `record`.
    ///
    /// The only locally rejectable transition is enabling the close
    /// notification on an inactive alert; everything else is structurally
    /// valid (the server may still refuse it).
    pub fn validate(self, record: &Registration) -> Result<(), CoreError> {
        match self {
            AlertAction::EnableClosedNotif if !record.is_active => {
                Err(CoreError::InactiveAlert(record.id))
            }
            _ => Ok(()),
        }
    }

    /// Whether applying this action to `record` would change its state.
    ///
    /// Used by the batch reconciler's no-effect filtering. A close-notif
    /// enable on an inactive record can never take effect.
    pub fn has_effect_on(self, record: &Registration) -> bool {
        match self {
            AlertAction::Enable => !record.is_active,
            AlertAction::Disable => record.is_active,
            AlertAction::EnableClosedNotif => record.is_active && !record.close_notification,
            AlertAction::DisableClosedNotif => record.close_notification,
            AlertAction::Delete => true,
        }
    }

    /// Apply this action to `record` in place.
    ///
    /// Returns `true` if the record should be dropped from the local list
    /// (delete), `false` otherwise. Callers are expected to have run
    /// [`validate`](Self::validate) first.
    pub fn apply(self, record: &mut Registration) -> bool {
        match self {
            AlertAction::Enable => {
                record.is_active = true;
                // Re-enabling always starts from a clean close-notif slate.
                record.close_notification = false;
                false
            }
            AlertAction::Disable => {
                record.is_active = false;
                record.close_notification = false;
                false
            }
            AlertAction::EnableClosedNotif => {
                record.close_notification = true;
                false
            }
            AlertAction::DisableClosedNotif => {
                record.close_notification = false;
                false
            }
            AlertAction::Delete => true,
        }
    }
}

/// Apply `action` to every record in `records` whose id is in `ids`,
/// removing records the action deletes.
///
/// This is the combined local mutation behind optimistic dispatch: one call
/// covers a whole selection.
pub fn apply_to_all(
    records: &mut Vec<Registration>,
    ids: &[crate::registration::RegistrationId],
    action: AlertAction,
) {
    records.retain_mut(|record| {
        if ids.contains(&record.id) {
            !action.apply(record)
        } else {
            true
        }
    });
}
