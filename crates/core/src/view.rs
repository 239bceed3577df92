//! Display-ready view model derived from a registration record.
//!
//! A [`RegistrationView`] is a pure, total function of its source
//! [`Registration`]; it is recomputed on every cache refresh and never
//! mutated independently.

use serde::Serialize;

use crate::registration::{Registration, RegistrationId, SectionStatus};

/// The primary toggle offered for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryAction {
    /// The alert is off; the available action is to turn it on.
    Enable,
    /// The alert is on; the available action is to turn it off.
    Disable,
}

/// The close-notification toggle offered for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosedNotifAction {
    EnableClosedNotif,
    DisableClosedNotif,
    /// The toggle is meaningless because the alert is inactive.
    NoEffect,
}

/// Display projection of one registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationView {
    pub id: RegistrationId,
    pub section_code: String,
    pub section_status: SectionStatus,
    pub primary_action: PrimaryAction,
    pub closed_notif_action: ClosedNotifAction,
    /// Formatted `last_notification_sent_at`, if a notification went out.
    pub display_sent_at: Option<String>,
}

impl From<&Registration> for RegistrationView {
    fn from(record: &Registration) -> Self {
        let primary_action = if record.is_active {
            PrimaryAction::Disable
        } else {
            PrimaryAction::Enable
        };

        // Invariant: NoEffect exactly when the alert is inactive.
        let closed_notif_action = if !record.is_active {
            ClosedNotifAction::NoEffect
        } else if record.close_notification {
            ClosedNotifAction::DisableClosedNotif
        } else {
            ClosedNotifAction::EnableClosedNotif
        };

        Self {
            id: record.id,
            section_code: record.section_code.clone(),
            section_status: record.section_status,
            primary_action,
            closed_notif_action,
            display_sent_at: record
                .last_notification_sent_at
                .map(|ts| ts.format("%b %-d, %Y %-I:%M %p").to_string()),
        }
    }
}
