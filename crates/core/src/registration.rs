//! The server-authoritative registration record.
//!
//! Field names follow the collaborator API's wire format (see
//! `GET /registrations/`), so the struct deserializes the raw server
//! response directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-assigned opaque identifier for a registration row.
pub type RegistrationId = i64;

/// Open/closed status of the underlying course section.
///
/// Supplied by the server and read-only from the client's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    /// The section currently has open seats.
    Open,
    /// The section is full.
    Closed,
}

/// One course-alert subscription, as the server reports it.
///
/// Mutated in place by the reconcilers (never replaced wholesale); removed
/// from the client view as soon as a delete lands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Unique, immutable row id.
    pub id: RegistrationId,

    /// Course section this alert watches, e.g. `"CIS-1200-001"`. Immutable.
    #[serde(rename = "section")]
    pub section_code: String,

    /// Whether the alert currently fires on section-status changes.
    pub is_active: bool,

    /// Whether the alert re-arms itself after firing once.
    /// Only meaningful while `is_active`.
    pub auto_resubscribe: bool,

    /// Whether an additional notification is sent when the section later
    /// closes again. Only meaningful while `is_active`.
    pub close_notification: bool,

    /// When the most recent notification went out, if any.
    pub last_notification_sent_at: Option<DateTime<Utc>>,

    /// Current open/closed status of the section.
    pub section_status: SectionStatus,

    /// When the alert was first created. Immutable; drives the default
    /// newest-first sort.
    pub original_created_at: DateTime<Utc>,
}
