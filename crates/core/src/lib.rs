//! Domain layer for the course-alert sync engine.
//!
//! Pure types and functions: the [`Registration`](registration::Registration)
//! record, alert actions and their single transition function, view-model
//! derivation, list filtering, and the selection store. No I/O lives here.

pub mod action;
pub mod error;
pub mod filter;
pub mod registration;
pub mod selection;
pub mod view;
