//! Alert-registration synchronization engine.
//!
//! Keeps a locally displayed registration list consistent with server state
//! while single and batch mutations appear to take effect instantly:
//! a revalidating [`RegistrationCache`](cache::RegistrationCache) with sticky
//! reads, a per-registration [`Reconciler`](reconcile::Reconciler) that
//! chooses between optimistic and pessimistic dispatch, a batch layer with
//! no-effect filtering and a two-phase disable commit, and a
//! [`SyncBus`](events::SyncBus) that broadcasts outcomes to the presentation
//! layer.

pub mod batch;
pub mod cache;
pub mod error;
pub mod events;
pub mod reconcile;

pub use cache::RegistrationCache;
pub use error::{BatchItemFailure, EngineError};
pub use events::{SyncBus, SyncEvent};
pub use reconcile::{Dispatched, Reconciler};
