//! Operator console views.
//!
//! Each view owns its local state and renders to text. Views talk to the
//! outside world only through [`BackendApi`](licverify_api::BackendApi) and
//! [`ChainClient`](licverify_chain::ChainClient), both injected.
//!
//! - [`NotificationListView`]: pending requests, newest first.
//! - [`LicenseListView`]: stored license records.
//! - [`ApprovalView`]: accept/decline against the backend, record/check on chain.

use std::sync::{Mutex, MutexGuard, PoisonError};

pub mod approval;
pub mod flight;
pub mod licenses;
pub mod list;
pub mod notifications;

pub use approval::{Action, ActionOutcome, ActionState, ApprovalView};
pub use flight::{FlightGuard, FlightSlots};
pub use licenses::LicenseListView;
pub use list::ListState;
pub use notifications::NotificationListView;

/// Lock, recovering the data from a poisoned mutex.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
