//! Domain types for licverify.
//!
//! This crate defines the records the console exchanges with the backend API
//! and the verification contract: notifications, license records, request
//! identifiers, on-chain verification records, account addresses, transaction
//! hashes and timestamps.

pub mod address;
pub mod error;
pub mod hash;
pub mod license;
pub mod notification;
pub mod time;
pub mod verification;

pub use address::AccountAddress;
pub use error::TypesError;
pub use hash::TxHash;
pub use license::LicenseRecord;
pub use notification::{
    sort_newest_first, Notification, NotificationStatus, NotificationStatusSnapshot, RequestId,
};
pub use time::Timestamp;
pub use verification::{VerificationRecord, VerificationRequest};
