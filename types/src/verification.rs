//! On-chain verification records.

use serde::{Deserialize, Serialize};

use crate::address::AccountAddress;
use crate::notification::RequestId;
use crate::time::Timestamp;

/// Arguments of a `recordVerification` transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRequest {
    pub request_id: RequestId,
    /// Account recorded as the submitter.
    pub user_address: AccountAddress,
    pub license_type: String,
    pub is_verified: bool,
}

/// A verification record as held by the contract.
///
/// Always the result of a fresh contract query; never cached client-side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub request_id: RequestId,
    pub is_verified: bool,
    pub license_type: String,
    /// Block time at which the record was written.
    pub timestamp: Timestamp,
    pub user_address: AccountAddress,
}

impl VerificationRecord {
    /// Whether the contract has ever stored a record for this request.
    ///
    /// Unset mappings read back as zeroed structs.
    pub fn exists(&self) -> bool {
        self.timestamp != Timestamp::EPOCH || !self.user_address.is_zero()
    }
}
