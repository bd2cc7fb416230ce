//! Backend API client for licverify.
//!
//! [`BackendApi`] is the seam the console orchestrates against;
//! [`BackendClient`] implements it over HTTP. Every operation is a single
//! round trip with no retries.

pub mod client;
pub mod error;

use async_trait::async_trait;
use licverify_types::{LicenseRecord, Notification, NotificationStatusSnapshot, RequestId, TxHash};
use serde::{Deserialize, Serialize};

pub use client::BackendClient;
pub use error::ApiError;

/// License attributes sent along with an approval.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalDetails {
    pub last_name: String,
    pub license_type: String,
}

/// Response to an approve/decline call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ActionResponse {
    #[serde(default)]
    pub message: String,
}

/// Operations offered by the verification backend.
#[async_trait]
pub trait BackendApi: Send + Sync {
    /// All notifications, in backend order.
    async fn notifications(&self) -> Result<Vec<Notification>, ApiError>;

    async fn mark_notification_read(&self, id: &RequestId) -> Result<(), ApiError>;

    /// Current backend status of one notification.
    async fn notification_status(
        &self,
        id: &RequestId,
    ) -> Result<NotificationStatusSnapshot, ApiError>;

    /// Attach the hash of a confirmed `recordVerification` transaction.
    async fn update_notification_hash(
        &self,
        id: &RequestId,
        tx_hash: &TxHash,
    ) -> Result<(), ApiError>;

    /// All stored driver's license records.
    async fn licenses(&self) -> Result<Vec<LicenseRecord>, ApiError>;

    async fn approve_verification(
        &self,
        id: &RequestId,
        details: &ApprovalDetails,
    ) -> Result<ActionResponse, ApiError>;

    async fn decline_verification(&self, id: &RequestId) -> Result<ActionResponse, ApiError>;
}
