//! Approval view: one notification, four actions.
//!
//! Accept and decline go to the backend; record-on-chain and check-status go
//! through the [`ChainClient`]. Each action moves through
//! `Idle -> Loading -> Success | Error` on its own and cannot overlap with
//! itself: a second invocation while the first is running returns
//! [`ActionOutcome::Busy`] without touching the network.

use std::fmt::Write;
use std::future::Future;
use std::sync::{Arc, Mutex};

use licverify_api::{ApiError, ApprovalDetails, BackendApi};
use licverify_chain::{ChainClient, ChainError};
use licverify_types::{Notification, NotificationStatus, VerificationRecord, VerificationRequest};
use licverify_utils::format_timestamp;
use tracing::{info, warn};

use crate::flight::FlightSlots;
use crate::lock;

pub const APPROVE_FAILED: &str = "An error occurred during approval.";
pub const DECLINE_FAILED: &str = "An error occurred during decline.";
pub const WALLET_UNAVAILABLE: &str =
    "No wallet provider is available. Configure a wallet to use this feature.";
pub const RECORD_FAILED_UNKNOWN: &str = "Verification failed: Unknown error.";
pub const STATUS_QUERY_FAILED: &str = "Failed to retrieve verification status.";

/// A user-triggered action on the approval view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Accept,
    Decline,
    RecordOnChain,
    CheckStatus,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::Accept,
        Action::Decline,
        Action::RecordOnChain,
        Action::CheckStatus,
    ];

    fn index(self) -> usize {
        match self {
            Self::Accept => 0,
            Self::Decline => 1,
            Self::RecordOnChain => 2,
            Self::CheckStatus => 3,
        }
    }
}

/// Where an action currently stands.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ActionState {
    #[default]
    Idle,
    Loading,
    Success(String),
    Error(String),
}

/// What one invocation produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Success(String),
    Error(String),
    /// The same action was already running; nothing was done.
    Busy,
}

impl ActionOutcome {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success(m) | Self::Error(m) => Some(m),
            Self::Busy => None,
        }
    }
}

/// Status text for a failed on-chain recording.
pub fn record_failure_message(err: &ChainError) -> String {
    match err {
        ChainError::WalletUnavailable => WALLET_UNAVAILABLE.to_string(),
        ChainError::BackendSync { tx_hash, source } => format!(
            "Verification recorded on chain (Transaction Hash: {tx_hash}), \
             but the backend could not be updated: {source}"
        ),
        other => match other.revert_reason() {
            Some(reason) => format!("Verification failed: {reason}"),
            None => RECORD_FAILED_UNKNOWN.to_string(),
        },
    }
}

/// Multi-line summary of an on-chain record.
pub fn format_verification_status(record: &VerificationRecord) -> String {
    format!(
        "Status: {}\nLicense Type: {}\nTimestamp: {}\nUser Address: {}",
        if record.is_verified {
            "Verified"
        } else {
            "Not Verified"
        },
        record.license_type,
        format_timestamp(record.timestamp),
        record.user_address,
    )
}

fn backend_failure(err: &ApiError, generic: &str) -> String {
    err.server_message().unwrap_or(generic).to_string()
}

pub struct ApprovalView {
    notification: Notification,
    backend: Arc<dyn BackendApi>,
    chain: Arc<ChainClient>,
    backend_status: Mutex<Option<NotificationStatus>>,
    status_message: Mutex<String>,
    states: Mutex<[ActionState; 4]>,
    flights: FlightSlots<4>,
}

impl ApprovalView {
    /// Build the view for `notification` without touching the network.
    pub fn new(
        notification: Notification,
        backend: Arc<dyn BackendApi>,
        chain: Arc<ChainClient>,
    ) -> Self {
        Self {
            notification,
            backend,
            chain,
            backend_status: Mutex::new(None),
            status_message: Mutex::new(String::new()),
            states: Mutex::new(Default::default()),
            flights: FlightSlots::new(),
        }
    }

    /// Build the view and fetch the request's current backend status once.
    pub async fn open(
        notification: Notification,
        backend: Arc<dyn BackendApi>,
        chain: Arc<ChainClient>,
    ) -> Self {
        let view = Self::new(notification, backend, chain);
        view.refresh_status().await;
        view
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    /// Backend status as of the last refresh.
    pub fn backend_status(&self) -> Option<NotificationStatus> {
        lock(&self.backend_status).clone()
    }

    /// Text of the most recent finished action.
    pub fn status_message(&self) -> String {
        lock(&self.status_message).clone()
    }

    pub fn is_loading(&self) -> bool {
        self.flights.any_running()
    }

    pub fn state(&self, action: Action) -> ActionState {
        lock(&self.states)[action.index()].clone()
    }

    async fn refresh_status(&self) {
        match self.backend.notification_status(&self.notification.id).await {
            Ok(snapshot) => *lock(&self.backend_status) = Some(snapshot.status),
            Err(e) => warn!(
                request_id = %self.notification.id,
                error = %e,
                "failed to fetch notification status"
            ),
        }
    }

    /// Drive one action under its single-flight token.
    async fn run<F>(&self, action: Action, work: F) -> ActionOutcome
    where
        F: Future<Output = Result<String, String>>,
    {
        let Some(_guard) = self.flights.try_begin(action.index()) else {
            info!(?action, "action already in flight");
            return ActionOutcome::Busy;
        };
        lock(&self.states)[action.index()] = ActionState::Loading;

        let (state, outcome, message) = match work.await {
            Ok(message) => (
                ActionState::Success(message.clone()),
                ActionOutcome::Success(message.clone()),
                message,
            ),
            Err(message) => (
                ActionState::Error(message.clone()),
                ActionOutcome::Error(message.clone()),
                message,
            ),
        };
        lock(&self.states)[action.index()] = state;
        *lock(&self.status_message) = message;
        outcome
    }

    pub async fn accept(&self) -> ActionOutcome {
        self.run(Action::Accept, async {
            let details = ApprovalDetails {
                last_name: self.notification.last_name.clone(),
                license_type: self.notification.license_type.clone(),
            };
            let result = self
                .backend
                .approve_verification(&self.notification.id, &details)
                .await;
            self.refresh_status().await;

            match result {
                Ok(response) if response.message.is_empty() => {
                    Ok("Verification approved.".to_string())
                }
                Ok(response) => Ok(response.message),
                Err(e) => {
                    warn!(request_id = %self.notification.id, error = %e, "approval failed");
                    Err(backend_failure(&e, APPROVE_FAILED))
                }
            }
        })
        .await
    }

    pub async fn decline(&self) -> ActionOutcome {
        self.run(Action::Decline, async {
            let result = self
                .backend
                .decline_verification(&self.notification.id)
                .await;
            self.refresh_status().await;

            match result {
                Ok(response) if response.message.is_empty() => {
                    Ok("Verification declined.".to_string())
                }
                Ok(response) => Ok(response.message),
                Err(e) => {
                    warn!(request_id = %self.notification.id, error = %e, "decline failed");
                    Err(backend_failure(&e, DECLINE_FAILED))
                }
            }
        })
        .await
    }

    /// Record a positive verification on chain, from the wallet's first account.
    pub async fn record_on_chain(&self) -> ActionOutcome {
        self.run(Action::RecordOnChain, async {
            if !self.chain.is_wallet_available() {
                return Err(WALLET_UNAVAILABLE.to_string());
            }

            let recorded = async {
                let user_address = self.chain.primary_account().await?;
                let request = VerificationRequest {
                    request_id: self.notification.id.clone(),
                    user_address,
                    license_type: self.notification.license_type.clone(),
                    is_verified: true,
                };
                self.chain.record_verification(&request).await
            }
            .await;

            match recorded {
                Ok(tx_hash) => Ok(format!(
                    "Verification recorded successfully. Transaction Hash: {tx_hash}"
                )),
                Err(e) => {
                    warn!(request_id = %self.notification.id, error = %e, "on-chain recording failed");
                    Err(record_failure_message(&e))
                }
            }
        })
        .await
    }

    pub async fn check_status(&self) -> ActionOutcome {
        self.run(Action::CheckStatus, async {
            match self
                .chain
                .get_verification_status(&self.notification.id)
                .await
            {
                Ok(record) => Ok(format_verification_status(&record)),
                Err(e) => {
                    warn!(request_id = %self.notification.id, error = %e, "status query failed");
                    Err(STATUS_QUERY_FAILED.to_string())
                }
            }
        })
        .await
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.notification.message);
        let _ = writeln!(
            out,
            "Status: {}",
            self.backend_status()
                .map_or_else(|| "unknown".to_string(), |s| s.to_string())
        );
        if self.is_loading() {
            out.push_str("Awaiting response...\n");
        }
        let message = self.status_message();
        if !message.is_empty() {
            let _ = writeln!(out, "{message}");
        }
        out
    }
}
