//! Nullable backend: an in-memory stand-in for the REST API.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use licverify_api::{ActionResponse, ApiError, ApprovalDetails, BackendApi};
use licverify_types::{
    LicenseRecord, Notification, NotificationStatus, NotificationStatusSnapshot, RequestId, TxHash,
};
use tokio::sync::Notify;

/// A scripted backend failure.
#[derive(Clone, Debug)]
pub enum Failure {
    /// Backend unreachable.
    Network,
    /// Non-2xx status, optionally with an `error` body.
    Server(u16, Option<String>),
    /// Body of the wrong shape.
    Parse,
}

impl Failure {
    fn to_error(&self) -> ApiError {
        match self {
            Self::Network => ApiError::Network("connection refused".into()),
            Self::Server(status, message) => ApiError::Request {
                status: *status,
                server_message: message.clone(),
            },
            Self::Parse => ApiError::Parse("unexpected response shape".into()),
        }
    }
}

/// One recorded call against the backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BackendCall {
    Notifications,
    MarkRead(RequestId),
    NotificationStatus(RequestId),
    UpdateHash(RequestId, TxHash),
    Licenses,
    Approve(RequestId, ApprovalDetails),
    Decline(RequestId),
}

#[derive(Default)]
struct Failures {
    notifications: Option<Failure>,
    mark_read: Option<Failure>,
    status: Option<Failure>,
    update_hash: Option<Failure>,
    licenses: Option<Failure>,
    approve: Option<Failure>,
    decline: Option<Failure>,
}

/// A test backend that serves canned data and records calls.
///
/// Approve and decline move the served status to approved/declined, as the
/// real backend does.
pub struct NullBackend {
    notifications: Mutex<Vec<Notification>>,
    licenses: Mutex<Vec<LicenseRecord>>,
    status: Mutex<NotificationStatus>,
    failures: Mutex<Failures>,
    calls: Mutex<Vec<BackendCall>>,
    gate: Mutex<Option<Arc<Notify>>>,
    load_gate: Mutex<Option<Arc<Notify>>>,
}

impl NullBackend {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            licenses: Mutex::new(Vec::new()),
            status: Mutex::new(NotificationStatus::Pending),
            failures: Mutex::new(Failures::default()),
            calls: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
            load_gate: Mutex::new(None),
        }
    }

    pub fn set_notifications(&self, notifications: Vec<Notification>) {
        *self.notifications.lock().unwrap() = notifications;
    }

    pub fn set_licenses(&self, licenses: Vec<LicenseRecord>) {
        *self.licenses.lock().unwrap() = licenses;
    }

    pub fn set_status(&self, status: NotificationStatus) {
        *self.status.lock().unwrap() = status;
    }

    pub fn fail_notifications(&self, failure: Failure) {
        self.failures.lock().unwrap().notifications = Some(failure);
    }

    pub fn fail_mark_read(&self, failure: Failure) {
        self.failures.lock().unwrap().mark_read = Some(failure);
    }

    pub fn fail_status(&self, failure: Failure) {
        self.failures.lock().unwrap().status = Some(failure);
    }

    pub fn fail_update_hash(&self, failure: Failure) {
        self.failures.lock().unwrap().update_hash = Some(failure);
    }

    pub fn fail_licenses(&self, failure: Failure) {
        self.failures.lock().unwrap().licenses = Some(failure);
    }

    pub fn fail_approve(&self, failure: Failure) {
        self.failures.lock().unwrap().approve = Some(failure);
    }

    pub fn fail_decline(&self, failure: Failure) {
        self.failures.lock().unwrap().decline = Some(failure);
    }

    /// Hold approve/decline calls until the returned handle is notified.
    pub fn gate_actions(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some(notify.clone());
        notify
    }

    /// Hold notification and license fetches until the returned handle is
    /// notified.
    pub fn gate_loads(&self) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.load_gate.lock().unwrap() = Some(notify.clone());
        notify
    }

    /// All calls made so far, in order.
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of status lookups made so far.
    pub fn status_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, BackendCall::NotificationStatus(_)))
            .count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, pick: impl FnOnce(&Failures) -> &Option<Failure>) -> Result<(), ApiError> {
        match pick(&self.failures.lock().unwrap()) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    async fn wait_gate(gate: &Mutex<Option<Arc<Notify>>>) {
        let gate = gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

impl Default for NullBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendApi for NullBackend {
    async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.record(BackendCall::Notifications);
        Self::wait_gate(&self.load_gate).await;
        self.check(|f| &f.notifications)?;
        Ok(self.notifications.lock().unwrap().clone())
    }

    async fn mark_notification_read(&self, id: &RequestId) -> Result<(), ApiError> {
        self.record(BackendCall::MarkRead(id.clone()));
        self.check(|f| &f.mark_read)
    }

    async fn notification_status(
        &self,
        id: &RequestId,
    ) -> Result<NotificationStatusSnapshot, ApiError> {
        self.record(BackendCall::NotificationStatus(id.clone()));
        self.check(|f| &f.status)?;
        Ok(NotificationStatusSnapshot {
            status: self.status.lock().unwrap().clone(),
            transaction_hash: None,
        })
    }

    async fn update_notification_hash(
        &self,
        id: &RequestId,
        tx_hash: &TxHash,
    ) -> Result<(), ApiError> {
        self.record(BackendCall::UpdateHash(id.clone(), *tx_hash));
        self.check(|f| &f.update_hash)
    }

    async fn licenses(&self) -> Result<Vec<LicenseRecord>, ApiError> {
        self.record(BackendCall::Licenses);
        Self::wait_gate(&self.load_gate).await;
        self.check(|f| &f.licenses)?;
        Ok(self.licenses.lock().unwrap().clone())
    }

    async fn approve_verification(
        &self,
        id: &RequestId,
        details: &ApprovalDetails,
    ) -> Result<ActionResponse, ApiError> {
        self.record(BackendCall::Approve(id.clone(), details.clone()));
        Self::wait_gate(&self.gate).await;
        self.check(|f| &f.approve)?;
        self.set_status(NotificationStatus::Approved);
        Ok(ActionResponse {
            message: "Verification approved".into(),
        })
    }

    async fn decline_verification(&self, id: &RequestId) -> Result<ActionResponse, ApiError> {
        self.record(BackendCall::Decline(id.clone()));
        Self::wait_gate(&self.gate).await;
        self.check(|f| &f.decline)?;
        self.set_status(NotificationStatus::Declined);
        Ok(ActionResponse {
            message: "Verification declined".into(),
        })
    }
}
