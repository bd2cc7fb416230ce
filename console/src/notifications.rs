//! Notification list view.

use std::fmt::Write;

use licverify_api::{ApiError, BackendApi};
use licverify_types::{sort_newest_first, Notification, RequestId};
use licverify_utils::format_local;
use tracing::{info, warn};

use crate::list::ListState;

/// Pending verification requests, newest first.
#[derive(Debug, Default)]
pub struct NotificationListView {
    list: ListState<Notification>,
}

impl NotificationListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the collection once and sort it by creation time, descending.
    pub async fn load(&self, backend: &dyn BackendApi) {
        self.list
            .load("notifications", async {
                let mut notifications = backend.notifications().await?;
                sort_newest_first(&mut notifications);
                Ok::<_, ApiError>(notifications)
            })
            .await;
        info!(count = self.list.len(), "notifications loaded");
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.list.items()
    }

    pub fn is_loading(&self) -> bool {
        self.list.is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.list.error()
    }

    /// Mark a notification read and drop it from the list.
    pub async fn mark_read(
        &self,
        backend: &dyn BackendApi,
        id: &RequestId,
    ) -> Result<(), ApiError> {
        if let Err(e) = backend.mark_notification_read(id).await {
            warn!(%id, error = %e, "failed to mark notification as read");
            return Err(e);
        }
        self.list.retain(|n| &n.id != id);
        Ok(())
    }

    /// The record to hand to the approval view. Never re-fetched.
    pub fn open(&self, id: &RequestId) -> Option<Notification> {
        self.list.find(|n| &n.id == id)
    }

    pub fn render(&self) -> String {
        let mut out = String::from("Your Notifications\n");
        if self.list.is_loading() {
            out.push_str("Loading Notifications...\n");
        }
        if let Some(error) = self.list.error() {
            let _ = writeln!(out, "{error}");
        }

        let notifications = self.list.items();
        let total = notifications.len();
        for (index, n) in notifications.iter().enumerate() {
            let _ = writeln!(out);
            let _ = writeln!(out, "#{} - Id: {}", total - index, n.id);
            let _ = writeln!(out, "  Created at: {}", format_local(&n.created_at));
            let _ = writeln!(out, "  {}", n.message);
            let _ = writeln!(out, "  Status: {}", n.status);
            let _ = writeln!(out, "  Approve/Decline Verification: licverify approve {}", n.id);
        }
        out
    }
}
