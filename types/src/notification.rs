//! Verification-request notifications as served by the backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a verification request.
///
/// The backend uses the notification's document id as the request id, so the
/// same value keys the REST routes and the on-chain record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Review status of a notification.
///
/// Values the console does not know are kept verbatim so they still render.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationStatus {
    Pending,
    Approved,
    Declined,
    Other(String),
}

impl NotificationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for NotificationStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Self::Pending,
            "approved" => Self::Approved,
            "declined" => Self::Declined,
            _ => Self::Other(s),
        }
    }
}

impl From<NotificationStatus> for String {
    fn from(status: NotificationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for NotificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pending verification request awaiting approval or decline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: RequestId,
    pub message: String,
    pub status: NotificationStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub license_type: String,
}

/// Body of the status-by-id endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationStatusSnapshot {
    pub status: NotificationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}

/// Order notifications newest first by creation time.
///
/// The sort is stable, so notifications created at the same instant keep
/// the order the backend returned them in.
pub fn sort_newest_first(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(id: &str, created_at: &str) -> Notification {
        Notification {
            id: RequestId::from(id),
            message: format!("request {id}"),
            status: NotificationStatus::Pending,
            created_at: created_at.parse().unwrap(),
            last_name: "Doe".into(),
            license_type: "B".into(),
        }
    }

    #[test]
    fn deserializes_backend_document() {
        let json = r#"{
            "_id": "665f1c2e9b1d4a0012345678",
            "message": "Verification requested for Doe",
            "status": "pending",
            "createdAt": "2024-06-04T12:30:00.000Z",
            "lastName": "Doe",
            "licenseType": "B",
            "read": false
        }"#;
        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.id.as_str(), "665f1c2e9b1d4a0012345678");
        assert_eq!(n.status, NotificationStatus::Pending);
        assert_eq!(n.last_name, "Doe");
        assert_eq!(n.license_type, "B");
    }

    #[test]
    fn unknown_status_is_preserved() {
        let status = NotificationStatus::from("Escalated".to_string());
        assert_eq!(status, NotificationStatus::Other("Escalated".into()));
        assert_eq!(status.to_string(), "Escalated");
    }

    #[test]
    fn status_is_case_insensitive() {
        assert_eq!(
            NotificationStatus::from("APPROVED".to_string()),
            NotificationStatus::Approved
        );
    }

    #[test]
    fn sorts_newest_first() {
        let mut list = vec![
            notification("a", "2024-01-01T00:00:00Z"),
            notification("c", "2024-03-01T00:00:00Z"),
            notification("b", "2024-02-01T00:00:00Z"),
        ];
        sort_newest_first(&mut list);
        let ids: Vec<_> = list.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }

    #[test]
    fn snapshot_without_hash() {
        let snap: NotificationStatusSnapshot =
            serde_json::from_str(r#"{"status":"approved"}"#).unwrap();
        assert_eq!(snap.status, NotificationStatus::Approved);
        assert!(snap.transaction_hash.is_none());
    }
}
