//! HTTP implementation of [`BackendApi`].

use std::time::Duration;

use async_trait::async_trait;
use licverify_types::{LicenseRecord, Notification, NotificationStatusSnapshot, RequestId, TxHash};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::{ActionResponse, ApprovalDetails, BackendApi};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// REST client for the verification backend.
///
/// Wraps `reqwest::Client` with the backend's base URL and provides typed
/// methods for each endpoint the console needs.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: Url,
}

/// Collections and status lookups come wrapped in `{ "data": ... }`.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HashUpdate<'a> {
    request_id: &'a str,
    transaction_hash: String,
}

impl BackendClient {
    /// Create a client for the backend at `base_url` (e.g. `http://localhost:3000`).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = base_url.into();
        let parsed =
            Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(format!("{base_url}: not a base URL")));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Network(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// The configured base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Endpoint URL under the base path. Each segment is percent-encoded, so
    /// ids cannot add segments, a query or a fragment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.http.request(method, self.url(segments))
    }

    /// Send a request and fail on transport errors or non-2xx status.
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Network(format!("request failed: {e}")))?;

        let status = response.status();
        debug!(url = %response.url(), status = status.as_u16(), "backend response");
        if status.is_success() {
            return Ok(response);
        }

        // Error bodies are best-effort: an unreadable one still yields a RequestError.
        let body = response.text().await.unwrap_or_default();
        let server_message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error.or(b.message))
            .filter(|m| !m.is_empty());
        Err(ApiError::Request {
            status: status.as_u16(),
            server_message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read {what} response: {e}")))?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Parse(format!("invalid {what} response: {e}")))
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        what: &str,
    ) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, segments)).await?;
        let envelope: Envelope<T> = Self::decode(response, what).await?;
        Ok(envelope.data)
    }

    /// Decode an action reply; an empty body counts as an empty message.
    async fn action_response(response: Response) -> Result<ActionResponse, ApiError> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(format!("failed to read action response: {e}")))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(ActionResponse::default());
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::Parse(format!("invalid action response: {e}")))
    }
}

#[async_trait]
impl BackendApi for BackendClient {
    async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.get_data(&["api", "v1", "notifications"], "notifications")
            .await
    }

    async fn mark_notification_read(&self, id: &RequestId) -> Result<(), ApiError> {
        let path = ["api", "v1", "notifications", id.as_str(), "read"];
        self.send(self.request(Method::PATCH, &path)).await?;
        Ok(())
    }

    async fn notification_status(
        &self,
        id: &RequestId,
    ) -> Result<NotificationStatusSnapshot, ApiError> {
        let path = ["api", "v1", "notifications", id.as_str(), "status"];
        self.get_data(&path, "notification status").await
    }

    async fn update_notification_hash(
        &self,
        id: &RequestId,
        tx_hash: &TxHash,
    ) -> Result<(), ApiError> {
        let body = HashUpdate {
            request_id: id.as_str(),
            transaction_hash: tx_hash.to_string(),
        };
        let request = self
            .request(
                Method::POST,
                &["api", "v1", "notifications", "updateNotification"],
            )
            .json(&body);
        self.send(request).await?;
        Ok(())
    }

    async fn licenses(&self) -> Result<Vec<LicenseRecord>, ApiError> {
        self.get_data(&["api", "v1", "licenses", "drivers"], "licenses")
            .await
    }

    async fn approve_verification(
        &self,
        id: &RequestId,
        details: &ApprovalDetails,
    ) -> Result<ActionResponse, ApiError> {
        let path = ["api", "v1", "verification", id.as_str(), "approve"];
        let response = self
            .send(self.request(Method::POST, &path).json(details))
            .await?;
        Self::action_response(response).await
    }

    async fn decline_verification(&self, id: &RequestId) -> Result<ActionResponse, ApiError> {
        let path = ["api", "v1", "verification", id.as_str(), "decline"];
        let response = self.send(self.request(Method::POST, &path)).await?;
        Self::action_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licverify_types::NotificationStatus;
    use mockito::{Matcher, Server};

    fn client(server: &Server) -> BackendClient {
        BackendClient::new(server.url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = BackendClient::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn trims_trailing_slash() {
        let client = BackendClient::new("http://localhost:3000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
    }

    #[tokio::test]
    async fn lists_notifications() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/notifications")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                serde_json::json!({
                    "data": [{
                        "_id": "n1",
                        "message": "Verify Doe",
                        "status": "pending",
                        "createdAt": "2024-06-04T12:30:00.000Z",
                        "lastName": "Doe",
                        "licenseType": "B"
                    }]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let list = client(&server).notifications().await.unwrap();
        mock.assert_async().await;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id.as_str(), "n1");
        assert_eq!(list[0].status, NotificationStatus::Pending);
    }

    #[tokio::test]
    async fn approve_sends_license_details() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/verification/n1/approve")
            .match_body(Matcher::Json(serde_json::json!({
                "lastName": "Doe",
                "licenseType": "B"
            })))
            .with_status(200)
            .with_body(r#"{"message":"Verification approved"}"#)
            .create_async()
            .await;

        let details = ApprovalDetails {
            last_name: "Doe".into(),
            license_type: "B".into(),
        };
        let response = client(&server)
            .approve_verification(&RequestId::from("n1"), &details)
            .await
            .unwrap();
        mock.assert_async().await;
        assert_eq!(response.message, "Verification approved");
    }

    #[tokio::test]
    async fn error_body_message_is_surfaced() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/v1/verification/n1/decline")
            .with_status(404)
            .with_body(r#"{"error":"Verification request not found"}"#)
            .create_async()
            .await;

        let err = client(&server)
            .decline_verification(&RequestId::from("n1"))
            .await
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Verification request not found"));
        assert!(matches!(err, ApiError::Request { status: 404, .. }));
    }

    #[tokio::test]
    async fn error_without_json_body_is_generic() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/licenses/drivers")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let err = client(&server).licenses().await.unwrap_err();
        assert_eq!(err.server_message(), None);
        assert_eq!(err.to_string(), "backend returned HTTP 500");
    }

    #[tokio::test]
    async fn unexpected_shape_is_parse_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/licenses/drivers")
            .with_status(200)
            .with_body(r#"{"items":[]}"#)
            .create_async()
            .await;

        let err = client(&server).licenses().await.unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }

    #[tokio::test]
    async fn hash_update_posts_request_and_hash() {
        let mut server = Server::new_async().await;
        let hash = TxHash::new([0xab; 32]);
        let mock = server
            .mock("POST", "/api/v1/notifications/updateNotification")
            .match_body(Matcher::Json(serde_json::json!({
                "requestId": "n1",
                "transactionHash": hash.to_string()
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        client(&server)
            .update_notification_hash(&RequestId::from("n1"), &hash)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn reads_notification_status() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/v1/notifications/n1/status")
            .with_status(200)
            .with_body(r#"{"data":{"status":"approved"}}"#)
            .create_async()
            .await;

        let snapshot = client(&server)
            .notification_status(&RequestId::from("n1"))
            .await
            .unwrap();
        assert_eq!(snapshot.status, NotificationStatus::Approved);
    }

    #[tokio::test]
    async fn mark_read_uses_patch() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/api/v1/notifications/n1/read")
            .with_status(204)
            .create_async()
            .await;

        client(&server)
            .mark_notification_read(&RequestId::from("n1"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn base_path_is_kept() {
        let client =
            BackendClient::new("http://localhost:3000/backend/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.url(&["api", "v1", "licenses", "drivers"]).as_str(),
            "http://localhost:3000/backend/api/v1/licenses/drivers"
        );
    }

    #[tokio::test]
    async fn id_cannot_change_the_route() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PATCH", "/api/v1/notifications/a%2Fb%3Fc%23d/read")
            .with_status(204)
            .create_async()
            .await;

        client(&server)
            .mark_notification_read(&RequestId::from("a/b?c#d"))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_backend_is_network_error() {
        // Port 9 (discard) is not expected to accept HTTP connections.
        let client = BackendClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.notifications().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }
}
