use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend could not be reached or the connection broke.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status.
    #[error("{}", request_message(.status, .server_message))]
    Request {
        status: u16,
        server_message: Option<String>,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The message the server put in the error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Request { server_message, .. } => server_message.as_deref(),
            _ => None,
        }
    }
}

fn request_message(status: &u16, server_message: &Option<String>) -> String {
    match server_message {
        Some(msg) => msg.clone(),
        None => format!("backend returned HTTP {status}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_error_prefers_server_message() {
        let err = ApiError::Request {
            status: 409,
            server_message: Some("Request already approved".into()),
        };
        assert_eq!(err.to_string(), "Request already approved");
        assert_eq!(err.server_message(), Some("Request already approved"));
    }

    #[test]
    fn request_error_without_body_is_generic() {
        let err = ApiError::Request {
            status: 502,
            server_message: None,
        };
        assert_eq!(err.to_string(), "backend returned HTTP 502");
        assert_eq!(err.server_message(), None);
    }

    #[test]
    fn network_error_has_no_server_message() {
        assert_eq!(ApiError::Network("refused".into()).server_message(), None);
    }
}
