use licverify_api::ApiError;
use licverify_types::TxHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("no wallet provider is configured")]
    WalletUnavailable,

    #[error("wallet returned no accounts")]
    NoAccounts,

    #[error("wallet connection failed: {0}")]
    Connection(String),

    /// Revert, rejection by the wallet, or a failed query.
    #[error("contract call failed: {message}")]
    ContractCall {
        message: String,
        /// Revert reason, when one could be recovered.
        reason: Option<String>,
    },

    /// The transaction is on chain but the backend never learned its hash.
    #[error("transaction {tx_hash} confirmed but the backend update failed: {source}")]
    BackendSync { tx_hash: TxHash, source: ApiError },
}

impl ChainError {
    /// A contract failure whose reason is recovered from the message text.
    pub fn contract_call(message: impl Into<String>) -> Self {
        Self::contract_call_with_reason(message, None)
    }

    /// A contract failure with an already-decoded revert reason.
    ///
    /// Without one, the `reason="..."` pattern in `message` is tried.
    pub fn contract_call_with_reason(message: impl Into<String>, decoded: Option<String>) -> Self {
        let message = message.into();
        let reason = decoded
            .filter(|r| !r.is_empty())
            .or_else(|| extract_reason(&message).map(str::to_string));
        Self::ContractCall { message, reason }
    }

    pub fn revert_reason(&self) -> Option<&str> {
        match self {
            Self::ContractCall { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }
}

/// Pull the text out of the first `reason="..."` in `text`.
///
/// The reason must be at least one character long; it ends at the next
/// double quote.
pub fn extract_reason(text: &str) -> Option<&str> {
    const MARKER: &str = "reason=\"";
    let start = text.find(MARKER)? + MARKER.len();
    let rest = &text[start..];
    let first = rest.chars().next()?.len_utf8();
    let end = first + rest[first..].find('"')?;
    Some(&rest[..end])
}
