//! Wallet and contract access for licverify.
//!
//! A [`WalletProvider`] hands out accounts and binds one of them to the
//! verification contract, producing a [`VerificationContract`] handle.
//! [`ChainClient`] sits on top and is the only thing the console talks to:
//! it connects on every call and never caches on-chain state.

pub mod binding;
pub mod client;
pub mod error;
pub mod wallet;

use async_trait::async_trait;
use licverify_types::{AccountAddress, RequestId, TxHash, VerificationRecord, VerificationRequest};

pub use binding::{AlloyVerificationContract, DEFAULT_CONTRACT_ADDRESS};
pub use client::ChainClient;
pub use error::{extract_reason, ChainError};
pub use wallet::{detect_wallet, LocalKeyWallet, RpcWallet};

/// A callable binding to the verification contract, scoped to one signing account.
#[async_trait]
pub trait VerificationContract: Send + Sync {
    /// The account transactions are sent from.
    fn account(&self) -> AccountAddress;

    /// Submit `recordVerification` and wait for it to be mined.
    ///
    /// A mined-but-reverted transaction is an error.
    async fn record_verification(&self, request: &VerificationRequest)
        -> Result<TxHash, ChainError>;

    /// Read-only `getVerificationStatus` query.
    async fn verification_status(
        &self,
        request_id: &RequestId,
    ) -> Result<VerificationRecord, ChainError>;
}

/// Source of signing accounts.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for account access.
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>, ChainError>;

    /// Bind `account` to the contract deployed at `contract`.
    fn bind(&self, account: AccountAddress, contract: AccountAddress)
        -> Box<dyn VerificationContract>;
}
