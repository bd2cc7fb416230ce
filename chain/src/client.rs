//! The wallet/contract client used by the console.

use std::sync::Arc;

use licverify_api::BackendApi;
use licverify_types::{AccountAddress, RequestId, TxHash, VerificationRecord, VerificationRequest};
use tracing::{info, warn};

use crate::error::ChainError;
use crate::{VerificationContract, WalletProvider};

/// Records verifications on chain and reads them back.
///
/// The wallet provider is injected once; the contract binding is recreated
/// by every operation.
pub struct ChainClient {
    wallet: Option<Arc<dyn WalletProvider>>,
    contract: AccountAddress,
    backend: Arc<dyn BackendApi>,
}

impl ChainClient {
    pub fn new(
        wallet: Option<Arc<dyn WalletProvider>>,
        contract: AccountAddress,
        backend: Arc<dyn BackendApi>,
    ) -> Self {
        Self {
            wallet,
            contract,
            backend,
        }
    }

    /// Whether a wallet provider is present at all.
    pub fn is_wallet_available(&self) -> bool {
        self.wallet.is_some()
    }

    pub fn contract_address(&self) -> AccountAddress {
        self.contract
    }

    fn wallet(&self) -> Result<&Arc<dyn WalletProvider>, ChainError> {
        self.wallet.as_ref().ok_or(ChainError::WalletUnavailable)
    }

    /// First account the wallet grants access to.
    pub async fn primary_account(&self) -> Result<AccountAddress, ChainError> {
        let accounts = self.wallet()?.request_accounts().await?;
        accounts.first().copied().ok_or(ChainError::NoAccounts)
    }

    /// Request account access and bind the first account to the contract.
    pub async fn connect(&self) -> Result<Box<dyn VerificationContract>, ChainError> {
        let wallet = self.wallet()?;
        let account = self.primary_account().await?;
        info!(%account, contract = %self.contract, "wallet connected");
        Ok(wallet.bind(account, self.contract))
    }

    /// Record a verification result and tell the backend the transaction hash.
    ///
    /// If the transaction confirms but the backend update fails, the error is
    /// [`ChainError::BackendSync`] and still carries the hash.
    pub async fn record_verification(
        &self,
        request: &VerificationRequest,
    ) -> Result<TxHash, ChainError> {
        let contract = self.connect().await?;
        let tx_hash = contract.record_verification(request).await?;

        if let Err(source) = self
            .backend
            .update_notification_hash(&request.request_id, &tx_hash)
            .await
        {
            warn!(
                request_id = %request.request_id,
                %tx_hash,
                error = %source,
                "backend hash update failed"
            );
            return Err(ChainError::BackendSync { tx_hash, source });
        }
        Ok(tx_hash)
    }

    /// Fresh read of the on-chain record for `request_id`.
    pub async fn get_verification_status(
        &self,
        request_id: &RequestId,
    ) -> Result<VerificationRecord, ChainError> {
        let contract = self.connect().await?;
        contract.verification_status(request_id).await
    }
}
