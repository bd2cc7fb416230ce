//! Wallet providers: a remote signing endpoint or a local key.

use std::sync::Arc;

use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use licverify_types::AccountAddress;
use tracing::{debug, info};

use crate::binding::{from_alloy, AlloyVerificationContract};
use crate::error::ChainError;
use crate::{VerificationContract, WalletProvider};

fn parse_url(rpc_url: &str) -> Result<Url, ChainError> {
    rpc_url
        .parse()
        .map_err(|e| ChainError::Connection(format!("invalid wallet RPC URL {rpc_url}: {e}")))
}

/// A wallet reached over JSON-RPC that holds its own keys.
///
/// Accounts come from `eth_requestAccounts`, so wallets that prompt the user
/// for access do so here.
pub struct RpcWallet {
    rpc_url: Url,
}

impl RpcWallet {
    pub fn new(rpc_url: &str) -> Result<Self, ChainError> {
        Ok(Self {
            rpc_url: parse_url(rpc_url)?,
        })
    }
}

#[async_trait]
impl WalletProvider for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>, ChainError> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.clone());
        let accounts: Vec<Address> = provider
            .raw_request("eth_requestAccounts".into(), Vec::<String>::new())
            .await
            .map_err(|e| ChainError::Connection(format!("account request failed: {e}")))?;
        debug!(count = accounts.len(), "wallet accounts granted");
        Ok(accounts.into_iter().map(from_alloy).collect())
    }

    fn bind(
        &self,
        account: AccountAddress,
        contract: AccountAddress,
    ) -> Box<dyn VerificationContract> {
        Box::new(AlloyVerificationContract::new(
            self.rpc_url.clone(),
            account,
            contract,
            None,
        ))
    }
}

/// A single hex private key that signs locally and submits through `rpc_url`.
pub struct LocalKeyWallet {
    rpc_url: Url,
    signer: PrivateKeySigner,
}

impl LocalKeyWallet {
    pub fn new(rpc_url: &str, private_key: &str) -> Result<Self, ChainError> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| ChainError::Connection(format!("invalid private key: {e}")))?;
        Ok(Self {
            rpc_url: parse_url(rpc_url)?,
            signer,
        })
    }

    pub fn address(&self) -> AccountAddress {
        from_alloy(self.signer.address())
    }
}

#[async_trait]
impl WalletProvider for LocalKeyWallet {
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>, ChainError> {
        Ok(vec![self.address()])
    }

    fn bind(
        &self,
        account: AccountAddress,
        contract: AccountAddress,
    ) -> Box<dyn VerificationContract> {
        Box::new(AlloyVerificationContract::new(
            self.rpc_url.clone(),
            account,
            contract,
            Some(self.signer.clone()),
        ))
    }
}

/// Build the wallet described by the configuration, if any.
///
/// `Ok(None)` means no wallet is present; callers surface that as
/// [`ChainError::WalletUnavailable`] when a wallet is actually needed.
pub fn detect_wallet(
    rpc_url: Option<&str>,
    private_key: Option<&str>,
) -> Result<Option<Arc<dyn WalletProvider>>, ChainError> {
    match (rpc_url, private_key) {
        (None, None) => Ok(None),
        (None, Some(_)) => Err(ChainError::Connection(
            "a wallet private key also needs a wallet RPC URL".into(),
        )),
        (Some(url), None) => {
            info!(url, "using RPC wallet");
            Ok(Some(Arc::new(RpcWallet::new(url)?)))
        }
        (Some(url), Some(key)) => {
            let wallet = LocalKeyWallet::new(url, key)?;
            info!(url, account = %wallet.address(), "using local key wallet");
            Ok(Some(Arc::new(wallet)))
        }
    }
}
