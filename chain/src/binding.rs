//! Alloy binding for the license verification contract.

use alloy::contract::Error as ContractError;
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionReceipt;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol;
use alloy::sol_types::{Revert, SolError};
use alloy::transports::http::reqwest::Url;
use alloy::transports::{RpcError, Transport};
use async_trait::async_trait;
use licverify_types::{
    AccountAddress, RequestId, Timestamp, TxHash, VerificationRecord, VerificationRequest,
};
use tracing::{debug, info};

use crate::error::ChainError;
use crate::VerificationContract;

/// Address of the deployed verification contract.
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0xc761F8E6Cb9af69C49ef3EaA1140b07AAd8056e9";

sol! {
    #[sol(rpc)]
    interface ILicenseVerification {
        function recordVerification(
            string requestId,
            address userAddress,
            string licenseType,
            bool isVerified
        ) external;

        function getVerificationStatus(string requestId)
            external
            view
            returns (bool isVerified, string licenseType, uint256 timestamp, address userAddress);
    }
}

pub(crate) fn to_alloy(address: AccountAddress) -> Address {
    Address::from(*address.as_bytes())
}

pub(crate) fn from_alloy(address: Address) -> AccountAddress {
    AccountAddress::new(address.into_array())
}

/// Map a binding error, decoding an ABI `Error(string)` revert if the node sent one.
fn contract_error(context: &str, err: ContractError) -> ChainError {
    let decoded = match &err {
        ContractError::TransportError(RpcError::ErrorResp(payload)) => payload
            .as_revert_data()
            .and_then(|data| Revert::abi_decode(&data, true).ok())
            .map(|revert| revert.reason),
        _ => None,
    };
    ChainError::contract_call_with_reason(format!("{context}: {err}"), decoded)
}

/// Contract handle over an HTTP JSON-RPC endpoint.
///
/// Without a local signer the endpoint itself signs (`eth_sendTransaction`
/// from [`account`](VerificationContract::account)); with one, transactions
/// are signed here and submitted raw. A fresh provider is built per call.
pub struct AlloyVerificationContract {
    rpc_url: Url,
    account: Address,
    contract: Address,
    signer: Option<PrivateKeySigner>,
}

impl AlloyVerificationContract {
    pub fn new(
        rpc_url: Url,
        account: AccountAddress,
        contract: AccountAddress,
        signer: Option<PrivateKeySigner>,
    ) -> Self {
        Self {
            rpc_url,
            account: to_alloy(account),
            contract: to_alloy(contract),
            signer,
        }
    }

    async fn submit<T, P>(
        &self,
        contract: &ILicenseVerification::ILicenseVerificationInstance<T, P>,
        request: &VerificationRequest,
    ) -> Result<TransactionReceipt, ChainError>
    where
        T: Transport + Clone,
        P: Provider<T>,
    {
        let pending = contract
            .recordVerification(
                request.request_id.to_string(),
                to_alloy(request.user_address),
                request.license_type.clone(),
                request.is_verified,
            )
            .from(self.account)
            .send()
            .await
            .map_err(|e| contract_error("failed to send transaction", e))?;

        info!(
            request_id = %request.request_id,
            tx_hash = %pending.tx_hash(),
            "verification transaction sent"
        );

        pending
            .get_receipt()
            .await
            .map_err(|e| ChainError::contract_call(format!("failed to get receipt: {e}")))
    }
}

#[async_trait]
impl VerificationContract for AlloyVerificationContract {
    fn account(&self) -> AccountAddress {
        from_alloy(self.account)
    }

    async fn record_verification(
        &self,
        request: &VerificationRequest,
    ) -> Result<TxHash, ChainError> {
        let receipt = match &self.signer {
            Some(signer) => {
                let provider = ProviderBuilder::new()
                    .with_recommended_fillers()
                    .wallet(EthereumWallet::from(signer.clone()))
                    .on_http(self.rpc_url.clone());
                let contract = ILicenseVerification::new(self.contract, &provider);
                self.submit(&contract, request).await?
            }
            None => {
                let provider = ProviderBuilder::new()
                    .with_recommended_fillers()
                    .on_http(self.rpc_url.clone());
                let contract = ILicenseVerification::new(self.contract, &provider);
                self.submit(&contract, request).await?
            }
        };

        let tx_hash = TxHash::new(receipt.transaction_hash.0);
        if !receipt.status() {
            return Err(ChainError::contract_call(format!(
                "transaction {tx_hash} reverted"
            )));
        }

        info!(
            request_id = %request.request_id,
            %tx_hash,
            block = receipt.block_number.unwrap_or(0),
            "verification recorded"
        );
        Ok(tx_hash)
    }

    async fn verification_status(
        &self,
        request_id: &RequestId,
    ) -> Result<VerificationRecord, ChainError> {
        let provider = ProviderBuilder::new().on_http(self.rpc_url.clone());
        let contract = ILicenseVerification::new(self.contract, &provider);

        let status = contract
            .getVerificationStatus(request_id.to_string())
            .from(self.account)
            .call()
            .await
            .map_err(|e| contract_error("status query failed", e))?;

        let secs = u64::try_from(status.timestamp).map_err(|_| {
            ChainError::contract_call(format!("timestamp {} out of range", status.timestamp))
        })?;
        debug!(%request_id, verified = status.isVerified, "verification status read");

        Ok(VerificationRecord {
            request_id: request_id.clone(),
            is_verified: status.isVerified,
            license_type: status.licenseType,
            timestamp: Timestamp::new(secs),
            user_address: from_alloy(status.userAddress),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_contract_address_parses() {
        let address: AccountAddress = DEFAULT_CONTRACT_ADDRESS.parse().unwrap();
        assert_eq!(
            address.to_string(),
            DEFAULT_CONTRACT_ADDRESS.to_ascii_lowercase()
        );
    }

    #[test]
    fn address_conversion_round_trips() {
        let address = AccountAddress::new([0x42; 20]);
        assert_eq!(from_alloy(to_alloy(address)), address);
    }

    #[test]
    fn record_call_encodes_arguments() {
        use alloy::sol_types::SolCall;

        let call = ILicenseVerification::recordVerificationCall {
            requestId: "n1".into(),
            userAddress: Address::repeat_byte(0x11),
            licenseType: "B".into(),
            isVerified: true,
        };
        let encoded = call.abi_encode();
        assert_eq!(
            &encoded[..4],
            ILicenseVerification::recordVerificationCall::SELECTOR.as_slice()
        );
        let decoded =
            ILicenseVerification::recordVerificationCall::abi_decode(&encoded, true).unwrap();
        assert_eq!(decoded.requestId, "n1");
        assert!(decoded.isVerified);
    }

    fn revert_response(data: &str) -> ContractError {
        let json = format!(r#"{{"code":3,"message":"execution reverted","data":"{data}"}}"#);
        let payload: alloy::rpc::json_rpc::ErrorPayload = serde_json::from_str(&json).unwrap();
        ContractError::TransportError(RpcError::ErrorResp(payload))
    }

    #[test]
    fn revert_reason_decoded_from_error_data() {
        let data = alloy::hex::encode_prefixed(
            Revert::from("insufficient funds".to_string()).abi_encode(),
        );
        let err = contract_error("failed to send transaction", revert_response(&data));

        assert_eq!(err.revert_reason(), Some("insufficient funds"));
        assert!(!err.to_string().contains("reason=\""));
    }

    #[test]
    fn non_revert_error_data_has_no_reason() {
        let err = contract_error("failed to send transaction", revert_response("0x1234"));
        assert_eq!(err.revert_reason(), None);
    }
}
