//! Nullable wallet and contract: an in-memory verification registry.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use licverify_chain::{ChainError, VerificationContract, WalletProvider};
use licverify_types::{
    AccountAddress, RequestId, Timestamp, TxHash, VerificationRecord, VerificationRequest,
};

/// Contract state shared by every handle a [`NullWallet`] binds.
///
/// Records are keyed by request id and stamped with a fixed block
/// time. Transaction hashes are sequential.
pub struct NullContract {
    records: Mutex<HashMap<RequestId, VerificationRecord>>,
    submissions: Mutex<Vec<VerificationRequest>>,
    block_time: u64,
    tx_counter: AtomicU64,
    queries: AtomicUsize,
    record_failure: Mutex<Option<String>>,
    status_failure: Mutex<Option<String>>,
}

impl NullContract {
    pub fn new(block_time: u64) -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            submissions: Mutex::new(Vec::new()),
            block_time,
            tx_counter: AtomicU64::new(0),
            queries: AtomicUsize::new(0),
            record_failure: Mutex::new(None),
            status_failure: Mutex::new(None),
        }
    }

    /// Make every `recordVerification` fail with this error text.
    pub fn revert_with(&self, message: impl Into<String>) {
        *self.record_failure.lock().unwrap() = Some(message.into());
    }

    /// Make every status query fail with this error text.
    pub fn fail_queries(&self, message: impl Into<String>) {
        *self.status_failure.lock().unwrap() = Some(message.into());
    }

    /// Transactions submitted so far (including ones that reverted).
    pub fn submissions(&self) -> Vec<VerificationRequest> {
        self.submissions.lock().unwrap().clone()
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn record(&self, request_id: &RequestId) -> Option<VerificationRecord> {
        self.records.lock().unwrap().get(request_id).cloned()
    }

    fn next_hash(&self) -> TxHash {
        let n = self.tx_counter.fetch_add(1, Ordering::SeqCst) + 1;
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&n.to_be_bytes());
        TxHash::new(bytes)
    }
}

struct BoundNullContract {
    account: AccountAddress,
    chain: Arc<NullContract>,
}

#[async_trait]
impl VerificationContract for BoundNullContract {
    fn account(&self) -> AccountAddress {
        self.account
    }

    async fn record_verification(
        &self,
        request: &VerificationRequest,
    ) -> Result<TxHash, ChainError> {
        self.chain.submissions.lock().unwrap().push(request.clone());
        if let Some(message) = self.chain.record_failure.lock().unwrap().clone() {
            return Err(ChainError::contract_call(message));
        }

        let record = VerificationRecord {
            request_id: request.request_id.clone(),
            is_verified: request.is_verified,
            license_type: request.license_type.clone(),
            timestamp: Timestamp::new(self.chain.block_time),
            user_address: request.user_address,
        };
        self.chain
            .records
            .lock()
            .unwrap()
            .insert(request.request_id.clone(), record);
        Ok(self.chain.next_hash())
    }

    async fn verification_status(
        &self,
        request_id: &RequestId,
    ) -> Result<VerificationRecord, ChainError> {
        self.chain.queries.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.chain.status_failure.lock().unwrap().clone() {
            return Err(ChainError::contract_call(message));
        }
        // Unset entries read back zeroed, like a Solidity mapping.
        Ok(self.chain.record(request_id).unwrap_or(VerificationRecord {
            request_id: request_id.clone(),
            is_verified: false,
            license_type: String::new(),
            timestamp: Timestamp::EPOCH,
            user_address: AccountAddress::ZERO,
        }))
    }
}

/// A wallet with a fixed account list, bound to a shared [`NullContract`].
pub struct NullWallet {
    accounts: Vec<AccountAddress>,
    chain: Arc<NullContract>,
    account_requests: AtomicUsize,
    binds: AtomicUsize,
}

impl NullWallet {
    pub fn new(accounts: Vec<AccountAddress>, chain: Arc<NullContract>) -> Self {
        Self {
            accounts,
            chain,
            account_requests: AtomicUsize::new(0),
            binds: AtomicUsize::new(0),
        }
    }

    /// Number of `request_accounts` calls made so far.
    pub fn account_requests(&self) -> usize {
        self.account_requests.load(Ordering::SeqCst)
    }

    /// Number of contract handles created so far.
    pub fn binds(&self) -> usize {
        self.binds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WalletProvider for NullWallet {
    async fn request_accounts(&self) -> Result<Vec<AccountAddress>, ChainError> {
        self.account_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.accounts.clone())
    }

    fn bind(
        &self,
        account: AccountAddress,
        _contract: AccountAddress,
    ) -> Box<dyn VerificationContract> {
        self.binds.fetch_add(1, Ordering::SeqCst);
        Box::new(BoundNullContract {
            account,
            chain: self.chain.clone(),
        })
    }
}
