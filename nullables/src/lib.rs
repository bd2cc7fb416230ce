//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of the console (the backend API, the wallet
//! provider, the verification contract) sits behind a trait. This crate
//! provides implementations that:
//! - Return scripted values
//! - Record every call for assertions
//! - Never touch the network
//!
//! Usage: inject these in place of `BackendClient` and the alloy-backed
//! wallets.

pub mod backend;
pub mod chain;

pub use backend::{BackendCall, Failure, NullBackend};
pub use chain::{NullContract, NullWallet};
