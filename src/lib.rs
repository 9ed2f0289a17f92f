//! Rust SDK for Kadena Names.
//!
//! Resolve `.kda` names to Kadena accounts and back, inspect pricing and
//! availability, and prepare unsigned registry transactions for an external
//! wallet to sign. All reads are non-committing `/local` simulations against
//! a Chainweb node; [`KadenaNames::send_transaction`] submits a signed
//! command.
//!
//! ```no_run
//! use kadenanames_sdk::{KadenaNames, RegistrationPeriod, RegistryConfig, SdkConfig};
//!
//! # async fn run() -> kadenanames_sdk::Result<()> {
//! let registry = RegistryConfig::new("<mainnet module>", "<testnet module>", "<vault account>");
//! let sdk = KadenaNames::with_config(SdkConfig::new().with_registry(registry))?;
//! if let Some(address) = sdk.name_to_address("turkiye.kda", "mainnet01").await? {
//!     println!("turkiye.kda -> {address}");
//! }
//! let price = sdk
//!     .fetch_price_by_period(RegistrationPeriod::OneYear, "mainnet01", "k:owner")
//!     .await?;
//! # let _ = price;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod expiry;
pub mod hosts;
#[cfg(feature = "logging")]
pub mod logging;
pub mod names;
pub mod pact;
mod query;
pub mod registry;
mod resolution;
pub mod sdk;
pub mod transactions;
pub mod types;

pub use client::{ChainClient, HttpChainClient};
pub use config::SdkConfig;
pub use error::{KdnError, Result, TransportError};
pub use expiry::{is_name_expired, is_name_expired_at, transform_pact_date, GRACE_PERIOD_MS};
pub use hosts::{
    chain_id_for_network, ChainId, DefaultHostResolver, HostResolver, HostTable, NetworkEndpoint,
};
pub use names::{ensure_kda_extension, KDA_EXTENSION};
pub use pact::{Command, CommandBuilder, CommandResult, Meta, PactDecimal, PactValue, Signer};
pub use registry::{RegistrationPeriod, RegistryConfig};
pub use sdk::KadenaNames;
pub use transactions::reconcile_price;
pub use types::{NameInfo, SaleState, TransactionDescriptor};

