//! Infrastructure layer: in-memory stores, environment configuration and the
//! refresh-token sweeper.

pub mod config;
pub mod store;
pub mod sweeper;

pub use config::{AppConfig, ConfigError};
pub use store::{
    InMemoryCategoryStore, InMemoryExpenseStore, InMemoryLedgerStore, InMemoryMembershipStore,
    InMemoryPrincipalStore, InMemoryRefreshTokenStore,
};
pub use sweeper::{RefreshTokenSweeper, RefreshTokenSweeperHandle};

#[cfg(test)]
mod integration_tests;
