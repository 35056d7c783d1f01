//! In-memory store implementations for tests/dev and single-node deployments.
//!
//! Every store is a table guarded by one `RwLock`. Reads take the read guard,
//! mutations the write guard, so each trait method is atomic on its own.
//! A poisoned lock surfaces as `DomainError::Storage`.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use sharebook_core::{DomainError, DomainResult};

pub mod categories;
pub mod expenses;
pub mod ledgers;
pub mod memberships;
pub mod principals;
pub mod refresh_tokens;

pub use categories::InMemoryCategoryStore;
pub use expenses::InMemoryExpenseStore;
pub use ledgers::InMemoryLedgerStore;
pub use memberships::InMemoryMembershipStore;
pub use principals::InMemoryPrincipalStore;
pub use refresh_tokens::InMemoryRefreshTokenStore;

/// Keyed rows behind a single lock.
#[derive(Debug)]
pub(crate) struct Table<K, V> {
    name: &'static str,
    rows: RwLock<HashMap<K, V>>,
}

impl<K: Eq + Hash, V> Table<K, V> {
    pub(crate) fn new(name: &'static str) -> Self {
        Self {
            name,
            rows: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn read(&self) -> DomainResult<RwLockReadGuard<'_, HashMap<K, V>>> {
        self.rows
            .read()
            .map_err(|_| DomainError::storage(format!("{} store lock poisoned", self.name)))
    }

    pub(crate) fn write(&self) -> DomainResult<RwLockWriteGuard<'_, HashMap<K, V>>> {
        self.rows
            .write()
            .map_err(|_| DomainError::storage(format!("{} store lock poisoned", self.name)))
    }
}
