//! In-memory account store.
//!
//! [`InMemoryAccountStore`] keeps every account in a `BTreeMap` behind a
//! single `RwLock`. List and find take the read lock; everything else takes
//! the write lock for the duration of the map operation.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::clock::{Clock, SystemClock};
use crate::error::{StoreError, StoreResult};
use crate::filter::AccountFilter;
use crate::model::{supplied, Account, AccountId, AccountPatch, NewAccount};
use crate::query::{paginate, sort_by_post_count};
use crate::traits::AccountStore;

#[derive(Debug)]
struct AccountState {
    accounts: BTreeMap<AccountId, Account>,
    /// Next id to hand out. Only ever grows.
    next_id: u64,
}

/// An in-memory implementation of [`AccountStore`].
pub struct InMemoryAccountStore {
    state: RwLock<AccountState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryAccountStore {
    /// Create an empty store stamped by the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(AccountState {
                accounts: BTreeMap::new(),
                next_id: 1,
            }),
            clock,
        }
    }

    /// Number of accounts currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read()?.accounts.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read()?.accounts.is_empty())
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, AccountState>> {
        self.state.read().map_err(|_| StoreError::poisoned("account store"))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, AccountState>> {
        self.state.write().map_err(|_| StoreError::poisoned("account store"))
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryAccountStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("InMemoryAccountStore")
            .field("account_count", &count)
            .finish()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn add(&self, account: NewAccount) -> StoreResult<Account> {
        let mut state = self.write()?;
        let id = AccountId::new(state.next_id);
        state.next_id += 1;

        let record = Account {
            id,
            name: account.name,
            contact: account.contact,
            created_at: self.clock.now(),
            updated_at: None,
            post_count: 0,
        };
        state.accounts.insert(id, record.clone());
        tracing::debug!(%id, "account added");
        Ok(record)
    }

    fn list(&self, filter: &AccountFilter) -> StoreResult<Vec<Account>> {
        let mut matched: Vec<Account> = {
            let state = self.read()?;
            state
                .accounts
                .values()
                .filter(|account| filter.matches(account))
                .cloned()
                .collect()
        };
        sort_by_post_count(&mut matched, filter.order.unwrap_or_default());
        Ok(paginate(matched, filter.page))
    }

    fn update(&self, id: AccountId, patch: &AccountPatch) -> StoreResult<Account> {
        let now = self.clock.now();
        let mut state = self.write()?;
        let account = state
            .accounts
            .get_mut(&id)
            .ok_or(StoreError::AccountNotFound(id))?;

        let mut changed = false;
        if let Some(name) = supplied(&patch.name) {
            account.name = name.to_string();
            changed = true;
        }
        if let Some(contact) = supplied(&patch.contact) {
            account.contact = contact.to_string();
            changed = true;
        }
        if changed {
            account.updated_at = Some(now);
            tracing::debug!(%id, "account updated");
        }
        Ok(account.clone())
    }

    fn delete(&self, id: AccountId) -> StoreResult<bool> {
        let removed = self.write()?.accounts.remove(&id).is_some();
        if removed {
            tracing::debug!(%id, "account deleted");
        }
        Ok(removed)
    }

    fn find_by_id(&self, id: AccountId) -> StoreResult<Account> {
        self.read()?
            .accounts
            .get(&id)
            .cloned()
            .ok_or(StoreError::AccountNotFound(id))
    }

    fn increment_post_count(&self, id: AccountId) -> StoreResult<u64> {
        let mut state = self.write()?;
        let account = state
            .accounts
            .get_mut(&id)
            .ok_or(StoreError::AccountNotFound(id))?;
        account.post_count += 1;
        Ok(account.post_count)
    }

    fn decrement_post_count(&self, id: AccountId) -> StoreResult<u64> {
        let mut state = self.write()?;
        let account = state
            .accounts
            .get_mut(&id)
            .ok_or(StoreError::AccountNotFound(id))?;
        account.post_count = account.post_count.saturating_sub(1);
        Ok(account.post_count)
    }
}
