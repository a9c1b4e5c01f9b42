//! In-memory implementation of the Store trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite,
//! including uniqueness and owner checks, but keeps everything in memory.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use tally_core::{now_millis, Calculation, CalculationId, NewCalculation, NewUser, User, UserId};

use crate::error::{Result, StoreError};
use crate::traits::{CalculationFilter, Store};

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    users: BTreeMap<UserId, User>,
    calculations: BTreeMap<CalculationId, Calculation>,
    next_user_id: i64,
    next_calculation_id: i64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner::default()),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryStoreInner>> {
        self.inner
            .read()
            .map_err(|e| StoreError::InvalidData(format!("lock poisoned: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryStoreInner>> {
        self.inner
            .write()
            .map_err(|e| StoreError::InvalidData(format!("lock poisoned: {}", e)))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, user: &NewUser) -> Result<User> {
        let mut inner = self.write()?;

        if inner.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation {
                column: "username".into(),
            });
        }
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation {
                column: "email".into(),
            });
        }

        inner.next_user_id += 1;
        let stored = User {
            id: UserId(inner.next_user_id),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            created_at: now_millis(),
        };
        inner.users.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let inner = self.read()?;
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let inner = self.read()?;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn insert_calculation(&self, calc: &NewCalculation) -> Result<Calculation> {
        let mut inner = self.write()?;

        if let Some(owner) = calc.user_id {
            if !inner.users.contains_key(&owner) {
                return Err(StoreError::ForeignKeyViolation);
            }
        }

        inner.next_calculation_id += 1;
        let stored = Calculation {
            id: CalculationId(inner.next_calculation_id),
            a: calc.a,
            b: calc.b,
            kind: calc.kind,
            result: calc.result,
            user_id: calc.user_id,
            created_at: now_millis(),
            updated_at: None,
        };
        inner.calculations.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn get_calculation(&self, id: CalculationId) -> Result<Option<Calculation>> {
        Ok(self.read()?.calculations.get(&id).cloned())
    }

    async fn update_calculation(&self, calc: &Calculation) -> Result<Calculation> {
        let mut inner = self.write()?;

        let stored = inner
            .calculations
            .get_mut(&calc.id)
            .ok_or_else(|| StoreError::NotFound(format!("calculation {}", calc.id)))?;

        stored.a = calc.a;
        stored.b = calc.b;
        stored.kind = calc.kind;
        stored.result = calc.result;
        stored.updated_at = Some(now_millis());

        Ok(stored.clone())
    }

    async fn delete_calculation(&self, id: CalculationId) -> Result<bool> {
        Ok(self.write()?.calculations.remove(&id).is_some())
    }

    async fn list_calculations(&self, filter: &CalculationFilter) -> Result<Vec<Calculation>> {
        let inner = self.read()?;
        Ok(inner
            .calculations
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    async fn count_calculations(&self, filter: &CalculationFilter) -> Result<u64> {
        let inner = self.read()?;
        Ok(inner
            .calculations
            .values()
            .filter(|c| filter.matches(c))
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::OperationKind;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.into(),
            email: email.into(),
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn test_user_uniqueness() {
        let store = MemoryStore::new();
        let alice = store.insert_user(&new_user("alice", "a@x.com")).await.unwrap();
        assert_eq!(alice.id, UserId(1));

        let err = store
            .insert_user(&new_user("alice", "b@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err.unique_column(), Some("username"));

        let err = store
            .insert_user(&new_user("bob", "a@x.com"))
            .await
            .unwrap_err();
        assert_eq!(err.unique_column(), Some("email"));

        let bob = store.insert_user(&new_user("bob", "b@x.com")).await.unwrap();
        assert_eq!(bob.id, UserId(2));
    }

    #[tokio::test]
    async fn test_calculation_lifecycle() {
        let store = MemoryStore::new();
        let calc = NewCalculation::new(10.0, 5.0, OperationKind::Add)
            .evaluated()
            .unwrap();
        let stored = store.insert_calculation(&calc).await.unwrap();
        assert_eq!(stored.result, Some(15.0));
        assert!(stored.updated_at.is_none());

        let mut changed = stored.clone();
        changed.a = 2.0;
        changed.save_result().unwrap();
        let updated = store.update_calculation(&changed).await.unwrap();
        assert_eq!(updated.created_at, stored.created_at);
        assert!(updated.updated_at.is_some());

        assert!(store.delete_calculation(stored.id).await.unwrap());
        assert!(store.get_calculation(stored.id).await.unwrap().is_none());
        assert!(matches!(
            store.update_calculation(&changed).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_owner_must_exist() {
        let store = MemoryStore::new();
        let calc = NewCalculation::new(1.0, 2.0, OperationKind::Add).owner(UserId(9));
        assert!(matches!(
            store.insert_calculation(&calc).await,
            Err(StoreError::ForeignKeyViolation)
        ));
    }

    #[tokio::test]
    async fn test_filtering() {
        let store = MemoryStore::new();
        let alice = store.insert_user(&new_user("alice", "a@x.com")).await.unwrap();

        store
            .insert_calculation(&NewCalculation::new(1.0, 1.0, OperationKind::Add).owner(alice.id))
            .await
            .unwrap();
        store
            .insert_calculation(&NewCalculation::new(2.0, 2.0, OperationKind::Multiply))
            .await
            .unwrap();

        let owned = CalculationFilter::owned_by(alice.id);
        assert_eq!(store.count_calculations(&owned).await.unwrap(), 1);
        assert_eq!(
            store
                .list_calculations(&CalculationFilter::default())
                .await
                .unwrap()
                .len(),
            2
        );
    }
}
