//! In-process `UserRepository` used when no database is configured and in
//! tests.
//!
//! Mirrors the PostgreSQL adapter: serial ids, a unique email index,
//! newest-first ordering and clock-driven timestamps.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserDraft, UserId};

#[derive(Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<UserId, User>,
}

impl Table {
    fn email_taken(&self, draft: &UserDraft, except: Option<UserId>) -> bool {
        self.rows
            .values()
            .any(|user| Some(user.id()) != except && user.email() == draft.email())
    }
}

/// Mutex-guarded user table.
#[derive(Clone)]
pub struct InMemoryUserRepository {
    table: Arc<Mutex<Table>>,
    clock: Arc<dyn Clock>,
}

impl InMemoryUserRepository {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Arc::new(Mutex::new(Table::default())),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, UserPersistenceError> {
        self.table
            .lock()
            .map_err(|_| UserPersistenceError::connection("in-memory user table poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_newest_first(&self) -> Result<Vec<User>, UserPersistenceError> {
        let table = self.lock()?;
        let mut users: Vec<User> = table.rows.values().cloned().collect();
        users.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id().cmp(&a.id()))
        });
        Ok(users)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock()?.rows.get(&id).cloned())
    }

    async fn insert(&self, draft: &UserDraft) -> Result<User, UserPersistenceError> {
        let mut table = self.lock()?;
        if table.email_taken(draft, None) {
            return Err(UserPersistenceError::conflict("users_email_key"));
        }
        let next = table
            .last_id
            .checked_add(1)
            .ok_or_else(|| UserPersistenceError::query("user id sequence exhausted"))?;
        let id = UserId::new(next).map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let now = self.clock.utc();
        let user = User::new(id, draft.clone(), now, now);
        table.last_id = next;
        table.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, draft: &UserDraft) -> Result<User, UserPersistenceError> {
        let mut table = self.lock()?;
        let Some(created_at) = table.rows.get(&id).map(User::created_at) else {
            return Err(UserPersistenceError::not_found(format!("user {id}")));
        };
        if table.email_taken(draft, Some(id)) {
            return Err(UserPersistenceError::conflict("users_email_key"));
        }
        let user = User::new(id, draft.clone(), created_at, self.clock.utc());
        table.rows.insert(id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), UserPersistenceError> {
        match self.lock()?.rows.remove(&id) {
            Some(_) => Ok(()),
            None => Err(UserPersistenceError::not_found(format!("user {id}"))),
        }
    }
}
