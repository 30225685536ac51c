/// In-memory store adapters
///
/// Backed by `BTreeMap`s behind `std::sync::RwLock`, with ids handed out
/// from a per-store counter starting at 1. Intended for tests and local
/// experiments; nothing survives a restart.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::{HealthCheck, PostStore, StoreError, StoreResult, TokenStore, UserStore};
use crate::models::{
    access_token::{AccessToken, NewAccessToken},
    post::{NewPost, Post, UpdatePost},
    user::{NewUser, UpdateUser, User},
};

/// Rows plus the last id handed out
#[derive(Debug)]
struct Table<T> {
    last_id: i64,
    rows: BTreeMap<i64, T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }
}

fn read<T>(lock: &RwLock<Table<T>>) -> StoreResult<RwLockReadGuard<'_, Table<T>>> {
    lock.read()
        .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<Table<T>>) -> StoreResult<RwLockWriteGuard<'_, Table<T>>> {
    lock.write()
        .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
}

/// In-memory [`UserStore`]
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    table: RwLock<Table<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> StoreResult<Vec<User>> {
        Ok(read(&self.table)?.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(read(&self.table)?.rows.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(read(&self.table)?
            .rows
            .values()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn create(&self, data: NewUser) -> StoreResult<User> {
        let mut table = write(&self.table)?;
        if table.rows.values().any(|user| user.email == data.email) {
            return Err(StoreError::Conflict { field: "email" });
        }

        let now = Utc::now();
        let user = User {
            id: table.next_id(),
            name: data.name,
            email: data.email,
            password_hash: data.password_hash,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(user.id, user.clone());

        Ok(user)
    }

    async fn update(&self, id: i64, data: UpdateUser) -> StoreResult<Option<User>> {
        let mut table = write(&self.table)?;

        if let Some(email) = &data.email {
            let taken = table
                .rows
                .values()
                .any(|user| user.id != id && &user.email == email);
            if taken {
                return Err(StoreError::Conflict { field: "email" });
            }
        }

        let Some(user) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = data.name {
            user.name = name;
        }
        if let Some(email) = data.email {
            user.email = email;
        }
        if let Some(password_hash) = data.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(write(&self.table)?.rows.remove(&id).is_some())
    }
}

/// In-memory [`PostStore`]
#[derive(Debug, Default)]
pub struct MemoryPostStore {
    table: RwLock<Table<Post>>,
}

#[async_trait]
impl PostStore for MemoryPostStore {
    async fn list(&self) -> StoreResult<Vec<Post>> {
        Ok(read(&self.table)?.rows.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Post>> {
        Ok(read(&self.table)?.rows.get(&id).cloned())
    }

    async fn create(&self, data: NewPost) -> StoreResult<Post> {
        let mut table = write(&self.table)?;
        let now = Utc::now();
        let post = Post {
            id: table.next_id(),
            user_id: data.user_id,
            title: data.title,
            content: data.content,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(post.id, post.clone());

        Ok(post)
    }

    async fn update(&self, id: i64, data: UpdatePost) -> StoreResult<Option<Post>> {
        let mut table = write(&self.table)?;
        let Some(post) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        data.apply_to(post);
        post.updated_at = Utc::now();

        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(write(&self.table)?.rows.remove(&id).is_some())
    }
}

/// In-memory [`TokenStore`]
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    table: RwLock<Table<AccessToken>>,
}

impl MemoryTokenStore {
    /// Number of tokens currently held for `user_id`
    pub fn count_for_user(&self, user_id: i64) -> StoreResult<usize> {
        Ok(read(&self.table)?
            .rows
            .values()
            .filter(|token| token.user_id == user_id)
            .count())
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn create(&self, data: NewAccessToken) -> StoreResult<AccessToken> {
        let mut table = write(&self.table)?;
        let token = AccessToken {
            id: table.next_id(),
            user_id: data.user_id,
            name: data.name,
            token_hash: data.token_hash,
            created_at: Utc::now(),
            last_used_at: None,
        };
        table.rows.insert(token.id, token.clone());

        Ok(token)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<AccessToken>> {
        Ok(read(&self.table)?.rows.get(&id).cloned())
    }

    async fn touch(&self, id: i64) -> StoreResult<()> {
        if let Some(token) = write(&self.table)?.rows.get_mut(&id) {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn delete_for_user(&self, user_id: i64) -> StoreResult<u64> {
        let mut table = write(&self.table)?;
        let before = table.rows.len();
        table.rows.retain(|_, token| token.user_id != user_id);

        Ok((before - table.rows.len()) as u64)
    }
}

/// Health check that always succeeds
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysHealthy;

#[async_trait]
impl HealthCheck for AlwaysHealthy {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
