//! # Profile storage.
//!
//! [`ProfileStore`] is the persistence seam of the service; [`MemoryStore`] is the
//! in-process implementation the binary runs with. Durability is not a goal: the
//! store lives and dies with the process.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use super::model::Profile;

/// # Errors produced by a profile store.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The email is empty or has no `@`.
    #[error("invalid email: {email:?}")]
    InvalidEmail {
        /// The rejected value.
        email: String,
    },
}

impl StoreError {
    /// Returns a short stable label (snake_case) for use in logs and API errors.
    pub fn as_label(&self) -> &'static str {
        match self {
            StoreError::InvalidEmail { .. } => "invalid_email",
        }
    }
}

/// Persistence operations used by the profile service.
#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    /// Stores a new profile and returns it with its assigned id.
    async fn save(&self, email: &str) -> Result<Profile, StoreError>;

    /// Looks a profile up by id.
    async fn find_by_id(&self, id: &str) -> Option<Profile>;

    /// Returns every profile in insertion order.
    async fn find_all(&self) -> Vec<Profile>;

    /// Removes every profile; returns how many were removed.
    async fn delete_all(&self) -> usize;
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<String, Profile>,
    order: Vec<String>,
}

/// In-memory [`ProfileStore`] assigning UUID v4 identifiers.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a profile under an explicit id, replacing any previous record.
    pub async fn insert(&self, profile: Profile) {
        let mut inner = self.inner.write().await;
        if inner.by_id.insert(profile.id.clone(), profile.clone()).is_none() {
            inner.order.push(profile.id);
        }
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn save(&self, email: &str) -> Result<Profile, StoreError> {
        let email = validate_email(email)?;
        let profile = Profile::new(uuid::Uuid::new_v4().to_string(), email);
        self.insert(profile.clone()).await;
        Ok(profile)
    }

    async fn find_by_id(&self, id: &str) -> Option<Profile> {
        self.inner.read().await.by_id.get(id).cloned()
    }

    async fn find_all(&self) -> Vec<Profile> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.by_id.get(id).cloned())
            .collect()
    }

    async fn delete_all(&self) -> usize {
        let mut inner = self.inner.write().await;
        let n = inner.by_id.len();
        inner.by_id.clear();
        inner.order.clear();
        n
    }
}

fn validate_email(email: &str) -> Result<&str, StoreError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(StoreError::InvalidEmail {
            email: email.to_string(),
        });
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_assigns_unique_ids() {
        let store = MemoryStore::new();
        let a = store.save("a@email.com").await.expect("save a");
        let b = store.save("b@email.com").await.expect("save b");
        assert_ne!(a.id, b.id);
        assert_eq!(store.find_by_id(&a.id).await, Some(a));
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let store = MemoryStore::new();
        for email in ["c@email.com", "a@email.com", "b@email.com"] {
            store.save(email).await.expect("save");
        }
        let emails: Vec<String> = store.find_all().await.into_iter().map(|p| p.email).collect();
        assert_eq!(emails, ["c@email.com", "a@email.com", "b@email.com"]);
    }

    #[tokio::test]
    async fn test_invalid_email_is_rejected() {
        let store = MemoryStore::new();
        for bad in ["", "   ", "no-at-sign"] {
            let err = store.save(bad).await.expect_err("must reject");
            assert_eq!(err.as_label(), "invalid_email");
        }
        assert!(store.find_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_email_is_trimmed() {
        let store = MemoryStore::new();
        let p = store.save("  x@email.com ").await.expect("save");
        assert_eq!(p.email, "x@email.com");
    }

    #[tokio::test]
    async fn test_delete_all() {
        let store = MemoryStore::new();
        store.save("a@email.com").await.expect("save");
        store.insert(Profile::new("fixed", "f@email.com")).await;
        assert_eq!(store.delete_all().await, 2);
        assert!(store.find_all().await.is_empty());
        assert_eq!(store.find_by_id("fixed").await, None);
    }
}
