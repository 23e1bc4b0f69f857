//! # Profile use cases.
//!
//! [`ProfileService`] is the event source of the feed: every successful
//! [`create`](ProfileService::create) publishes exactly one
//! [`Event`](crate::Event). Reads publish nothing.

use std::sync::Arc;

use super::model::Profile;
use super::store::{ProfileStore, StoreError};
use crate::events::{Event, Publisher};

/// Create/list/fetch operations over a [`ProfileStore`].
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    publisher: Publisher,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>, publisher: Publisher) -> Self {
        Self { store, publisher }
    }

    /// Persists a new profile, then announces it on the feed.
    ///
    /// A store error is returned as is and nothing is published.
    pub async fn create(&self, email: &str) -> Result<Profile, StoreError> {
        let profile = self.store.save(email).await?;
        tracing::debug!(profile = %profile.id, "profile saved");
        self.publisher.publish(Event::profile_created(profile.clone()));
        Ok(profile)
    }

    pub async fn all(&self) -> Vec<Profile> {
        self.store.find_all().await
    }

    pub async fn by_id(&self, id: &str) -> Option<Profile> {
        self.store.find_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ingress;
    use crate::profiles::MemoryStore;

    #[tokio::test]
    async fn test_create_publishes_exactly_one_event() {
        let (publisher, mut queue) = ingress::channel();
        let service = ProfileService::new(Arc::new(MemoryStore::new()), publisher);

        let created = service.create("a@email.com").await.expect("create");

        let queued = queue.drain();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].event.profile_id(), created.id);
        assert_eq!(queued[0].event.profile.email, "a@email.com");
    }

    #[tokio::test]
    async fn test_failed_create_publishes_nothing() {
        let (publisher, mut queue) = ingress::channel();
        let service = ProfileService::new(Arc::new(MemoryStore::new()), publisher);

        assert!(service.create("not-an-email").await.is_err());
        assert!(queue.drain().is_empty());
    }

    #[tokio::test]
    async fn test_reads_publish_nothing() {
        let (publisher, mut queue) = ingress::channel();
        let service = ProfileService::new(Arc::new(MemoryStore::new()), publisher);
        let created = service.create("b@email.com").await.expect("create");
        queue.drain();

        assert_eq!(service.by_id(&created.id).await, Some(created.clone()));
        assert_eq!(service.all().await, vec![created]);
        assert_eq!(service.by_id("missing").await, None);
        assert!(queue.drain().is_empty());
    }
}
