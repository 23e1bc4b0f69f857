use super::model::Profile;
use super::store::{ProfileStore, StoreError};

/// Local parts of the demo profiles.
pub const DEMO_NAMES: [&str; 4] = ["A", "B", "C", "D"];

/// Replaces the store content with the demo profiles `A@email.com` … `D@email.com`.
///
/// Goes straight to the store, so nothing is published on the feed.
pub async fn seed_demo(store: &dyn ProfileStore) -> Result<Vec<Profile>, StoreError> {
    let removed = store.delete_all().await;
    if removed > 0 {
        tracing::info!(removed, "cleared profiles before seeding");
    }

    let mut seeded = Vec::with_capacity(DEMO_NAMES.len());
    for name in DEMO_NAMES {
        let profile = store.save(&format!("{name}@email.com")).await?;
        tracing::info!(profile = %profile.id, email = %profile.email, "seeded profile");
        seeded.push(profile);
    }
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiles::MemoryStore;

    #[tokio::test]
    async fn test_seed_replaces_existing_profiles() {
        let store = MemoryStore::new();
        store.save("old@email.com").await.expect("save");

        let seeded = seed_demo(&store).await.expect("seed");
        assert_eq!(seeded.len(), 4);

        let emails: Vec<String> = store.find_all().await.into_iter().map(|p| p.email).collect();
        assert_eq!(emails, ["A@email.com", "B@email.com", "C@email.com", "D@email.com"]);
    }
}
