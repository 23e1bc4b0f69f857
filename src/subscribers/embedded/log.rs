//! # LogWriter: traces every delivered event
//!
//! A minimal sink that writes incoming [`Event`]s through `tracing`.
//! Use it for demos or to watch the feed while debugging.
//!
//! ## Example output
//! ```text
//! INFO profile_feed::subscribers::embedded::log: profile created seq=7 profile=3f2c… email=a@email.com
//! ```

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::events::Event;
use crate::subscribers::Subscribe;

/// Event writer sink.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) -> Result<(), DeliveryError> {
        tracing::info!(
            seq = e.seq,
            profile = %e.profile.id,
            email = %e.profile.email,
            "profile created"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Profile;

    #[tokio::test]
    async fn test_log_writer_never_rejects() {
        let ev = Event::profile_created(Profile::new("l", "l@email.com"));
        assert!(LogWriter::new().on_event(&ev).await.is_ok());
    }
}
