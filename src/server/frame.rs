//! Outbound wire frames. Serialization happens at the transport edge only.

use serde::Serialize;

use crate::{Event, Profile};

/// WebSocket frame: `{"id": "<profile id>"}`.
#[derive(Debug, Serialize)]
pub struct IdFrame<'a> {
    pub id: &'a str,
}

impl<'a> From<&'a Event> for IdFrame<'a> {
    fn from(ev: &'a Event) -> Self {
        Self {
            id: ev.profile_id(),
        }
    }
}

/// SSE frame: `{"seq": N, "timestamp": <epoch millis>, "profile": {..}}`.
#[derive(Debug, Serialize)]
pub struct CreatedFrame<'a> {
    pub seq: u64,
    pub timestamp: u64,
    pub profile: &'a Profile,
}

impl<'a> From<&'a Event> for CreatedFrame<'a> {
    fn from(ev: &'a Event) -> Self {
        Self {
            seq: ev.seq,
            timestamp: ev.timestamp_millis(),
            profile: &ev.profile,
        }
    }
}
