use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use super::{bridge::Bridge, config::Config, pump::Pump};
use crate::{
    events::ingress,
    subscribers::{FanOut, Subscribe},
};

/// Builder for constructing a [`Bridge`] with optional sinks.
pub struct BridgeBuilder {
    cfg: Config,
    sinks: Vec<Arc<dyn Subscribe>>,
}

impl BridgeBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            sinks: Vec::new(),
        }
    }

    /// Sets push-style sinks attached as soon as the bridge starts.
    ///
    /// Each sink gets its own bounded queue and worker.
    pub fn with_subscribers(mut self, sinks: Vec<Arc<dyn Subscribe>>) -> Self {
        self.sinks = sinks;
        self
    }

    /// Builds the bridge and spawns its pump.
    ///
    /// Must be called from within a tokio runtime. This consumes the builder and
    /// initializes all runtime components:
    /// - Ingress queue (publisher + pump side)
    /// - The single fan-out stage
    /// - The pump task
    /// - One worker per configured sink
    pub fn build(self) -> Arc<Bridge> {
        let (publisher, queue) = ingress::channel();
        let fanout = FanOut::new(self.cfg.subscriber_capacity_clamped());
        let token = CancellationToken::new();

        let pump = tokio::spawn(Pump::new(queue, Arc::clone(&fanout)).run(token.clone()));
        let bridge = Arc::new(Bridge::new_internal(
            self.cfg, publisher, fanout, token, pump,
        ));

        for sink in self.sinks {
            bridge.attach_sink(sink);
        }
        bridge
    }
}
