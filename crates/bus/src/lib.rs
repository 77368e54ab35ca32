//! # Event bus
//!
//! A small typed pub/sub registry mirroring the original source's unused
//! `event_bus.py` scaffold. Downstream tooling can subscribe to engine
//! lifecycle events for monitoring or diagnostics; the engine itself does
//! not publish to it today. It exists as a documented extension point,
//! not a required piece of the read/write path.

use std::path::PathBuf;

/// Lifecycle events the engine could publish in the future.
#[derive(Debug, Clone)]
pub enum Event {
    FlushStarted { entry_count: usize },
    FlushFinished { sstable_path: PathBuf },
    WalRotated { old_segment: PathBuf, new_segment: PathBuf },
    RecoveryComplete { recovered_sequence: u64 },
}

type Listener = Box<dyn Fn(&Event) + Send + Sync>;

/// A registry of listeners, each invoked with every published [`Event`].
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `listener` to be called on every future [`publish`](EventBus::publish).
    pub fn on<F>(&mut self, listener: F)
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Notifies every registered listener of `event`, in registration order.
    pub fn publish(&self, event: &Event) {
        for listener in &self.listeners {
            listener(event);
        }
    }

    /// Number of currently registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}
