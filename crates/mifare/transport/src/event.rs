//! Raw events emitted by the reader firmware

use std::sync::Arc;

/// Event kinds reported on the transport's event stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportEvent {
    /// A card entered the field
    CardPresent,
    /// The card left the field
    CardRemove,
    /// The reader's key was pressed
    KeyPress,
    /// Any other firmware event code
    Other(i32),
}

/// Identifier of a listener registered on a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("listener#{_0}")]
pub struct ListenerId(u64);

impl ListenerId {
    /// Wrap a raw listener number
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw listener number
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Callback invoked from the transport's event thread
pub type TransportListener = Arc<dyn Fn(TransportEvent) + Send + Sync>;
