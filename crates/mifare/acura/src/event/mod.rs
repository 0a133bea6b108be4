//! Reader events and their delivery to callers

mod callback;
mod channel;
mod registry;
mod relay;

pub use callback::ReaderEventHandler;
pub use channel::{ReaderEventReceiver, ReaderEventSender, reader_event_channel};
pub(crate) use registry::Subscriptions;
pub use registry::SubscriptionId;

use mifare_transport::TransportEvent;

/// Events reported to subscribers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ReaderEvent {
    /// A card was placed on the reader
    #[display("card present")]
    CardPresent,
    /// The card was taken off the reader
    #[display("card removed")]
    CardRemoved,
    /// The reader's button was pressed
    #[display("button pressed")]
    ButtonPressed,
    /// Any event the reader reports that has no meaning here
    #[display("unknown")]
    Unknown,
}

impl From<TransportEvent> for ReaderEvent {
    fn from(event: TransportEvent) -> Self {
        match event {
            TransportEvent::CardPresent => Self::CardPresent,
            TransportEvent::CardRemove => Self::CardRemoved,
            TransportEvent::KeyPress => Self::ButtonPressed,
            TransportEvent::Other(_) => Self::Unknown,
        }
    }
}
