//! Relay of transport events to subscribers

use std::sync::Arc;

use mifare_transport::{MifareTransport, TransportEvent, TransportListener};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::{
    AcuraReader,
    error::{AcuraError, Result},
    event::{ReaderEvent, ReaderEventHandler, ReaderEventReceiver, SubscriptionId, reader_event_channel},
};

impl<T: MifareTransport> AcuraReader<T> {
    /// Register `handler` for reader events
    ///
    /// Fails with [`AcuraError::NotConnected`] and registers nothing unless
    /// the reader is alive. The handler is called on the transport's event
    /// thread.
    pub fn subscribe<H>(&mut self, handler: H) -> Result<SubscriptionId>
    where
        H: ReaderEventHandler + Send + 'static,
    {
        if !self.is_alive() {
            return Err(AcuraError::NotConnected);
        }

        let handler = Mutex::new(handler);
        let adapter: TransportListener = Arc::new(move |raw: TransportEvent| {
            let event = ReaderEvent::from(raw);
            trace!(?raw, %event, "Relaying reader event");
            handler.lock().handle_event(event);
        });

        let listener = self.transport_mut().add_listener(adapter);
        let id = self.subscriptions.insert(listener);
        debug!(%id, %listener, "Subscribed to reader events");
        Ok(id)
    }

    /// Register a channel for reader events and return its receiving end
    pub fn subscribe_channel(&mut self) -> Result<ReaderEventReceiver> {
        let (sender, receiver) = reader_event_channel();
        self.subscribe(move |event: ReaderEvent| {
            // The receiver may be gone; the listener stays until unsubscribe_all
            let _ = sender.send(event);
        })?;
        Ok(receiver)
    }

    /// Remove every subscription from the transport
    pub fn unsubscribe_all(&mut self) {
        for (id, listener) in self.subscriptions.take() {
            if !self.transport_mut().remove_listener(listener) {
                debug!(%id, %listener, "Listener was already removed");
            }
        }
    }

    /// Number of active subscriptions
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}
