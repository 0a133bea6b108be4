//! Callback-based event handling

use crate::event::ReaderEvent;

/// Trait for handling reader events
///
/// Handlers run on the transport's event thread.
pub trait ReaderEventHandler {
    /// Handle a reader event
    fn handle_event(&mut self, event: ReaderEvent);
}

// Implement handlers for closures
impl<F> ReaderEventHandler for F
where
    F: FnMut(ReaderEvent),
{
    fn handle_event(&mut self, event: ReaderEvent) {
        self(event)
    }
}
