//! Scoped manual mode
//!
//! Card commands stop the reader's own polling. [`ManualMode`] hands out the
//! transport for the duration of an operation and turns polling back on when
//! it goes out of scope, whichever way the operation exits.

use std::ops::{Deref, DerefMut};

use mifare_transport::MifareTransport;
use tracing::warn;

/// Borrow of the transport that re-enables auto-poll on drop
#[derive(Debug)]
pub(crate) struct ManualMode<'a, T: MifareTransport> {
    transport: &'a mut T,
}

impl<'a, T: MifareTransport> ManualMode<'a, T> {
    pub(crate) const fn begin(transport: &'a mut T) -> Self {
        Self { transport }
    }
}

impl<T: MifareTransport> Deref for ManualMode<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.transport
    }
}

impl<T: MifareTransport> DerefMut for ManualMode<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.transport
    }
}

impl<T: MifareTransport> Drop for ManualMode<'_, T> {
    fn drop(&mut self) {
        if let Err(e) = self.transport.set_auto_mode(true) {
            warn!(error = %e, "Failed to re-enable auto mode");
        }
    }
}

#[cfg(test)]
mod tests {
    use mifare_transport::mock::MockTransport;

    use super::*;

    #[test]
    fn test_auto_mode_restored_on_drop() {
        let mut transport = MockTransport::with_reader_on(1);
        transport.set_port(1);
        transport.open().unwrap();
        let probe = transport.clone();

        {
            let mut manual = ManualMode::begin(&mut transport);
            manual.request().unwrap();
            assert!(!probe.auto_mode());
        }

        assert!(probe.auto_mode());
    }

    #[test]
    fn test_auto_mode_restored_on_early_return() {
        fn failing(transport: &mut MockTransport) -> Result<(), mifare_transport::TransportError> {
            let mut manual = ManualMode::begin(transport);
            manual.anticollision()?;
            Ok(())
        }

        let mut transport = MockTransport::with_reader_on(1);
        transport.set_port(1);
        transport.open().unwrap();

        assert!(failing(&mut transport).is_err());
        assert!(transport.auto_mode());
    }
}
