//! Reader session: port discovery, connection and liveness

use mifare_transport::MifareTransport;
use tracing::{debug, instrument, trace, warn};

use crate::{
    config::ReaderConfig,
    error::{AcuraError, Result},
    event::Subscriptions,
};

/// Session with one Acura reader
///
/// The session owns its transport. There is one physical reader, so there
/// should be one session; every operation goes through it.
#[derive(Debug)]
pub struct AcuraReader<T: MifareTransport> {
    /// Reader driver
    transport: T,
    /// Configuration
    config: ReaderConfig,
    /// Port of the last successful connection
    port: Option<u16>,
    /// Listeners registered through this session
    pub(crate) subscriptions: Subscriptions,
}

impl<T: MifareTransport> AcuraReader<T> {
    /// Create a session with the default configuration
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ReaderConfig::default())
    }

    /// Create a session with a custom configuration
    pub fn with_config(transport: T, config: ReaderConfig) -> Self {
        Self {
            transport,
            config,
            port: None,
            subscriptions: Subscriptions::default(),
        }
    }

    /// Port of the current connection, if any
    pub const fn port(&self) -> Option<u16> {
        self.port
    }

    /// Session configuration
    pub const fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Underlying transport
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub(crate) const fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Connect to the reader and return the port it answers on
    ///
    /// The port of the previous connection is tried first, then every port
    /// of the configured range in ascending order.
    #[instrument(skip(self), fields(previous = ?self.port))]
    pub fn connect(&mut self) -> Result<u16> {
        if let Some(port) = self.port {
            if self.connect_port(port) {
                self.port = Some(port);
                return Ok(port);
            }
            debug!(port, "Previous port no longer answers, scanning");
        }

        for port in self.config.port_range.clone().filter(|port| *port != 0) {
            if self.connect_port(port) {
                debug!(port, "Reader found");
                self.port = Some(port);
                return Ok(port);
            }
        }

        // Leave no half-open port behind
        self.disconnect();

        let (first, last) = (
            *self.config.port_range.start(),
            *self.config.port_range.end(),
        );
        warn!(first, last, "No reader found");
        Err(AcuraError::NoReader { first, last })
    }

    /// Open `port`, reusing the connection if it is already live
    fn connect_port(&mut self, port: u16) -> bool {
        if self.transport.port() == Some(port) && self.is_alive() {
            return true;
        }

        self.disconnect();

        if let Err(e) = self.transport.configure(&self.config.line_settings) {
            debug!(port, error = %e, "Failed to apply line settings");
            return false;
        }
        self.transport.set_port(port);
        if let Err(e) = self.transport.set_auto_mode(true) {
            debug!(port, error = %e, "Failed to enable auto mode");
        }

        if let Err(e) = self.transport.open() {
            trace!(port, error = %e, "Port did not open");
            return false;
        }

        self.is_alive()
    }

    /// Whether the port is open and the reader answers a firmware query
    ///
    /// An open port alone is not enough: the descriptor can outlive a
    /// reader that stopped responding.
    pub fn is_alive(&mut self) -> bool {
        if !self.transport.is_open() {
            return false;
        }
        match self.transport.firmware_version() {
            Ok(version) => {
                trace!(%version, "Reader alive");
                true
            }
            Err(e) => {
                debug!(error = %e, "Reader did not answer firmware query");
                false
            }
        }
    }

    /// Drop subscriptions, reset the driver and close the port
    ///
    /// Returns whether the port ended up closed. Safe to call when already
    /// disconnected.
    pub fn disconnect(&mut self) -> bool {
        self.port = None;
        self.unsubscribe_all();

        if let Err(e) = self.transport.reset() {
            debug!(error = %e, "Driver reset failed");
        }
        if let Err(e) = self.transport.close() {
            debug!(error = %e, "Failed to close port");
        }

        !self.transport.is_open()
    }
}

impl<T: MifareTransport> Drop for AcuraReader<T> {
    fn drop(&mut self) {
        if self.transport.is_open() {
            self.disconnect();
        }
    }
}
