//! Transport trait for serial Mifare readers
//!
//! The vendor driver owns the serial framing. This trait is the contract the
//! session layer programs against: port lifecycle, card commands, the
//! auto-poll toggle and the event stream.

use std::fmt;

use tracing::{debug, trace};

use crate::{
    LineSettings, TransportError,
    event::{ListenerId, TransportListener},
    key::{KeyType, MifareKey},
};

/// Size of a Mifare data block in bytes
pub const BLOCK_SIZE: usize = 16;

/// Contents of one data block
pub type Block = [u8; BLOCK_SIZE];

/// Parameters for programming sector access conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessConditions {
    /// Key granting read access
    pub read_key: MifareKey,
    /// Key granting write access
    pub write_key: MifareKey,
    /// Sector trailer block
    pub trailer_block: u8,
    /// First data block covered
    pub start_block: u8,
    /// Last block covered
    pub end_block: u8,
    /// Vendor specific parameter passed through to the firmware
    pub reserved: u8,
}

/// Trait for serial Mifare reader transports
///
/// Card commands (request, anticollision, authenticate, read, write, access
/// conditions) put the reader into manual mode and stop its own polling.
/// Callers re-enable polling with [`set_auto_mode`](Self::set_auto_mode).
///
/// Listeners are invoked on the transport's event thread, never on the
/// thread issuing commands.
pub trait MifareTransport: Send + fmt::Debug {
    /// Apply the serial line profile used by the next [`open`](Self::open)
    fn configure(&mut self, settings: &LineSettings) -> Result<(), TransportError>;

    /// Select the COM port used by the next [`open`](Self::open)
    fn set_port(&mut self, port: u16);

    /// Currently selected port
    fn port(&self) -> Option<u16>;

    /// Open the selected port
    fn open(&mut self) -> Result<(), TransportError>;

    /// Close the port. Closing a closed port succeeds
    fn close(&mut self) -> Result<(), TransportError>;

    /// Whether the port descriptor is open
    fn is_open(&self) -> bool;

    /// Reset driver state
    fn reset(&mut self) -> Result<(), TransportError>;

    /// Query the reader firmware version
    fn firmware_version(&mut self) -> Result<String, TransportError>;

    /// Enable or disable the reader's autonomous card polling
    fn set_auto_mode(&mut self, enabled: bool) -> Result<(), TransportError>;

    /// Send a request and return the number of tags that answered
    fn request(&mut self) -> Result<u8, TransportError>;

    /// Run anticollision and return the selected card's serial number
    fn anticollision(&mut self) -> Result<String, TransportError>;

    /// Authenticate against a sector with the given key slot and key
    fn authenticate(
        &mut self,
        sector: u8,
        key_type: KeyType,
        key: &MifareKey,
    ) -> Result<(), TransportError>;

    /// Read one block
    fn read_block(&mut self, block: u8) -> Result<Block, TransportError>;

    /// Write one block
    fn write_block(
        &mut self,
        sector: u8,
        key_type: KeyType,
        block: u8,
        data: &Block,
    ) -> Result<(), TransportError>;

    /// Program sector access conditions and keys
    fn set_access_conditions(&mut self, conditions: &AccessConditions)
    -> Result<(), TransportError>;

    /// Register an event listener
    fn add_listener(&mut self, listener: TransportListener) -> ListenerId;

    /// Remove a listener. Returns false if it was not registered
    fn remove_listener(&mut self, id: ListenerId) -> bool;

    /// Send a request and report whether any card answered
    fn has_card(&mut self) -> bool {
        match self.request() {
            Ok(count) => {
                trace!(count, "Request answered");
                count > 0
            }
            Err(e) => {
                debug!(error = %e, "Request failed");
                false
            }
        }
    }
}
