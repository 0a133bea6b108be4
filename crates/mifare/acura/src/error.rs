//! Error types for reader sessions

use mifare_transport::TransportError;

/// Result type for reader operations
pub type Result<T> = std::result::Result<T, AcuraError>;

/// Error type for reader operations
#[derive(Debug, thiserror::Error)]
pub enum AcuraError {
    /// No port in the scanned range hosts a responding reader
    #[error("No reader found on ports {first}..={last}")]
    NoReader {
        /// First port scanned
        first: u16,
        /// Last port scanned
        last: u16,
    },

    /// Operation requires a live session
    #[error("Reader is not connected")]
    NotConnected,

    /// The card rejected the key, also after the retry
    #[error("Card authentication failed")]
    Authentication,

    /// Record value does not fit in a block
    #[error("Record is {len} characters long, at most {max} fit")]
    RecordTooLong {
        /// Length of the rejected value in characters
        len: usize,
        /// Maximum record length
        max: usize,
    },

    /// Transport-related errors
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl AcuraError {
    /// Whether calling `connect` again may clear the error
    pub const fn is_connection_failure(&self) -> bool {
        matches!(self, Self::NoReader { .. } | Self::NotConnected)
    }
}
