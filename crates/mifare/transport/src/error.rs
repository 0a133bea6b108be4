//! Error types reported by reader transports

/// Transport error type
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// No port has been selected
    #[error("No port selected")]
    NoPort,

    /// The selected port could not be opened
    #[error("Failed to open port {0}")]
    Open(u16),

    /// Operation requires an open port
    #[error("Port is not open")]
    PortClosed,

    /// Reader did not answer a command
    #[error("Reader did not respond")]
    NoResponse,

    /// No card in the reader's field
    #[error("No card in field")]
    NoCard,

    /// Card rejected the key for a sector
    #[error("Authentication rejected for sector {sector}")]
    AuthenticationRejected {
        /// Sector that was addressed
        sector: u8,
    },

    /// Block read failed
    #[error("Failed to read block {0}")]
    Read(u8),

    /// Block write failed
    #[error("Failed to write block {0}")]
    Write(u8),

    /// Anticollision did not resolve a serial number
    #[error("Anticollision failed")]
    Anticollision,

    /// Sector trailer programming failed
    #[error("Failed to program access conditions")]
    AccessConditions,

    /// Driver error (with code)
    #[error("Driver error code: {0}")]
    Driver(i32),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// Other error with message
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Create a new driver error
    pub const fn driver(code: i32) -> Self {
        Self::Driver(code)
    }

    /// Create a general other error
    pub fn other<S: Into<String>>(message: S) -> Self {
        Self::Other(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_error_display() {
        let err = TransportError::driver(-12);
        assert!(matches!(err, TransportError::Driver(-12)));
        assert_eq!(err.to_string(), "Driver error code: -12");
    }

    #[test]
    fn test_other_error_display() {
        let err = TransportError::other(format!("port {} busy", 4));
        assert!(matches!(&err, TransportError::Other(msg) if msg == "port 4 busy"));
        assert_eq!(err.to_string(), "port 4 busy");
        assert_eq!(TransportError::Timeout.to_string(), "Operation timed out");
    }
}
