//! Configuration options for reader sessions

use std::ops::RangeInclusive;

use mifare_transport::{LineSettings, MifareKey};

/// Key guarding reads of the record sector
pub const READ_KEY: MifareKey = MifareKey::new([0x76, 0x99, 0x73, 0x13, 0x16, 0x20]);

/// Key guarding writes of the record sector, also used to authenticate reads
pub const WRITE_KEY: MifareKey = MifareKey::new([0xC7, 0x28, 0x48, 0x02, 0x73, 0xA1]);

/// COM ports probed when no port is known yet
pub const DEFAULT_PORT_RANGE: RangeInclusive<u16> = 1..=30;

/// Application keys programmed into provisioned cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySet {
    /// Read key
    pub read: MifareKey,
    /// Write key
    pub write: MifareKey,
}

impl Default for KeySet {
    fn default() -> Self {
        Self {
            read: READ_KEY,
            write: WRITE_KEY,
        }
    }
}

/// How to treat the outcome of authenticating a blank card with the default key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VirginAuthPolicy {
    /// Proceed with provisioning even if the default key was rejected
    #[default]
    AssumeSuccess,
    /// Abort provisioning when the default key is rejected
    Strict,
}

/// Configuration options for a reader session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Ports probed, in ascending order, when discovering the reader
    pub port_range: RangeInclusive<u16>,

    /// Serial line profile
    pub line_settings: LineSettings,

    /// Application keys
    pub keys: KeySet,

    /// Blank card authentication policy
    pub virgin_auth: VirginAuthPolicy,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            port_range: DEFAULT_PORT_RANGE,
            line_settings: LineSettings::ACURA,
            keys: KeySet::default(),
            virgin_auth: VirginAuthPolicy::default(),
        }
    }
}

impl ReaderConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ports probed during discovery
    pub fn with_port_range(mut self, port_range: RangeInclusive<u16>) -> Self {
        self.port_range = port_range;
        self
    }

    /// Set the serial line profile
    pub const fn with_line_settings(mut self, line_settings: LineSettings) -> Self {
        self.line_settings = line_settings;
        self
    }

    /// Set the application keys
    pub const fn with_keys(mut self, keys: KeySet) -> Self {
        self.keys = keys;
        self
    }

    /// Set the blank card authentication policy
    pub const fn with_virgin_auth(mut self, policy: VirginAuthPolicy) -> Self {
        self.virgin_auth = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keys_match_vendor_notation() {
        let keys = KeySet::default();
        assert_eq!(keys.read, "769973131620h".parse().unwrap());
        assert_eq!(keys.write, "C728480273A1h".parse().unwrap());
    }

    #[test]
    fn test_builder() {
        let config = ReaderConfig::new()
            .with_port_range(3..=5)
            .with_virgin_auth(VirginAuthPolicy::Strict);

        assert_eq!(config.port_range, 3..=5);
        assert_eq!(config.virgin_auth, VirginAuthPolicy::Strict);
        assert_eq!(config.line_settings.to_string(), "19200,N,8,1");
    }

    #[test]
    fn test_builder_keys_and_line_settings() {
        let keys = KeySet {
            read: MifareKey::DEFAULT,
            write: "A0A1A2A3A4A5".parse().unwrap(),
        };
        let settings = LineSettings::ACURA.with_baud_rate(38400);
        let config = ReaderConfig::new()
            .with_keys(keys)
            .with_line_settings(settings);

        assert_eq!(config.keys, keys);
        assert_eq!(config.line_settings.to_string(), "38400,N,8,1");
        assert_eq!(config.virgin_auth, VirginAuthPolicy::AssumeSuccess);
    }
}
