//! Preparation of factory-blank cards

use mifare_transport::{AccessConditions, MifareTransport};
use tracing::{info, instrument};

use crate::{
    AcuraReader,
    auth::authenticate_virgin,
    config::KeySet,
    error::{AcuraError, Result},
    manual::ManualMode,
};

/// Sector trailer programmed during provisioning
pub const TRAILER_BLOCK: u8 = 7;

const FIRST_BLOCK: u8 = 1;
const LAST_BLOCK: u8 = 7;
// Passed through unchanged; the firmware documents no meaning for it
const RESERVED: u8 = 4;

/// Access conditions giving `keys` control of the record sector
pub const fn record_access_conditions(keys: &KeySet) -> AccessConditions {
    AccessConditions {
        read_key: keys.read,
        write_key: keys.write,
        trailer_block: TRAILER_BLOCK,
        start_block: FIRST_BLOCK,
        end_block: LAST_BLOCK,
        reserved: RESERVED,
    }
}

impl<T: MifareTransport> AcuraReader<T> {
    /// Program the application keys into a factory-blank card
    ///
    /// With the default [`VirginAuthPolicy`](crate::VirginAuthPolicy) the
    /// access conditions are programmed even if the card rejected the
    /// default key.
    #[instrument(skip(self))]
    pub fn provision_blank_card(&mut self) -> Result<()> {
        let alive = self.is_alive();
        let conditions = record_access_conditions(&self.config().keys);
        let policy = self.config().virgin_auth;
        let mut manual = ManualMode::begin(self.transport_mut());

        if !alive {
            return Err(AcuraError::NotConnected);
        }

        authenticate_virgin(&mut *manual, policy)?;
        manual.set_access_conditions(&conditions)?;

        info!(trailer = TRAILER_BLOCK, "Blank card provisioned");
        Ok(())
    }
}
