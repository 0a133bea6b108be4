//! Card presence, record I/O and serial number

use mifare_transport::{KeyType, MifareTransport};
use tracing::{debug, instrument};

use crate::{
    AcuraReader,
    auth::{AUTH_SECTOR, authenticate_sector, retry_after_request},
    error::Result,
    manual::ManualMode,
    record,
};

/// Block holding the registration record
pub const RECORD_BLOCK: u8 = 1;

/// Hardware serial number of a card, as reported by anticollision
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::From)]
pub struct CardId(String);

impl CardId {
    /// Serial number as text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<T: MifareTransport> AcuraReader<T> {
    /// Whether a card answers a request
    pub fn is_present(&mut self) -> bool {
        let mut manual = ManualMode::begin(self.transport_mut());
        manual.has_card()
    }

    /// Read the registration record of the card in the field
    ///
    /// Each of the 16 bytes becomes one character of the result.
    #[instrument(skip(self))]
    pub fn read_record(&mut self) -> Result<String> {
        let key = self.config().keys.write;
        let mut manual = ManualMode::begin(self.transport_mut());

        authenticate_sector(&mut *manual, &key)?;
        let block = manual.read_block(RECORD_BLOCK)?;

        let value = record::decode(&block);
        debug!(%value, "Record read");
        Ok(value)
    }

    /// Write `value` as the registration record of the card in the field
    ///
    /// Values longer than 16 characters are rejected before the reader is
    /// contacted; shorter ones are left-padded with `'0'`. `_option` is
    /// reserved.
    #[instrument(skip(self))]
    pub fn write_record(&mut self, value: &str, _option: i32) -> Result<()> {
        let block = record::encode(value)?;
        let key = self.config().keys.write;
        let mut manual = ManualMode::begin(self.transport_mut());

        authenticate_sector(&mut *manual, &key)?;
        manual.write_block(AUTH_SECTOR, KeyType::B, RECORD_BLOCK, &block)?;

        debug!("Record written");
        Ok(())
    }

    /// Read the serial number of the card in the field
    #[instrument(skip(self))]
    pub fn read_card_id(&mut self) -> Result<CardId> {
        let mut manual = ManualMode::begin(self.transport_mut());
        let id = retry_after_request(&mut *manual, |t| t.anticollision())?;
        Ok(CardId::from(id))
    }
}
