//! Sector authentication
//!
//! The reader's chip sometimes drops the request framing that precedes
//! authentication, so a first failure is followed by an explicit request and,
//! if a card answers it, exactly one more attempt.

use mifare_transport::{KeyType, MifareKey, MifareTransport, TransportError};
use tracing::{debug, instrument, warn};

use crate::{
    config::VirginAuthPolicy,
    error::{AcuraError, Result},
    manual::ManualMode,
    session::AcuraReader,
};

/// Sector holding the keys the record is guarded by
pub const AUTH_SECTOR: u8 = 0;

/// Run `attempt`; if it fails and a request finds a card, run it once more
pub(crate) fn retry_after_request<T, R>(
    transport: &mut T,
    mut attempt: impl FnMut(&mut T) -> std::result::Result<R, TransportError>,
) -> std::result::Result<R, TransportError>
where
    T: MifareTransport,
{
    match attempt(transport) {
        Ok(value) => Ok(value),
        Err(first) => {
            debug!(error = %first, "First attempt failed, requesting card");
            if transport.has_card() {
                attempt(transport)
            } else {
                Err(first)
            }
        }
    }
}

/// Authenticate [`AUTH_SECTOR`] with key B
pub(crate) fn authenticate_sector<T: MifareTransport>(
    transport: &mut T,
    key: &MifareKey,
) -> Result<()> {
    retry_after_request(transport, |t| t.authenticate(AUTH_SECTOR, KeyType::B, key)).map_err(
        |e| {
            debug!(error = %e, "Authentication failed");
            AcuraError::Authentication
        },
    )
}

/// Authenticate a factory-blank card with [`MifareKey::DEFAULT`]
pub(crate) fn authenticate_virgin<T: MifareTransport>(
    transport: &mut T,
    policy: VirginAuthPolicy,
) -> Result<()> {
    match (authenticate_sector(transport, &MifareKey::DEFAULT), policy) {
        (Ok(()), _) => Ok(()),
        (Err(_), VirginAuthPolicy::AssumeSuccess) => {
            warn!("Default key rejected, continuing as authenticated");
            Ok(())
        }
        (Err(e), VirginAuthPolicy::Strict) => Err(e),
    }
}

impl<T: MifareTransport> AcuraReader<T> {
    /// Authenticate the card in the field with the configured write key
    #[instrument(skip(self))]
    pub fn authenticate(&mut self) -> Result<()> {
        let key = self.config().keys.write;
        self.authenticate_with(&key)
    }

    /// Authenticate the card in the field with `key`
    pub fn authenticate_with(&mut self, key: &MifareKey) -> Result<()> {
        let mut manual = ManualMode::begin(self.transport_mut());
        authenticate_sector(&mut *manual, key)
    }

    /// Authenticate a blank card with the default key
    ///
    /// Under [`VirginAuthPolicy::AssumeSuccess`] this succeeds whatever the
    /// card answered.
    pub fn authenticate_virgin(&mut self) -> Result<()> {
        let policy = self.config().virgin_auth;
        let mut manual = ManualMode::begin(self.transport_mut());
        authenticate_virgin(&mut *manual, policy)
    }
}

#[cfg(test)]
mod tests {
    use mifare_transport::mock::{MockCall, MockTransport};

    use super::*;

    fn open_mock() -> MockTransport {
        let mut mock = MockTransport::with_reader_on(1);
        mock.set_port(1);
        mock.open().unwrap();
        mock.clear_calls();
        mock
    }

    #[test]
    fn test_retry_not_needed() {
        let mut mock = open_mock();
        let mut attempts = 0;

        let result = retry_after_request(&mut mock, |_| {
            attempts += 1;
            Ok::<_, TransportError>(attempts)
        });

        assert_eq!(result.unwrap(), 1);
        assert!(mock.calls().is_empty());
    }

    #[test]
    fn test_retry_once_after_request() {
        let mut mock = open_mock();
        mock.insert_card("01020304", &[]);
        let mut attempts = 0;

        let result = retry_after_request(&mut mock, |_| {
            attempts += 1;
            if attempts == 1 {
                Err(TransportError::NoCard)
            } else {
                Ok(attempts)
            }
        });

        assert_eq!(result.unwrap(), 2);
        assert_eq!(mock.calls(), vec![MockCall::Request]);
    }

    #[test]
    fn test_retry_gives_up_after_second_failure() {
        let mut mock = open_mock();
        mock.insert_card("01020304", &[]);
        let mut attempts = 0;

        let result = retry_after_request(&mut mock, |_| {
            attempts += 1;
            Err::<(), _>(TransportError::NoCard)
        });

        assert!(result.is_err());
        assert_eq!(attempts, 2);
    }

    #[test]
    fn test_no_retry_without_card() {
        let mut mock = open_mock();
        let mut attempts = 0;

        let result = retry_after_request(&mut mock, |_| {
            attempts += 1;
            Err::<(), _>(TransportError::NoCard)
        });

        assert!(result.is_err());
        assert_eq!(attempts, 1);
        assert_eq!(mock.calls(), vec![MockCall::Request]);
    }

    #[test]
    fn test_virgin_policy() {
        let mut mock = open_mock();
        mock.insert_card("01020304", &[]);

        assert!(authenticate_virgin(&mut mock, VirginAuthPolicy::AssumeSuccess).is_ok());
        assert!(matches!(
            authenticate_virgin(&mut mock, VirginAuthPolicy::Strict),
            Err(AcuraError::Authentication)
        ));
    }
}
