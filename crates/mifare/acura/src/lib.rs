//! Session layer for the Acura serial Mifare reader
//!
//! [`AcuraReader`] wraps a [`MifareTransport`] and provides:
//!
//! - discovery of the reader on COM ports 1 to 30 and liveness checks
//! - key B authentication of sector 0, with one retry after a card request
//! - reading and writing the 16-character registration record
//! - reading the card's serial number
//! - provisioning of factory-blank cards
//! - relaying of presence, removal and button events
//!
//! Every card operation turns the reader's auto-poll back on before it
//! returns, whether it succeeded or not.
//!
//! # Examples
//!
//! ```no_run
//! # fn run<T: mifare_transport::MifareTransport>(transport: T) -> Result<(), mifare_acura::AcuraError> {
//! use mifare_acura::{AcuraReader, ReaderEvent};
//!
//! let mut reader = AcuraReader::new(transport);
//! let port = reader.connect()?;
//! println!("Reader on COM{port}");
//!
//! reader.subscribe(|event: ReaderEvent| println!("{event}"))?;
//!
//! if reader.is_present() {
//!     reader.write_record("42", 0)?;
//!     println!("{}", reader.read_record()?);
//! }
//! # Ok(())
//! # }
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod auth;
mod card;
mod config;
mod error;
pub mod event;
mod manual;
mod provision;
pub mod record;
mod session;

pub use auth::AUTH_SECTOR;
pub use card::{CardId, RECORD_BLOCK};
pub use config::{DEFAULT_PORT_RANGE, KeySet, READ_KEY, ReaderConfig, VirginAuthPolicy, WRITE_KEY};
pub use error::{AcuraError, Result};
pub use event::{ReaderEvent, ReaderEventHandler, ReaderEventReceiver, SubscriptionId};
pub use provision::{TRAILER_BLOCK, record_access_conditions};
pub use session::AcuraReader;

pub use mifare_transport::{self as transport, MifareTransport};
