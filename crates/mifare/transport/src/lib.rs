//! Transport contract for serial Mifare card readers
//!
//! This crate describes what the session layer needs from a vendor reader
//! driver, without implementing the serial framing itself:
//!
//! - [`MifareTransport`]: port lifecycle, card commands, auto-poll toggle and
//!   the event stream
//! - [`LineSettings`]: the `baud,parity,data,stop` line profile
//! - [`MifareKey`] and [`KeyType`]: sector keys and key slots
//! - [`TransportEvent`]: raw firmware events
//!
//! # Features
//!
//! - `mock`: [`mock::MockTransport`], a scriptable in-memory reader for tests
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

mod config;
mod error;
pub mod event;
mod key;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod transport;

pub use config::{LineSettings, LineSettingsError, Parity};
pub use error::TransportError;
pub use event::{ListenerId, TransportEvent, TransportListener};
pub use key::{KEY_LEN, KeyParseError, KeyType, MifareKey};
pub use transport::{AccessConditions, BLOCK_SIZE, Block, MifareTransport};
