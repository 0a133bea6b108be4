//! Scriptable in-memory transport for tests
//!
//! [`MockTransport`] is a cheap handle over shared state: keep a clone in the
//! test, hand another to the code under test, and inspect the recorded calls
//! afterwards.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use parking_lot::Mutex;
use tracing::trace;

use crate::{
    LineSettings, MifareTransport, TransportError,
    event::{ListenerId, TransportEvent, TransportListener},
    key::{KeyType, MifareKey},
    transport::{AccessConditions, BLOCK_SIZE, Block},
};

/// A call received by the mock, in order of arrival
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MockCall {
    Configure(LineSettings),
    SetPort(u16),
    Open,
    Close,
    Reset,
    FirmwareVersion,
    AutoMode(bool),
    Request,
    Anticollision,
    Authenticate {
        sector: u8,
        key_type: KeyType,
        key: MifareKey,
    },
    ReadBlock(u8),
    WriteBlock {
        sector: u8,
        key_type: KeyType,
        block: u8,
        data: Block,
    },
    AccessConditions(AccessConditions),
    AddListener(ListenerId),
    RemoveListener(ListenerId),
}

#[derive(Debug, Clone)]
struct MockCard {
    id: String,
    keys: Vec<MifareKey>,
}

struct MockState {
    live_port: Option<u16>,
    selected_port: Option<u16>,
    open: bool,
    unresponsive: bool,
    firmware: String,
    auto_mode: bool,
    line_settings: Option<LineSettings>,
    card: Option<MockCard>,
    hide_card_from_request: bool,
    authentication_failures: usize,
    anticollision_failures: usize,
    fail_reads: bool,
    fail_writes: bool,
    blocks: HashMap<u8, Block>,
    access_conditions: Option<AccessConditions>,
    listeners: BTreeMap<ListenerId, TransportListener>,
    next_listener: u64,
    calls: Vec<MockCall>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            live_port: None,
            selected_port: None,
            open: false,
            unresponsive: false,
            firmware: "ACURA-MOCK 1.0".to_string(),
            auto_mode: false,
            line_settings: None,
            card: None,
            hide_card_from_request: false,
            authentication_failures: 0,
            anticollision_failures: 0,
            fail_reads: false,
            fail_writes: false,
            blocks: HashMap::new(),
            access_conditions: None,
            listeners: BTreeMap::new(),
            next_listener: 1,
            calls: Vec::new(),
        }
    }
}

impl MockState {
    /// Card commands leave the reader in manual mode
    fn manual_command(&mut self, call: MockCall) -> Result<(), TransportError> {
        self.calls.push(call);
        if !self.open {
            return Err(TransportError::PortClosed);
        }
        self.auto_mode = false;
        Ok(())
    }
}

/// In-memory reader driven by the test
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockTransport")
            .field("live_port", &state.live_port)
            .field("selected_port", &state.selected_port)
            .field("open", &state.open)
            .field("auto_mode", &state.auto_mode)
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl MockTransport {
    /// Create a mock with no reader attached to any port
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock with a reader answering on `port`
    pub fn with_reader_on(port: u16) -> Self {
        let mock = Self::new();
        mock.attach_reader(port);
        mock
    }

    /// Attach the reader to `port`
    pub fn attach_reader(&self, port: u16) {
        self.state.lock().live_port = Some(port);
    }

    /// Unplug the reader; the port descriptor stays as it is
    pub fn detach_reader(&self) {
        self.state.lock().live_port = None;
    }

    /// Keep the port openable but stop answering firmware queries
    pub fn set_unresponsive(&self, unresponsive: bool) {
        self.state.lock().unresponsive = unresponsive;
    }

    /// Place a card with serial `id` that accepts `keys` in the field
    pub fn insert_card(&self, id: &str, keys: &[MifareKey]) {
        self.state.lock().card = Some(MockCard {
            id: id.to_string(),
            keys: keys.to_vec(),
        });
    }

    /// Remove the card from the field
    pub fn remove_card(&self) {
        self.state.lock().card = None;
    }

    /// Make requests report zero tags even with a card in the field
    pub fn hide_card_from_request(&self, hide: bool) {
        self.state.lock().hide_card_from_request = hide;
    }

    /// Reject the next `count` authentications regardless of key
    pub fn fail_next_authentications(&self, count: usize) {
        self.state.lock().authentication_failures = count;
    }

    /// Fail the next `count` anticollisions
    pub fn fail_next_anticollisions(&self, count: usize) {
        self.state.lock().anticollision_failures = count;
    }

    /// Fail every block read
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    /// Fail every block write
    pub fn set_fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    /// Preload a block
    pub fn set_block(&self, block: u8, data: Block) {
        self.state.lock().blocks.insert(block, data);
    }

    /// Current contents of a block
    pub fn block(&self, block: u8) -> Option<Block> {
        self.state.lock().blocks.get(&block).copied()
    }

    /// Whether auto-poll is currently enabled
    pub fn auto_mode(&self) -> bool {
        self.state.lock().auto_mode
    }

    /// Whether the port is open
    pub fn port_open(&self) -> bool {
        self.state.lock().open
    }

    /// Last line settings applied
    pub fn line_settings(&self) -> Option<LineSettings> {
        self.state.lock().line_settings
    }

    /// Last access conditions programmed
    pub fn access_conditions(&self) -> Option<AccessConditions> {
        self.state.lock().access_conditions
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    /// All calls received so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.lock().calls.clone()
    }

    /// Number of calls matching `predicate`
    pub fn count_calls(&self, predicate: impl Fn(&MockCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|c| predicate(c)).count()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    /// Deliver an event to every listener, as the driver's event thread would
    pub fn fire(&self, event: TransportEvent) {
        let listeners: Vec<TransportListener> =
            self.state.lock().listeners.values().cloned().collect();
        trace!(?event, listeners = listeners.len(), "Firing mock event");
        for listener in listeners {
            listener(event);
        }
    }
}

impl MifareTransport for MockTransport {
    fn configure(&mut self, settings: &LineSettings) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::Configure(*settings));
        state.line_settings = Some(*settings);
        Ok(())
    }

    fn set_port(&mut self, port: u16) {
        let mut state = self.state.lock();
        state.calls.push(MockCall::SetPort(port));
        state.selected_port = Some(port);
    }

    fn port(&self) -> Option<u16> {
        self.state.lock().selected_port
    }

    fn open(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::Open);
        let port = state.selected_port.ok_or(TransportError::NoPort)?;
        if state.live_port != Some(port) {
            return Err(TransportError::Open(port));
        }
        state.open = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::Close);
        state.open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state.lock().open
    }

    fn reset(&mut self) -> Result<(), TransportError> {
        self.state.lock().calls.push(MockCall::Reset);
        Ok(())
    }

    fn firmware_version(&mut self) -> Result<String, TransportError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::FirmwareVersion);
        let attached = state.live_port.is_some() && state.live_port == state.selected_port;
        if !state.open || !attached || state.unresponsive {
            return Err(TransportError::NoResponse);
        }
        Ok(state.firmware.clone())
    }

    fn set_auto_mode(&mut self, enabled: bool) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.calls.push(MockCall::AutoMode(enabled));
        state.auto_mode = enabled;
        Ok(())
    }

    fn request(&mut self) -> Result<u8, TransportError> {
        let mut state = self.state.lock();
        state.manual_command(MockCall::Request)?;
        let visible = state.card.is_some() && !state.hide_card_from_request;
        Ok(u8::from(visible))
    }

    fn anticollision(&mut self) -> Result<String, TransportError> {
        let mut state = self.state.lock();
        state.manual_command(MockCall::Anticollision)?;
        if state.anticollision_failures > 0 {
            state.anticollision_failures -= 1;
            return Err(TransportError::Anticollision);
        }
        state
            .card
            .as_ref()
            .map(|card| card.id.clone())
            .ok_or(TransportError::NoCard)
    }

    fn authenticate(
        &mut self,
        sector: u8,
        key_type: KeyType,
        key: &MifareKey,
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.manual_command(MockCall::Authenticate {
            sector,
            key_type,
            key: *key,
        })?;
        if state.authentication_failures > 0 {
            state.authentication_failures -= 1;
            return Err(TransportError::AuthenticationRejected { sector });
        }
        match &state.card {
            Some(card) if card.keys.contains(key) => Ok(()),
            Some(_) => Err(TransportError::AuthenticationRejected { sector }),
            None => Err(TransportError::NoCard),
        }
    }

    fn read_block(&mut self, block: u8) -> Result<Block, TransportError> {
        let mut state = self.state.lock();
        state.manual_command(MockCall::ReadBlock(block))?;
        if state.fail_reads || state.card.is_none() {
            return Err(TransportError::Read(block));
        }
        Ok(state
            .blocks
            .get(&block)
            .copied()
            .unwrap_or([0u8; BLOCK_SIZE]))
    }

    fn write_block(
        &mut self,
        sector: u8,
        key_type: KeyType,
        block: u8,
        data: &Block,
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.manual_command(MockCall::WriteBlock {
            sector,
            key_type,
            block,
            data: *data,
        })?;
        if state.fail_writes || state.card.is_none() {
            return Err(TransportError::Write(block));
        }
        state.blocks.insert(block, *data);
        Ok(())
    }

    fn set_access_conditions(
        &mut self,
        conditions: &AccessConditions,
    ) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        state.manual_command(MockCall::AccessConditions(*conditions))?;
        state.access_conditions = Some(*conditions);
        Ok(())
    }

    fn add_listener(&mut self, listener: TransportListener) -> ListenerId {
        let mut state = self.state.lock();
        let id = ListenerId::new(state.next_listener);
        state.next_listener += 1;
        state.listeners.insert(id, listener);
        state.calls.push(MockCall::AddListener(id));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let mut state = self.state.lock();
        state.calls.push(MockCall::RemoveListener(id));
        state.listeners.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_open_only_on_live_port() {
        let mut mock = MockTransport::with_reader_on(4);

        mock.set_port(3);
        assert!(matches!(mock.open(), Err(TransportError::Open(3))));
        assert!(!mock.is_open());

        mock.set_port(4);
        mock.open().unwrap();
        assert!(mock.is_open());
        assert_eq!(mock.firmware_version().unwrap(), "ACURA-MOCK 1.0");
    }

    #[test]
    fn test_card_commands_leave_auto_mode() {
        let mut mock = MockTransport::with_reader_on(1);
        mock.set_port(1);
        mock.open().unwrap();
        mock.set_auto_mode(true).unwrap();

        assert_eq!(mock.request().unwrap(), 0);
        assert!(!mock.auto_mode());
    }

    #[test]
    fn test_scripted_authentication_failures() {
        let mut mock = MockTransport::with_reader_on(1);
        mock.set_port(1);
        mock.open().unwrap();
        mock.insert_card("A1B2C3D4", &[MifareKey::DEFAULT]);
        mock.fail_next_authentications(1);

        let key = MifareKey::DEFAULT;
        assert!(mock.authenticate(0, KeyType::B, &key).is_err());
        assert!(mock.authenticate(0, KeyType::B, &key).is_ok());
    }

    #[test]
    fn test_fire_reaches_listeners_until_removed() {
        let mut mock = MockTransport::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let id = mock.add_listener(Arc::new(move |_: TransportEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        mock.fire(TransportEvent::CardPresent);
        assert!(mock.remove_listener(id));
        mock.fire(TransportEvent::CardRemove);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!mock.remove_listener(id));
    }
}
