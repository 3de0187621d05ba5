//! Connection state shared between the dispatcher and the transmit worker.

use core::fmt;
use core::sync::atomic::{AtomicU8, Ordering};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConnState {
    /// No transport event seen yet.
    Idle = 0,
    Connected = 1,
    Disconnected = 2,
}

impl ConnState {
    const fn from_u8(v: u8) -> Self {
        match v {
            1 => ConnState::Connected,
            2 => ConnState::Disconnected,
            _ => ConnState::Idle,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ConnState::Idle => "idle",
            ConnState::Connected => "connected",
            ConnState::Disconnected => "disconnected",
        }
    }
}

impl fmt::Display for ConnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Process-wide connection state.
///
/// The state machine is the only writer; it runs inside the dispatcher.
/// Readers (the transmit worker, status logic) may sample it from any task.
/// Stores are `AcqRel` swaps and loads `Acquire`, so whatever the dispatcher did
/// before publishing a state is visible to a reader that observes it.
pub struct ConnectionState {
    raw: AtomicU8,
}

impl ConnectionState {
    pub const fn new() -> Self {
        Self {
            raw: AtomicU8::new(ConnState::Idle as u8),
        }
    }

    pub fn get(&self) -> ConnState {
        ConnState::from_u8(self.raw.load(Ordering::Acquire))
    }

    pub fn is_connected(&self) -> bool {
        self.get() == ConnState::Connected
    }

    /// Returns the previous state.
    pub(crate) fn set(&self, state: ConnState) -> ConnState {
        ConnState::from_u8(self.raw.swap(state as u8, Ordering::AcqRel))
    }
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self::new()
    }
}
