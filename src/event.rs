//! Event records passed from the wireless stack to the dispatcher.

use core::fmt;

use heapless::Vec;

use crate::config::MAX_PAYLOAD_LEN;

/// Payload storage owned by a record. Bytes are copied in at push time.
pub type Payload = Vec<u8, MAX_PAYLOAD_LEN>;

/// What happened.
///
/// New kinds may be added; handlers match on the ones they care about and
/// ignore the rest.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum EventKind {
    /// Sentinel. Never queued, never dispatched.
    None,
    /// A session was established.
    Connected,
    /// The session was torn down.
    Disconnected,
    /// The peer wrote data. The payload holds the bytes.
    DataReceived,
}

impl EventKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::None => "none",
            EventKind::Connected => "connected",
            EventKind::Disconnected => "disconnected",
            EventKind::DataReceived => "received",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One queued notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub payload: Option<Payload>,
}

impl Event {
    pub const fn new(kind: EventKind) -> Self {
        Self {
            kind,
            payload: None,
        }
    }

    /// Copies `data` into a new record. Fails with the offending length if it
    /// doesn't fit.
    pub fn with_payload(kind: EventKind, data: &[u8]) -> Result<Self, usize> {
        let payload = Vec::from_slice(data).map_err(|_| data.len())?;
        Ok(Self {
            kind,
            payload: Some(payload),
        })
    }

    /// `Connected` record carrying the session handle.
    pub fn connected(handle: u16) -> Self {
        let mut payload = Payload::new();
        // Capacity is far above two bytes.
        let _ = payload.extend_from_slice(&handle.to_le_bytes());
        Self {
            kind: EventKind::Connected,
            payload: Some(payload),
        }
    }

    pub fn data(&self) -> &[u8] {
        self.payload.as_deref().unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.data().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// Session handle carried by a `Connected` record, if any.
    pub fn session(&self) -> Option<u16> {
        match (self.kind, self.data()) {
            (EventKind::Connected, &[lo, hi]) => Some(u16::from_le_bytes([lo, hi])),
            _ => None,
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Event {
    fn format(&self, f: defmt::Formatter<'_>) {
        defmt::write!(f, "Event {{ kind: {}, len: {} }}", self.kind, self.len())
    }
}
