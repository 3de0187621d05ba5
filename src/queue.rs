//! Bounded event queue between the wireless stack and the dispatcher.
//!
//! Producers are the stack's notification callbacks, which may run in
//! interrupt context or on the stack's own task. They must return promptly,
//! so pushing never waits: a full queue is reported and the producer drops the
//! event. The single consumer is the [`Dispatcher`](crate::Dispatcher).
//!
//! Records are stored by value. A payload is copied into the record before it
//! becomes visible, so the caller's buffer can be reused as soon as `push`
//! returns.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};

use crate::config::MAX_PAYLOAD_LEN;
use crate::error::PushError;
use crate::event::{Event, EventKind};

/// FIFO of at most `N` events. Many producers, one consumer.
pub struct EventQueue<const N: usize> {
    ch: Channel<CriticalSectionRawMutex, Event, N>,
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self { ch: Channel::new() }
    }

    /// Queues a zero-payload event.
    pub fn push(&self, kind: EventKind) -> Result<(), PushError> {
        self.enqueue(Event::new(kind))
    }

    /// Queues an event carrying a copy of `data`.
    pub fn push_with_payload(&self, kind: EventKind, data: &[u8]) -> Result<(), PushError> {
        let ev = Event::with_payload(kind, data).map_err(|len| PushError::PayloadTooLarge {
            len,
            max: MAX_PAYLOAD_LEN,
        })?;
        self.enqueue(ev)
    }

    /// Queues an already built record.
    pub fn enqueue(&self, ev: Event) -> Result<(), PushError> {
        if ev.kind == EventKind::None {
            return Err(PushError::NoneKind);
        }
        self.ch.try_send(ev).map_err(|_: TrySendError<Event>| PushError::Full)
    }

    /// Waits for the oldest record.
    pub async fn pop(&self) -> Event {
        self.ch.receive().await
    }

    pub fn try_pop(&self) -> Option<Event> {
        self.ch.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.ch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ch.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.ch.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
