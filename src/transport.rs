//! Seam to the wireless stack.
//!
//! The stack is a black box: it brings itself up, calls back on connect,
//! disconnect and receive, and offers a best-effort send. [`Transport`] is the
//! half the bridge calls into; [`TransportEvents`] is the half the stack's
//! callbacks call into.

use core::fmt::Debug;
use core::sync::atomic::{AtomicU32, Ordering};

use crate::error::PushError;
use crate::event::{Event, EventKind};
use crate::fmt::Dbg;
use crate::queue::EventQueue;

/// Where a send goes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Destination {
    /// Whatever session is current. Mirrors passing no connection to the
    /// UART service's send call.
    Any,
    Session(u16),
}

/// The wireless stack as seen by the bridge.
///
/// `send` takes `&self`: the state machine and the transmit worker both hold
/// a shared reference and may send from different tasks.
#[allow(async_fn_in_trait)]
pub trait Transport {
    type Error: Debug;

    /// Brings the stack up: controller, services, advertising.
    async fn enable(&self) -> Result<(), Self::Error>;

    async fn send(&self, dest: Destination, data: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Transport> Transport for &T {
    type Error = T::Error;

    async fn enable(&self) -> Result<(), Self::Error> {
        T::enable(self).await
    }

    async fn send(&self, dest: Destination, data: &[u8]) -> Result<(), Self::Error> {
        T::send(self, dest, data).await
    }
}

/// Producer side of the event queue, called from the stack's callbacks.
///
/// Every method returns immediately. If the queue refuses an event it is
/// dropped, a warning is logged and [`dropped`](Self::dropped) goes up.
pub struct TransportEvents<'q, const N: usize> {
    queue: &'q EventQueue<N>,
    dropped: AtomicU32,
}

impl<'q, const N: usize> TransportEvents<'q, N> {
    pub const fn new(queue: &'q EventQueue<N>) -> Self {
        Self {
            queue,
            dropped: AtomicU32::new(0),
        }
    }

    pub fn on_connected(&self, handle: u16) {
        info!("Connected {}", handle);
        self.submit(Event::connected(handle));
    }

    /// Connection attempt that never produced a session. Nothing is queued.
    pub fn on_connect_failed<E: Debug>(&self, err: E) {
        error!("Connection failed (err {})", Dbg(&err));
    }

    pub fn on_disconnected(&self, handle: u16, reason: u8) {
        info!("Disconnected: {} (reason {})", handle, reason);
        self.submit(Event::new(EventKind::Disconnected));
    }

    pub fn on_received(&self, handle: u16, data: &[u8]) {
        info!("Received data from: {} ({} bytes)", handle, data.len());
        match Event::with_payload(EventKind::DataReceived, data) {
            Ok(ev) => self.submit(ev),
            Err(len) => self.note_drop(
                EventKind::DataReceived,
                PushError::PayloadTooLarge {
                    len,
                    max: crate::config::MAX_PAYLOAD_LEN,
                },
            ),
        }
    }

    /// Raw entry point for producers outside the stack callbacks.
    pub fn push_event(&self, kind: EventKind) -> Result<(), PushError> {
        self.queue.push(kind)
    }

    pub fn push_event_with_payload(&self, kind: EventKind, data: &[u8]) -> Result<(), PushError> {
        self.queue.push_with_payload(kind, data)
    }

    /// Events lost to a full queue or an oversized payload.
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    fn submit(&self, ev: Event) {
        let kind = ev.kind;
        if let Err(e) = self.queue.enqueue(ev) {
            self.note_drop(kind, e);
        }
    }

    fn note_drop(&self, kind: EventKind, e: PushError) {
        let c = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
        warn!("Dropped {} event: {} ({} dropped so far)", kind, e, c);
    }
}
