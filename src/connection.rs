//! Connection lifecycle state machine.
//!
//! | current | event        | next         | side effect                           |
//! |---------|--------------|--------------|---------------------------------------|
//! | any     | Connected    | Connected    | remember the session                  |
//! | any     | Disconnected | Disconnected | release the session, pulse wake line  |
//! | any     | DataReceived | unchanged    | acknowledge over the transport        |
//!
//! Runs inside the dispatcher, which makes it the only writer of
//! [`ConnectionState`]. The status LED belongs to the transmit worker; it
//! follows whatever state is published here on its next cycle.

use embedded_hal::digital::OutputPin;
use embedded_hal_async::delay::DelayNs;

use crate::dispatch::Handler;
use crate::event::{Event, EventKind};
use crate::fmt::Dbg;
use crate::frame::receive_ack;
use crate::state::{ConnState, ConnectionState};
use crate::transport::{Destination, Transport};
use crate::wake::WakeLine;

pub struct ConnectionStateMachine<'a, T, P, D> {
    state: &'a ConnectionState,
    transport: &'a T,
    wake: WakeLine<P, D>,
    session: Option<u16>,
    wake_failures: u32,
}

impl<'a, T, P, D> ConnectionStateMachine<'a, T, P, D>
where
    T: Transport,
    P: OutputPin,
    D: DelayNs,
{
    pub fn new(state: &'a ConnectionState, transport: &'a T, wake: WakeLine<P, D>) -> Self {
        Self {
            state,
            transport,
            wake,
            session: None,
            wake_failures: 0,
        }
    }

    /// Session handle of the current connection, if the stack reported one.
    pub fn session(&self) -> Option<u16> {
        self.session
    }

    pub fn wake_pulses(&self) -> u32 {
        self.wake.pulses()
    }

    pub fn wake_failures(&self) -> u32 {
        self.wake_failures
    }

    fn on_connected(&mut self, ev: &Event) {
        self.session = ev.session();
        let prev = self.state.set(ConnState::Connected);
        info!("{} -> connected", prev);
    }

    async fn on_disconnected(&mut self) {
        if let Some(handle) = self.session.take() {
            debug!("released session {}", handle);
        }
        let prev = self.state.set(ConnState::Disconnected);
        info!("{} -> disconnected, waking LTE module", prev);

        if let Err(e) = self.wake.pulse().await {
            self.wake_failures = self.wake_failures.wrapping_add(1);
            error!("LTE wake pulse failed: {}", Dbg(&e));
        }
    }

    async fn on_data(&mut self, data: &[u8]) {
        let ack = receive_ack(data.len());
        let dest = self.session.map_or(Destination::Any, Destination::Session);
        if let Err(e) = self.transport.send(dest, ack.as_bytes()).await {
            warn!("Failed to send data over BLE connection: {}", Dbg(&e));
        }
    }
}

impl<T, P, D> Handler for ConnectionStateMachine<'_, T, P, D>
where
    T: Transport,
    P: OutputPin,
    D: DelayNs,
{
    async fn handle(&mut self, event: &Event) {
        match event.kind {
            EventKind::Connected => self.on_connected(event),
            EventKind::Disconnected => self.on_disconnected().await,
            EventKind::DataReceived => self.on_data(event.data()).await,
            _ => {}
        }
    }
}
