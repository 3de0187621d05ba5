//! Periodic transmit worker.
//!
//! Runs one cycle, then sleeps `transmit_period`. While no session is up it
//! blinks the status LED; once connected it holds the LED on and sends the
//! application payload every cycle. A failed send is logged and retried on the next
//! cycle, nothing more.

use embassy_sync::once_lock::OnceLock;
use embassy_time::{Duration, Timer};
use embedded_hal::digital::{OutputPin, PinState};

use crate::fmt::Dbg;
use crate::state::{ConnState, ConnectionState};
use crate::transport::{Destination, Transport};

/// One-shot latch set once the transport is up. Never reset.
pub struct TransportReady(OnceLock<()>);

impl TransportReady {
    pub const fn new() -> Self {
        Self(OnceLock::new())
    }

    /// Marks the transport as up. Later calls are no-ops.
    pub fn set(&self) {
        let _ = self.0.init(());
    }

    pub fn is_set(&self) -> bool {
        self.0.try_get().is_some()
    }

    pub async fn wait(&self) {
        self.0.get().await;
    }
}

impl Default for TransportReady {
    fn default() -> Self {
        Self::new()
    }
}

/// What one cycle did.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cycle {
    /// Not connected; the LED was toggled.
    Waiting,
    Sent,
    SendFailed,
}

pub struct TransmitWorker<'a, T, L, P> {
    state: &'a ConnectionState,
    transport: &'a T,
    led: L,
    payload: P,
    period: Duration,
    last_seen: ConnState,
    blink: bool,
    send_failures: u32,
}

impl<'a, T, L, P> TransmitWorker<'a, T, L, P>
where
    T: Transport,
    L: OutputPin,
    P: AsRef<[u8]>,
{
    pub fn new(
        state: &'a ConnectionState,
        transport: &'a T,
        led: L,
        payload: P,
        period: Duration,
    ) -> Self {
        Self {
            state,
            transport,
            led,
            payload,
            period,
            last_seen: ConnState::Idle,
            blink: false,
            send_failures: 0,
        }
    }

    /// Parks until the transport is up, then cycles forever.
    pub async fn run(mut self, ready: &TransportReady) -> ! {
        ready.wait().await;
        debug!("Run ble watch task");

        loop {
            self.cycle().await;
            // A full period after every cycle, even one that overran.
            Timer::after(self.period).await;
        }
    }

    /// Samples the connection state once and acts on it.
    pub async fn cycle(&mut self) -> Cycle {
        let now = self.state.get();
        let outcome = if now == ConnState::Connected {
            if self.last_seen != ConnState::Connected {
                self.drive_led(true);
            }
            self.send().await
        } else {
            self.blink = !self.blink;
            self.drive_led(self.blink);
            trace!("Wait Connection...");
            Cycle::Waiting
        };
        self.last_seen = now;
        outcome
    }

    /// Sends that failed since start.
    pub fn send_failures(&self) -> u32 {
        self.send_failures
    }

    async fn send(&mut self) -> Cycle {
        match self
            .transport
            .send(Destination::Any, self.payload.as_ref())
            .await
        {
            Ok(()) => Cycle::Sent,
            Err(e) => {
                self.send_failures = self.send_failures.wrapping_add(1);
                warn!(
                    "Failed to send data over BLE connection: {} ({} failures)",
                    Dbg(&e),
                    self.send_failures
                );
                Cycle::SendFailed
            }
        }
    }

    fn drive_led(&mut self, on: bool) {
        if self.led.set_state(PinState::from(on)).is_err() {
            warn!("status LED write failed");
        }
    }
}
