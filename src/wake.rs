//! LTE modem wake line.

use embassy_time::Duration;
use embedded_hal::digital::{Error as _, ErrorKind, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::fmt::Dbg;

/// Active-high output that rouses the downstream cellular module.
///
/// A pulse is one assert, hold, deassert sequence. Only the dispatcher owns
/// the line, so pulses never overlap.
pub struct WakeLine<P, D> {
    pin: P,
    delay: D,
    hold: Duration,
    pulses: u32,
}

impl<P: OutputPin, D: DelayNs> WakeLine<P, D> {
    /// Takes the pin and drives it inactive.
    pub fn new(mut pin: P, delay: D, hold: Duration) -> Result<Self, ErrorKind> {
        pin.set_low().map_err(|e| e.kind())?;
        Ok(Self {
            pin,
            delay,
            hold,
            pulses: 0,
        })
    }

    /// Counted only once the line is back low. A failed deassert is retried
    /// once; if that fails too the line may be left asserted.
    pub async fn pulse(&mut self) -> Result<(), ErrorKind> {
        self.pin.set_high().map_err(|e| e.kind())?;
        let hold_us = u32::try_from(self.hold.as_micros()).unwrap_or(u32::MAX);
        self.delay.delay_us(hold_us).await;

        if let Err(e) = self.pin.set_low() {
            warn!("wake line deassert failed ({}), retrying", Dbg(&e.kind()));
            self.pin.set_low().map_err(|e| e.kind())?;
        }
        self.pulses = self.pulses.wrapping_add(1);
        Ok(())
    }

    /// Pulses fired since construction.
    pub fn pulses(&self) -> u32 {
        self.pulses
    }
}
