//! Recording fakes for the hardware and transport seams.

extern crate std;

use core::cell::{Cell, RefCell};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::digital::{ErrorKind, ErrorType, OutputPin};
use embedded_hal_async::delay::DelayNs;

use crate::transport::{Destination, Transport};

#[derive(Debug)]
pub struct PinFault;

impl embedded_hal::digital::Error for PinFault {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Output pin that records every level it is driven to.
#[derive(Clone, Default)]
pub struct FakePin {
    levels: Rc<RefCell<Vec<bool>>>,
    skip: Rc<Cell<u32>>,
    fail: Rc<Cell<u32>>,
}

impl FakePin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn levels(&self) -> Vec<bool> {
        self.levels.borrow().clone()
    }

    pub fn level(&self) -> Option<bool> {
        self.levels.borrow().last().copied()
    }

    pub fn fail_next(&self) {
        self.fail_after(0, 1);
    }

    /// Lets `skip` writes through, then fails the `count` after them.
    pub fn fail_after(&self, skip: u32, count: u32) {
        self.skip.set(skip);
        self.fail.set(count);
    }

    fn drive(&mut self, high: bool) -> Result<(), PinFault> {
        if self.fail.get() > 0 {
            if self.skip.get() > 0 {
                self.skip.set(self.skip.get() - 1);
            } else {
                self.fail.set(self.fail.get() - 1);
                return Err(PinFault);
            }
        }
        self.levels.borrow_mut().push(high);
        Ok(())
    }
}

impl ErrorType for FakePin {
    type Error = PinFault;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true)
    }
}

/// Delay that returns at once and records the requested wait in microseconds.
#[derive(Clone, Default)]
pub struct FakeDelay {
    waits_us: Rc<RefCell<Vec<u32>>>,
}

impl FakeDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits_us(&self) -> Vec<u32> {
        self.waits_us.borrow().clone()
    }
}

impl DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waits_us.borrow_mut().push(ns / 1_000);
    }

    async fn delay_us(&mut self, us: u32) {
        self.waits_us.borrow_mut().push(us);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits_us.borrow_mut().push(ms.saturating_mul(1_000));
    }
}

/// Transport that records sends and can be told to fail them.
#[derive(Default)]
pub struct FakeTransport {
    sent: RefCell<Vec<(Destination, Vec<u8>)>>,
    fail_sends: Cell<bool>,
    fail_enable: Cell<bool>,
    enabled: Cell<bool>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(Destination, Vec<u8>)> {
        self.sent.borrow().clone()
    }

    pub fn sends(&self) -> usize {
        self.sent.borrow().len()
    }

    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.set(fail);
    }

    pub fn set_fail_enable(&self, fail: bool) {
        self.fail_enable.set(fail);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }
}

impl Transport for FakeTransport {
    type Error = &'static str;

    async fn enable(&self) -> Result<(), Self::Error> {
        if self.fail_enable.get() {
            return Err("controller did not respond");
        }
        self.enabled.set(true);
        Ok(())
    }

    async fn send(&self, dest: Destination, data: &[u8]) -> Result<(), Self::Error> {
        if self.fail_sends.get() {
            return Err("not connected");
        }
        self.sent.borrow_mut().push((dest, data.to_vec()));
        Ok(())
    }
}
