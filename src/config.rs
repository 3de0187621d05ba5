//! Bridge tunables.

use embassy_time::Duration;

/// Largest payload an event record can carry. One ATT payload at the default
/// 247 byte MTU.
pub const MAX_PAYLOAD_LEN: usize = 244;

/// Event queue depth used by the simulator and suggested for boards.
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

/// Device id the reference hardware reports in its status frame.
pub const DEFAULT_DEVICE_ID: [u8; 8] = [0x07, 0x2E, 0x17, 0x02, 0x1B, 0x07, 0x15, 0x5C];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Wake period of the transmit worker. Also the blink half period while
    /// no session is up.
    pub transmit_period: Duration,
    /// How long the LTE wake line is held asserted after a disconnect.
    pub wake_pulse: Duration,
    /// Written into every status frame.
    pub device_id: [u8; 8],
}

impl BridgeConfig {
    pub const DEFAULT: Self = Self {
        transmit_period: Duration::from_millis(1000),
        wake_pulse: Duration::from_millis(100),
        device_id: DEFAULT_DEVICE_ID,
    };

    pub const fn with_transmit_period(mut self, period: Duration) -> Self {
        self.transmit_period = period;
        self
    }

    pub const fn with_wake_pulse(mut self, pulse: Duration) -> Self {
        self.wake_pulse = pulse;
        self
    }

    pub const fn with_device_id(mut self, device_id: [u8; 8]) -> Self {
        self.device_id = device_id;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
