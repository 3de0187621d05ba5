//! Frames the bridge writes to the peer.

use core::fmt::Write as _;

use heapless::String;

pub const STATUS_FRAME_LEN: usize = 20;

const HEADER: [u8; 3] = [0x02, 0x14, 0xA0];
const TRAILER: [u8; 2] = [0xEF, 0xFF];

/// Periodic status frame.
///
/// ```text
/// 0      3            11              18     20
/// | 02 14 A0 | device id | 00 .. 00 | EF FF |
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StatusFrame([u8; STATUS_FRAME_LEN]);

impl StatusFrame {
    pub fn new(device_id: [u8; 8]) -> Self {
        let mut buf = [0u8; STATUS_FRAME_LEN];
        buf[..3].copy_from_slice(&HEADER);
        buf[3..11].copy_from_slice(&device_id);
        buf[18..].copy_from_slice(&TRAILER);
        Self(buf)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for StatusFrame {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Text reply acknowledging a received chunk: `Received Data len [<n>]`.
pub fn receive_ack(len: usize) -> String<32> {
    let mut s = String::new();
    // Lengths are bounded by MAX_PAYLOAD_LEN, so this always fits.
    let _ = write!(s, "Received Data len [{len}]");
    s
}
