//! Error types.
//!
//! - [`PushError`]: a producer could not enqueue an event. Producers drop the
//!   event and move on; nothing retries behind their back.
//! - [`StartupError`]: bring-up failed. The dispatch loop is never entered.

use core::fmt;

use embedded_hal::digital::ErrorKind;

use crate::event::EventKind;

/// Why [`EventQueue::push`](crate::EventQueue::push) refused an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PushError {
    /// Every slot is taken. The queue is left as it was.
    Full,
    /// The payload does not fit in one record. Payloads are never truncated.
    PayloadTooLarge { len: usize, max: usize },
    /// [`EventKind::None`] is a sentinel and is never queued.
    NoneKind,
}

impl PushError {
    /// Short stable label for log lines.
    pub fn as_label(&self) -> &'static str {
        match self {
            PushError::Full => "queue_full",
            PushError::PayloadTooLarge { .. } => "payload_too_large",
            PushError::NoneKind => "none_kind",
        }
    }
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushError::Full => f.write_str("event queue full"),
            PushError::PayloadTooLarge { len, max } => {
                write!(f, "payload of {len} bytes exceeds the {max} byte limit")
            }
            PushError::NoneKind => write!(f, "refusing to queue `{}` event", EventKind::None),
        }
    }
}

impl core::error::Error for PushError {}

/// Bring-up failure. `E` is the transport's error type.
#[derive(Debug, PartialEq, Eq)]
pub enum StartupError<E> {
    /// The LTE wake line could not be driven to its idle level.
    WakeLine(ErrorKind),
    /// The wireless stack failed to come up.
    Transport(E),
}

impl<E> StartupError<E> {
    pub fn as_label(&self) -> &'static str {
        match self {
            StartupError::WakeLine(_) => "startup_wake_line",
            StartupError::Transport(_) => "startup_transport",
        }
    }
}

impl<E> From<ErrorKind> for StartupError<E> {
    fn from(kind: ErrorKind) -> Self {
        StartupError::WakeLine(kind)
    }
}

impl<E: fmt::Debug> fmt::Display for StartupError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartupError::WakeLine(kind) => write!(f, "wake line init failed: {kind}"),
            StartupError::Transport(e) => write!(f, "transport init failed: {e:?}"),
        }
    }
}

impl<E: fmt::Debug> core::error::Error for StartupError<E> {}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::string::ToString;

    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(PushError::Full.as_label(), "queue_full");
        assert_eq!(
            PushError::PayloadTooLarge { len: 300, max: 244 }.as_label(),
            "payload_too_large"
        );
        assert_eq!(
            StartupError::Transport(()).as_label(),
            "startup_transport"
        );
    }

    #[test]
    fn pin_fault_converts_to_wake_line() {
        let err: StartupError<()> = ErrorKind::Other.into();
        assert_eq!(err, StartupError::WakeLine(ErrorKind::Other));
        assert_eq!(err.as_label(), "startup_wake_line");
    }

    #[test]
    fn display_mentions_sizes() {
        let msg = PushError::PayloadTooLarge { len: 300, max: 244 }.to_string();
        assert_eq!(msg, "payload of 300 bytes exceeds the 244 byte limit");
        assert_eq!(
            PushError::NoneKind.to_string(),
            "refusing to queue `none` event"
        );
    }
}
