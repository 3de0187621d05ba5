//! BLE to LTE wake bridge core.
//!
//! The wireless stack reports connect, disconnect and receive from whatever
//! context it likes. Those notifications are copied into a bounded
//! [`EventQueue`] and serialized through one [`Dispatcher`], whose handlers
//! own every side effect:
//!
//! - [`ConnectionStateMachine`] publishes the [`ConnectionState`], pulses the
//!   LTE [`WakeLine`] on disconnect and acknowledges received data.
//! - [`TransmitWorker`] runs on its own task, samples the state every period,
//!   blinks the status LED while disconnected and sends the status frame
//!   while connected.
//!
//! ```text
//!  stack callbacks ─► TransportEvents ─► EventQueue ─► Dispatcher ─► ConnectionStateMachine
//!                                                                           │ (atomic)
//!                                                     TransmitWorker ◄─ ConnectionState
//! ```
//!
//! Logging goes through `defmt` with the `defmt` feature and through `log`
//! otherwise.

#![no_std]

// This must go first so the logging macros are visible to the other modules.
mod fmt;

pub mod app;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod frame;
pub mod queue;
pub mod state;
pub mod transmit;
pub mod transport;
pub mod wake;

#[cfg(test)]
mod testutil;

pub use config::{BridgeConfig, DEFAULT_QUEUE_DEPTH, MAX_PAYLOAD_LEN};
pub use connection::ConnectionStateMachine;
pub use dispatch::{Dispatcher, Handler, Handlers};
pub use error::{PushError, StartupError};
pub use event::{Event, EventKind, Payload};
pub use frame::StatusFrame;
pub use queue::EventQueue;
pub use state::{ConnState, ConnectionState};
pub use transmit::{Cycle, TransmitWorker, TransportReady};
pub use transport::{Destination, Transport, TransportEvents};
pub use wake::WakeLine;
