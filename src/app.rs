//! Bring-up and hand-off to the dispatch loop.
//!
//! Order matters: the transport must be fully up before the readiness latch
//! is set, and the dispatcher only starts once bring-up succeeded. A board's
//! `main` looks roughly like:
//!
//! ```ignore
//! static QUEUE: EventQueue<DEFAULT_QUEUE_DEPTH> = EventQueue::new();
//! static STATE: ConnectionState = ConnectionState::new();
//! static READY: TransportReady = TransportReady::new();
//!
//! let wake = WakeLine::new(lte_wakeup, Delay, config.wake_pulse)?;
//! let sm = ConnectionStateMachine::new(&STATE, stack, wake);
//! let dispatcher = Dispatcher::new(&QUEUE, (sm,));
//! spawner.must_spawn(transmit_task(TransmitWorker::new(&STATE, stack, led, frame, period)));
//! let err = app::run(stack, &READY, dispatcher).await;
//! ```

use core::convert::Infallible;

use crate::dispatch::{Dispatcher, Handlers};
use crate::error::StartupError;
use crate::fmt::Dbg;
use crate::transmit::TransportReady;
use crate::transport::Transport;

pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn banner() {
    info!("==================================================");
    info!("    {} {}", NAME, VERSION);
    info!("==================================================");
}

/// Brings the transport up and releases the transmit worker.
///
/// On failure the latch stays unset, so the worker never starts sending.
pub async fn bring_up<T: Transport>(
    transport: &T,
    ready: &TransportReady,
) -> Result<(), StartupError<T::Error>> {
    banner();
    if let Err(e) = transport.enable().await {
        error!("Ble init error: {}", Dbg(&e));
        return Err(StartupError::Transport(e));
    }
    info!("Bluetooth initialized");
    ready.set();
    Ok(())
}

/// [`bring_up`], then dispatch forever. Only returns if bring-up failed.
pub async fn run<T, H, const N: usize>(
    transport: &T,
    ready: &TransportReady,
    mut dispatcher: Dispatcher<'_, H, N>,
) -> Result<Infallible, StartupError<T::Error>>
where
    T: Transport,
    H: Handlers,
{
    bring_up(transport, ready).await?;
    dispatcher.dispatch_forever().await
}
