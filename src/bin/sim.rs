//! Runs the bridge core on the desktop against a scripted peer.
//!
//! `RUST_LOG=debug cargo run --features std --bin sim`

use core::convert::Infallible;
use core::sync::atomic::{AtomicU32, Ordering};

use embassy_executor::Spawner;
use embassy_time::{Delay, Duration, Timer};
use embedded_hal::digital::{ErrorType, OutputPin};
use log::{error, info};
use lte_bridge::{
    app, BridgeConfig, ConnectionState, ConnectionStateMachine, Destination, Dispatcher,
    EventQueue, StartupError, StatusFrame, TransmitWorker, Transport, TransportEvents,
    TransportReady, WakeLine, DEFAULT_QUEUE_DEPTH,
};
use static_cell::StaticCell;

static QUEUE: EventQueue<DEFAULT_QUEUE_DEPTH> = EventQueue::new();
static STATE: ConnectionState = ConnectionState::new();
static READY: TransportReady = TransportReady::new();
static EVENTS: TransportEvents<'static, DEFAULT_QUEUE_DEPTH> = TransportEvents::new(&QUEUE);
static RADIO: StaticCell<SimRadio> = StaticCell::new();

/// Stand-in for the BLE stack. Sends go to the log.
struct SimRadio {
    sends: AtomicU32,
}

impl SimRadio {
    fn new() -> Self {
        Self {
            sends: AtomicU32::new(0),
        }
    }
}

impl Transport for SimRadio {
    type Error = Infallible;

    async fn enable(&self) -> Result<(), Infallible> {
        info!("[radio] advertising");
        Ok(())
    }

    async fn send(&self, dest: Destination, data: &[u8]) -> Result<(), Infallible> {
        let n = self.sends.fetch_add(1, Ordering::Relaxed) + 1;
        info!("[radio] tx #{n} to {dest:?}: {data:02x?}");
        Ok(())
    }
}

/// GPIO stand-in that logs level changes.
struct LogPin(&'static str);

impl ErrorType for LogPin {
    type Error = Infallible;
}

impl OutputPin for LogPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        info!("[{}] low", self.0);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        info!("[{}] high", self.0);
        Ok(())
    }
}

type Worker = TransmitWorker<'static, SimRadio, LogPin, StatusFrame>;

#[embassy_executor::task]
async fn transmit_task(worker: Worker) -> ! {
    worker.run(&READY).await
}

/// Plays the peer: connect, write, drop, come back.
#[embassy_executor::task]
async fn peer_task() {
    Timer::after(Duration::from_millis(1500)).await;
    EVENTS.on_connected(0x0040);

    Timer::after(Duration::from_millis(2500)).await;
    EVENTS.on_received(0x0040, b"AT+CSQ");

    Timer::after(Duration::from_millis(2000)).await;
    EVENTS.on_disconnected(0x0040, 0x13);

    Timer::after(Duration::from_millis(3000)).await;
    EVENTS.on_connected(0x0041);

    Timer::after(Duration::from_millis(3000)).await;
    info!("[peer] script done, {} events dropped", EVENTS.dropped());
    std::process::exit(0);
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    if let Err(e) = start(spawner).await {
        error!("init error: {e}");
        std::process::exit(1);
    }
}

/// Wires the bridge together and runs it. Returns only if bring-up failed.
async fn start(spawner: Spawner) -> Result<Infallible, StartupError<Infallible>> {
    let config = BridgeConfig::default();
    let radio: &'static SimRadio = RADIO.init(SimRadio::new());

    let wake = WakeLine::new(LogPin("lte_wakeup"), Delay, config.wake_pulse)?;
    let sm = ConnectionStateMachine::new(&STATE, radio, wake);
    let dispatcher = Dispatcher::new(&QUEUE, (sm,));

    let frame = StatusFrame::new(config.device_id);
    let worker = TransmitWorker::new(
        &STATE,
        radio,
        LogPin("status_led"),
        frame,
        config.transmit_period,
    );
    spawner.must_spawn(transmit_task(worker));
    spawner.must_spawn(peer_task());

    app::run(radio, &READY, dispatcher).await
}
