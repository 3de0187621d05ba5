//! Handler registry and the dispatch loop.
//!
//! The registry is a fixed, ordered list of handlers handed to the
//! [`Dispatcher`] when it is built: a tuple of one to six handlers, so a
//! lone handler is passed as `(h,)`. Tuple order is delivery order. Once
//! built, the list can't change.
//!
//! The dispatcher is the queue's only consumer. It takes one record at a
//! time and shows it to every handler before taking the next, so all
//! handlers see all events in push order.
//!
//! ```text
//!  stack callbacks ──push──► EventQueue ──pop──► Dispatcher ──► (H0, H1, ..)
//! ```

use crate::event::{Event, EventKind};
use crate::queue::EventQueue;

/// Receives every dispatched event. Match on the kinds you care about and
/// fall through on the rest; an unhandled kind is not an error.
///
/// The event is only borrowed for the duration of the call.
#[allow(async_fn_in_trait)]
pub trait Handler {
    async fn handle(&mut self, event: &Event);
}

impl<H: Handler> Handler for &mut H {
    async fn handle(&mut self, event: &Event) {
        (**self).handle(event).await
    }
}

/// An ordered set of handlers. Implemented for tuples of one to six.
#[allow(async_fn_in_trait)]
pub trait Handlers {
    /// Number of registered handlers.
    const LEN: usize;

    /// Delivers `event` to each handler in registration order.
    async fn deliver(&mut self, event: &Event);
}

macro_rules! impl_handlers {
    ($len:expr; $($name:ident . $idx:tt),+) => {
        impl<$($name: Handler),+> Handlers for ($($name,)+) {
            const LEN: usize = $len;

            async fn deliver(&mut self, event: &Event) {
                $( self.$idx.handle(event).await; )+
            }
        }
    };
}

impl_handlers!(1; A.0);
impl_handlers!(2; A.0, B.1);
impl_handlers!(3; A.0, B.1, C.2);
impl_handlers!(4; A.0, B.1, C.2, D.3);
impl_handlers!(5; A.0, B.1, C.2, D.3, E.4);
impl_handlers!(6; A.0, B.1, C.2, D.3, E.4, F.5);

/// Single consumer of an [`EventQueue`].
pub struct Dispatcher<'q, H, const N: usize> {
    queue: &'q EventQueue<N>,
    handlers: H,
    dispatched: u32,
}

impl<'q, H: Handlers, const N: usize> Dispatcher<'q, H, N> {
    pub fn new(queue: &'q EventQueue<N>, handlers: H) -> Self {
        debug!("dispatcher up with {} handlers", H::LEN);
        Self {
            queue,
            handlers,
            dispatched: 0,
        }
    }

    /// The application's main loop once bring-up is done.
    pub async fn dispatch_forever(&mut self) -> ! {
        loop {
            self.dispatch_one().await;
        }
    }

    /// Waits for one record and delivers it.
    pub async fn dispatch_one(&mut self) {
        let ev = self.queue.pop().await;
        self.deliver(&ev).await;
    }

    /// Delivers everything already queued without waiting for more.
    /// Returns how many records were delivered.
    pub async fn dispatch_pending(&mut self) -> usize {
        let mut n = 0;
        while let Some(ev) = self.queue.try_pop() {
            self.deliver(&ev).await;
            n += 1;
        }
        n
    }

    /// Delivers a record that did not come through the queue.
    pub async fn deliver(&mut self, ev: &Event) {
        if ev.kind == EventKind::None {
            return;
        }
        trace!("dispatch {} ({} bytes)", ev.kind, ev.len());
        self.handlers.deliver(ev).await;
        self.dispatched = self.dispatched.wrapping_add(1);
    }

    /// Records delivered so far.
    pub fn dispatched(&self) -> u32 {
        self.dispatched
    }

    pub fn handlers(&self) -> &H {
        &self.handlers
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use core::cell::RefCell;
    use std::vec::Vec;

    use embassy_futures::{block_on, poll_once};

    use super::*;

    /// Appends `(tag, kind)` for each event it sees.
    struct Recorder<'a> {
        tag: u8,
        log: &'a RefCell<Vec<(u8, EventKind)>>,
    }

    impl Handler for Recorder<'_> {
        async fn handle(&mut self, event: &Event) {
            self.log.borrow_mut().push((self.tag, event.kind));
        }
    }

    /// Only reacts to `Connected`.
    #[derive(Default)]
    struct ConnectCounter {
        connects: u32,
    }

    impl Handler for ConnectCounter {
        async fn handle(&mut self, event: &Event) {
            match event.kind {
                EventKind::Connected => self.connects += 1,
                _ => {}
            }
        }
    }

    #[test]
    fn delivers_to_every_handler_in_registration_order() {
        let q = EventQueue::<4>::new();
        let log = RefCell::new(Vec::new());
        let mut d = Dispatcher::new(
            &q,
            (
                Recorder { tag: 0, log: &log },
                Recorder { tag: 1, log: &log },
                Recorder { tag: 2, log: &log },
            ),
        );

        q.push(EventKind::Connected).unwrap();
        q.push(EventKind::Disconnected).unwrap();
        assert_eq!(block_on(d.dispatch_pending()), 2);

        assert_eq!(
            *log.borrow(),
            [
                (0, EventKind::Connected),
                (1, EventKind::Connected),
                (2, EventKind::Connected),
                (0, EventKind::Disconnected),
                (1, EventKind::Disconnected),
                (2, EventKind::Disconnected),
            ]
        );
        assert_eq!(d.dispatched(), 2);
    }

    #[test]
    fn fifo_order_is_preserved() {
        let q = EventQueue::<16>::new();
        let log = RefCell::new(Vec::new());
        let mut d = Dispatcher::new(&q, (Recorder { tag: 0, log: &log },));

        let pushed = [
            EventKind::Connected,
            EventKind::DataReceived,
            EventKind::DataReceived,
            EventKind::Disconnected,
            EventKind::Connected,
        ];
        for kind in pushed {
            q.push(kind).unwrap();
        }
        for _ in 0..pushed.len() {
            block_on(d.dispatch_one());
        }

        let seen: Vec<_> = log.borrow().iter().map(|&(_, k)| k).collect();
        assert_eq!(seen, pushed);
    }

    #[test]
    fn dispatch_waits_for_a_record() {
        let q = EventQueue::<4>::new();
        let mut d = Dispatcher::new(&q, (ConnectCounter::default(),));

        {
            let fut = core::pin::pin!(d.dispatch_one());
            assert!(poll_once(fut).is_pending());
        }
        q.push(EventKind::Connected).unwrap();
        block_on(d.dispatch_one());
        assert_eq!(d.handlers().0.connects, 1);
    }

    #[test]
    fn unhandled_kinds_are_a_no_op() {
        let q = EventQueue::<8>::new();
        let mut d = Dispatcher::new(&q, (ConnectCounter::default(),));

        q.push(EventKind::Disconnected).unwrap();
        q.push_with_payload(EventKind::DataReceived, b"ignored").unwrap();
        assert_eq!(block_on(d.dispatch_pending()), 2);
        assert_eq!(d.handlers().0.connects, 0);

        // The loop keeps going afterwards.
        q.push(EventKind::Connected).unwrap();
        block_on(d.dispatch_one());
        assert_eq!(d.handlers().0.connects, 1);
    }

    #[test]
    fn registry_sizes() {
        assert_eq!(<(ConnectCounter,) as Handlers>::LEN, 1);
        assert_eq!(
            <(
                ConnectCounter,
                ConnectCounter,
                ConnectCounter,
                ConnectCounter,
                ConnectCounter,
                ConnectCounter,
            ) as Handlers>::LEN,
            6
        );
    }

    #[test]
    fn sentinel_is_never_delivered() {
        let q = EventQueue::<1>::new();
        let log = RefCell::new(Vec::new());
        let mut d = Dispatcher::new(&q, (Recorder { tag: 0, log: &log },));

        block_on(d.deliver(&Event::new(EventKind::None)));
        assert!(log.borrow().is_empty());
        assert_eq!(d.dispatched(), 0);
    }
}
