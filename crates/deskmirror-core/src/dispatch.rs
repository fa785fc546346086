//! Consumer-context dispatch — the one bridge from background threads to
//! consumer-owned state.
//!
//! Every controller and coordinator owns a [`Mailbox`]. Ticker threads,
//! fetch workers, notify callbacks and debounce threads hold a cloned
//! [`Poster`] and only ever *post* messages; the consumer (the UI thread)
//! drains the mailbox once per frame and applies them. Nothing outside the
//! consumer mutates shared state.
//!
//! ```ignore
//! let mailbox = Mailbox::new(Waker::new(move || ctx.request_repaint()));
//! let poster = mailbox.poster();
//! std::thread::spawn(move || poster.post(Message::Done));
//! // later, on the UI thread:
//! for msg in mailbox.drain(MAX_MESSAGES_PER_FRAME) { /* apply */ }
//! ```

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::fmt;
use std::sync::Arc;

/// Capacity of each component mailbox.
///
/// Ticks and invalidations are offered with `try_send` and simply dropped
/// when the mailbox is full; a dropped tick is indistinguishable from a
/// skipped one. Completion messages use a blocking `send`.
pub const MAILBOX_CAPACITY: usize = 256;

/// Wakes the consumer after a message has been posted.
///
/// The GUI hands in `egui::Context::request_repaint`; tests use
/// [`Waker::noop`].
#[derive(Clone, Default)]
pub struct Waker(Option<Arc<dyn Fn() + Send + Sync>>);

impl Waker {
    pub fn new(wake: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Some(Arc::new(wake)))
    }

    pub fn noop() -> Self {
        Self(None)
    }

    #[inline]
    pub fn wake(&self) {
        if let Some(wake) = &self.0 {
            wake();
        }
    }
}

impl fmt::Debug for Waker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Waker").field(&self.0.is_some()).finish()
    }
}

/// Receiving end, owned by the consumer.
#[derive(Debug)]
pub struct Mailbox<M> {
    tx: Sender<M>,
    rx: Receiver<M>,
    waker: Waker,
}

impl<M> Mailbox<M> {
    pub fn new(waker: Waker) -> Self {
        let (tx, rx) = bounded(MAILBOX_CAPACITY);
        Self { tx, rx, waker }
    }

    /// A sending handle for a background thread.
    pub fn poster(&self) -> Poster<M> {
        Poster {
            tx: self.tx.clone(),
            waker: self.waker.clone(),
        }
    }

    /// Take up to `max` queued messages without blocking.
    pub fn drain(&self, max: usize) -> Vec<M> {
        self.rx.try_iter().take(max).collect()
    }

    /// Number of messages currently queued.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

/// Sending end, cloned into background threads.
#[derive(Debug)]
pub struct Poster<M> {
    tx: Sender<M>,
    waker: Waker,
}

impl<M> Clone for Poster<M> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            waker: self.waker.clone(),
        }
    }
}

impl<M> Poster<M> {
    /// Post a message that must not be lost (blocks while the mailbox is full).
    ///
    /// Returns `false` if the consumer has gone away.
    pub fn post(&self, msg: M) -> bool {
        let delivered = self.tx.send(msg).is_ok();
        if delivered {
            self.waker.wake();
        }
        delivered
    }

    /// Post a message that may be dropped if the mailbox is full.
    pub fn offer(&self, msg: M) -> bool {
        match self.tx.try_send(msg) {
            Ok(()) => {
                self.waker.wake();
                true
            }
            Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => false,
        }
    }
}
