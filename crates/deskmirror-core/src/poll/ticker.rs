//! Fixed-cadence ticker thread.
//!
//! The thread waits on a `crossbeam_channel::tick` receiver and a stop
//! channel; dropping the [`Ticker`] disconnects the stop channel, wakes the
//! thread immediately and joins it, so no tick is produced after `drop`
//! returns.
use crossbeam_channel::{bounded, select, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub(crate) struct Ticker {
    stop_tx: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Ticker {
    /// Start calling `on_tick` every `interval`, first call one interval from now.
    ///
    /// Returns `None` if the OS refused to create the thread.
    pub(crate) fn spawn(
        name: &str,
        interval: Duration,
        on_tick: impl Fn() + Send + 'static,
    ) -> Option<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let ticks = crossbeam_channel::tick(interval);

        let spawned = thread::Builder::new()
            .name(format!("deskmirror-tick-{name}"))
            .spawn(move || loop {
                select! {
                    recv(stop_rx) -> _ => break,
                    recv(ticks) -> _ => on_tick(),
                }
            });

        match spawned {
            Ok(handle) => Some(Self {
                stop_tx: Some(stop_tx),
                handle: Some(handle),
            }),
            Err(e) => {
                warn!("Ticker: failed to spawn thread for {}: {}", name, e);
                None
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        // Disconnecting the stop channel makes `recv(stop_rx)` ready.
        self.stop_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                debug!("Ticker: thread panicked before shutdown");
            }
        }
    }
}
