//! Trailing-edge debounce.
//!
//! The first raw event arms a quiet window, every further event restarts it,
//! and the callback fires once when the window passes with no events. A
//! bulk copy of a thousand files therefore costs one rebuild.
use crossbeam_channel::{select, Receiver};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

/// Default quiet window before an invalidation is delivered.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(250);

/// Run until `stop` disconnects or `raw` closes.
///
/// `alive` is checked right before each `fire` so a burst that settles
/// while the owner is tearing down is dropped.
pub(crate) fn run_debounce(
    raw: &Receiver<()>,
    stop: &Receiver<()>,
    window: Duration,
    alive: &AtomicBool,
    mut fire: impl FnMut(),
) {
    loop {
        // Idle until the first event of a burst.
        select! {
            recv(stop) -> _ => return,
            recv(raw) -> msg => if msg.is_err() { return },
        }

        let mut coalesced: u64 = 1;
        loop {
            select! {
                recv(stop) -> _ => return,
                recv(raw) -> msg => match msg {
                    Ok(()) => coalesced += 1,
                    Err(_) => return,
                },
                default(window) => break,
            }
        }

        if !alive.load(Ordering::Acquire) {
            return;
        }
        debug!("Debounce: {} raw events settled into one invalidation", coalesced);
        fire();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{bounded, unbounded};
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    struct Harness {
        raw_tx: crossbeam_channel::Sender<()>,
        stop_tx: Option<crossbeam_channel::Sender<()>>,
        fired: Arc<AtomicUsize>,
        handle: Option<thread::JoinHandle<()>>,
    }

    fn harness(window: Duration) -> Harness {
        let (raw_tx, raw_rx) = unbounded();
        let (stop_tx, stop_rx) = bounded::<()>(0);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        let handle = thread::spawn(move || {
            let alive = AtomicBool::new(true);
            run_debounce(&raw_rx, &stop_rx, window, &alive, || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });
        Harness {
            raw_tx,
            stop_tx: Some(stop_tx),
            fired,
            handle: Some(handle),
        }
    }

    fn wait_for(fired: &AtomicUsize, n: usize) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while fired.load(Ordering::SeqCst) < n {
            assert!(Instant::now() < deadline, "debounce never fired {n} times");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn burst_collapses_to_one_fire() {
        let h = harness(Duration::from_millis(100));
        for _ in 0..50 {
            h.raw_tx.send(()).unwrap();
        }
        wait_for(&h.fired, 1);
        thread::sleep(Duration::from_millis(250));
        assert_eq!(h.fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn separate_bursts_fire_separately() {
        let h = harness(Duration::from_millis(50));
        h.raw_tx.send(()).unwrap();
        wait_for(&h.fired, 1);
        h.raw_tx.send(()).unwrap();
        h.raw_tx.send(()).unwrap();
        wait_for(&h.fired, 2);
        thread::sleep(Duration::from_millis(150));
        assert_eq!(h.fired.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn stop_mid_burst_drops_pending_fire() {
        let mut h = harness(Duration::from_millis(300));
        h.raw_tx.send(()).unwrap();
        thread::sleep(Duration::from_millis(20));
        h.stop_tx.take();
        h.handle.take().unwrap().join().unwrap();
        assert_eq!(h.fired.load(Ordering::SeqCst), 0);
    }
}
