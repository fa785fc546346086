//! Timer-driven refresh of one remote list.
//!
//! All state lives on the consumer. The ticker thread and fetch workers
//! only post [`PollMessage`]s; [`PollingRefreshController::process_messages`]
//! applies them. Two counters keep stale messages out:
//!
//! - `ticker_generation` changes whenever the ticker is replaced (start,
//!   pause, resume, stop); ticks from an older ticker are dropped.
//! - `session` changes on `start` from `Idle` and on `stop`; focus changes
//!   and fetch results from an older session are dropped.
//!
//! `busy` is an in-flight marker, independent of the Running/Paused state:
//! pausing never aborts a fetch, and the marker is cleared only by that
//! fetch's completion message.
use crate::dispatch::{Mailbox, Poster, Waker};
use crate::error::SourceError;
use crate::focus::{FocusSignalBroadcaster, SubscriptionToken};
use crate::model::TaskItem;
use crate::poll::status::{ControllerState, RefreshEvent, RefreshStatus, TickOutcome};
use crate::poll::ticker::Ticker;
use crate::source::RemoteSource;
use chrono::{DateTime, Local};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Maximum number of messages applied per `process_messages` call.
const MAX_MESSAGES_PER_FRAME: usize = 64;

/// Identity and cadence of one polled list.
#[derive(Debug, Clone)]
pub struct PollTarget {
    pub name: String,
    pub interval: Duration,
    /// Call `check_for_updates` before paying for a full fetch.
    pub precheck: bool,
}

impl PollTarget {
    pub fn new(name: impl Into<String>, interval: Duration) -> Self {
        Self {
            name: name.into(),
            interval,
            precheck: false,
        }
    }

    pub fn with_precheck(mut self) -> Self {
        self.precheck = true;
        self
    }
}

pub(crate) enum PollMessage {
    Tick { generation: u64 },
    Focus { session: u64, foregrounded: bool },
    Finished { fetch_id: u64, outcome: FetchOutcome },
}

pub(crate) enum FetchOutcome {
    Unchanged,
    Loaded { items: Vec<TaskItem>, marker: String },
    Failed(SourceError),
    Panicked,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    fetch_id: u64,
    session: u64,
}

/// Reports the fetch outcome when dropped, so a panicking source still
/// clears `busy`.
struct CompletionGuard {
    poster: Poster<PollMessage>,
    fetch_id: u64,
    outcome: Option<FetchOutcome>,
}

impl CompletionGuard {
    fn complete(mut self, outcome: FetchOutcome) {
        self.outcome = Some(outcome);
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        let outcome = self.outcome.take().unwrap_or(FetchOutcome::Panicked);
        self.poster.post(PollMessage::Finished {
            fetch_id: self.fetch_id,
            outcome,
        });
    }
}

pub struct PollingRefreshController {
    target: PollTarget,
    source: Arc<dyn RemoteSource>,
    mailbox: Mailbox<PollMessage>,
    focus: Option<Arc<FocusSignalBroadcaster>>,
    focus_token: Option<SubscriptionToken>,
    /// Set by the focus listener when the mailbox was full.
    focus_missed: Arc<AtomicBool>,

    state: ControllerState,
    ticker: Option<Ticker>,
    ticker_generation: u64,
    session: u64,

    in_flight: Option<InFlight>,
    next_fetch_id: u64,

    status: RefreshStatus,
    items: Vec<TaskItem>,
    marker: Option<String>,
    last_loaded_count: Option<usize>,
    new_item_count: usize,
    last_refreshed: Option<DateTime<Local>>,

    refreshes_started: u64,
    ticks_skipped: u64,
}

impl PollingRefreshController {
    pub fn new(target: PollTarget, source: Arc<dyn RemoteSource>, waker: Waker) -> Self {
        Self {
            target,
            source,
            mailbox: Mailbox::new(waker),
            focus: None,
            focus_token: None,
            focus_missed: Arc::new(AtomicBool::new(false)),
            state: ControllerState::Idle,
            ticker: None,
            ticker_generation: 0,
            session: 0,
            in_flight: None,
            next_fetch_id: 0,
            status: RefreshStatus::NotLoaded,
            items: Vec::new(),
            marker: None,
            last_loaded_count: None,
            new_item_count: 0,
            last_refreshed: None,
            refreshes_started: 0,
            ticks_skipped: 0,
        }
    }

    /// Pause while the application is in the background.
    pub fn with_focus(mut self, focus: Arc<FocusSignalBroadcaster>) -> Self {
        self.focus = Some(focus);
        self
    }

    // ── Lifecycle ────────────────────────────────────────────────────────

    /// Begin ticking every `interval`.
    ///
    /// On a started controller this restarts the cadence with the new
    /// interval; the focus subscription is kept, not duplicated. If the
    /// application is currently in the background the controller starts
    /// `Paused` and begins ticking when focus returns.
    pub fn start(&mut self, interval: Duration) {
        self.target.interval = interval;
        if self.state == ControllerState::Idle {
            self.session += 1;
            self.subscribe_focus();
        }

        let foregrounded = self.focus.as_ref().map_or(true, |f| f.is_foregrounded());
        if foregrounded {
            self.arm_ticker();
            self.state = ControllerState::Running;
        } else {
            self.disarm_ticker();
            self.state = ControllerState::Paused;
        }
        info!(
            "Poll[{}]: started every {:?} ({:?})",
            self.target.name, interval, self.state
        );
    }

    /// Suspend the cadence. An in-flight fetch keeps running.
    pub fn pause(&mut self) {
        if self.state != ControllerState::Running {
            return;
        }
        self.disarm_ticker();
        self.state = ControllerState::Paused;
        debug!("Poll[{}]: paused", self.target.name);
    }

    /// Resume the cadence and tick once immediately.
    pub fn resume(&mut self) -> Option<TickOutcome> {
        if self.state != ControllerState::Paused {
            return None;
        }
        self.arm_ticker();
        self.state = ControllerState::Running;
        debug!("Poll[{}]: resumed", self.target.name);
        Some(self.tick())
    }

    /// Release the ticker and focus subscription.
    ///
    /// Ticks already queued are ignored from here on. A fetch in flight runs
    /// to completion; its result is discarded but it still clears `busy`.
    pub fn stop(&mut self) {
        if self.state == ControllerState::Idle {
            return;
        }
        self.disarm_ticker();
        self.unsubscribe_focus();
        self.session += 1;
        self.state = ControllerState::Idle;
        info!("Poll[{}]: stopped", self.target.name);
    }

    // ── Ticking ──────────────────────────────────────────────────────────

    /// The tick handler: launch a refresh unless one is already in flight.
    pub fn tick(&mut self) -> TickOutcome {
        if self.in_flight.is_some() {
            self.ticks_skipped += 1;
            debug!("Poll[{}]: busy, tick skipped", self.target.name);
            return TickOutcome::Skipped;
        }

        let fetch_id = self.next_fetch_id;
        self.next_fetch_id += 1;

        let job = fetch_job(
            self.mailbox.poster(),
            fetch_id,
            Arc::clone(&self.source),
            self.target.precheck,
            self.marker.clone(),
        );
        let spawned = thread::Builder::new()
            .name(format!("deskmirror-fetch-{}", self.target.name))
            .spawn(job);

        match spawned {
            Ok(_) => {
                self.in_flight = Some(InFlight {
                    fetch_id,
                    session: self.session,
                });
                self.refreshes_started += 1;
                TickOutcome::Started
            }
            Err(e) => {
                // The job was dropped unrun; its guard never existed, so
                // nothing was posted for this id.
                warn!("Poll[{}]: failed to spawn fetch worker: {}", self.target.name, e);
                self.status = RefreshStatus::Error(format!("failed to start refresh: {e}"));
                TickOutcome::Failed
            }
        }
    }

    /// Manual refresh; same busy rule as a timer tick, works in any state.
    pub fn refresh_now(&mut self) -> TickOutcome {
        self.tick()
    }

    // ── Consumer side ────────────────────────────────────────────────────

    /// Apply queued ticks, focus changes and fetch results.
    ///
    /// Call once per frame from the consumer context.
    pub fn process_messages(&mut self) -> Vec<RefreshEvent> {
        let mut events = Vec::new();
        for msg in self.mailbox.drain(MAX_MESSAGES_PER_FRAME) {
            match msg {
                PollMessage::Tick { generation } => {
                    if generation == self.ticker_generation
                        && self.state == ControllerState::Running
                    {
                        self.tick();
                    }
                }
                PollMessage::Focus {
                    session,
                    foregrounded,
                } => {
                    if session == self.session {
                        events.extend(self.apply_focus(foregrounded));
                    }
                }
                PollMessage::Finished { fetch_id, outcome } => {
                    if let Some(event) = self.finish(fetch_id, outcome) {
                        events.extend(event);
                    }
                }
            }
        }
        if self.focus_missed.swap(false, Ordering::AcqRel) {
            if let Some(foregrounded) = self.focus.as_ref().map(|f| f.is_foregrounded()) {
                events.extend(self.apply_focus(foregrounded));
            }
        }
        events
    }

    fn apply_focus(&mut self, foregrounded: bool) -> Option<RefreshEvent> {
        if foregrounded && self.state == ControllerState::Paused {
            self.resume();
            Some(RefreshEvent::Resumed)
        } else if !foregrounded && self.state == ControllerState::Running {
            self.pause();
            Some(RefreshEvent::Paused)
        } else {
            None
        }
    }

    fn finish(&mut self, fetch_id: u64, outcome: FetchOutcome) -> Option<Vec<RefreshEvent>> {
        let in_flight = match self.in_flight {
            Some(f) if f.fetch_id == fetch_id => f,
            _ => return None,
        };
        self.in_flight = None;

        if in_flight.session != self.session || self.state == ControllerState::Idle {
            debug!("Poll[{}]: result discarded after stop", self.target.name);
            return None;
        }

        let events = match outcome {
            FetchOutcome::Unchanged => vec![RefreshEvent::Unchanged],
            FetchOutcome::Loaded { items, marker } => {
                let count = items.len();
                let mut events = vec![RefreshEvent::Loaded { count }];
                self.new_item_count = match self.last_loaded_count {
                    Some(previous) if count > previous => count - previous,
                    _ => 0,
                };
                if self.new_item_count > 0 {
                    events.push(RefreshEvent::NewItems(self.new_item_count));
                }
                self.last_loaded_count = Some(count);
                self.items = items;
                self.marker = Some(marker);
                self.status = RefreshStatus::Loaded;
                self.last_refreshed = Some(Local::now());
                debug!("Poll[{}]: loaded {} items", self.target.name, count);
                events
            }
            FetchOutcome::Failed(SourceError::ConfigMissing(key)) => {
                debug!("Poll[{}]: configuration missing ({})", self.target.name, key);
                self.status = RefreshStatus::ConfigurationMissing;
                vec![RefreshEvent::ConfigurationMissing]
            }
            FetchOutcome::Failed(err) => {
                warn!("Poll[{}]: refresh failed: {}", self.target.name, err);
                let msg = err.to_string();
                self.status = RefreshStatus::Error(msg.clone());
                vec![RefreshEvent::Failed(msg)]
            }
            FetchOutcome::Panicked => {
                warn!("Poll[{}]: refresh worker panicked", self.target.name);
                let msg = "refresh worker panicked".to_owned();
                self.status = RefreshStatus::Error(msg.clone());
                vec![RefreshEvent::Failed(msg)]
            }
        };
        Some(events)
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn name(&self) -> &str {
        &self.target.name
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn interval(&self) -> Duration {
        self.target.interval
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn status(&self) -> &RefreshStatus {
        &self.status
    }

    /// Latest successfully fetched items; kept across failures.
    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    pub fn marker(&self) -> Option<&str> {
        self.marker.as_deref()
    }

    /// How many items the last successful load added over the one before.
    pub fn new_item_count(&self) -> usize {
        self.new_item_count
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Local>> {
        self.last_refreshed
    }

    pub fn refreshes_started(&self) -> u64 {
        self.refreshes_started
    }

    pub fn ticks_skipped(&self) -> u64 {
        self.ticks_skipped
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn arm_ticker(&mut self) {
        // Release the old ticker before its replacement exists.
        self.ticker = None;
        self.ticker_generation += 1;
        let generation = self.ticker_generation;
        let poster = self.mailbox.poster();
        self.ticker = Ticker::spawn(&self.target.name, self.target.interval, move || {
            poster.offer(PollMessage::Tick { generation });
        });
        if self.ticker.is_none() {
            self.status = RefreshStatus::Error("failed to start timer".to_owned());
        }
    }

    fn disarm_ticker(&mut self) {
        self.ticker = None;
        self.ticker_generation += 1;
    }

    fn subscribe_focus(&mut self) {
        let Some(focus) = &self.focus else {
            return;
        };
        if self.focus_token.is_some() {
            return;
        }
        let poster = self.mailbox.poster();
        let session = self.session;
        let missed = Arc::clone(&self.focus_missed);
        // Publishers usually run on the consumer thread, so this must not block.
        self.focus_token = Some(focus.subscribe(move |foregrounded| {
            let delivered = poster.offer(PollMessage::Focus {
                session,
                foregrounded,
            });
            if !delivered {
                missed.store(true, Ordering::Release);
            }
        }));
    }

    fn unsubscribe_focus(&mut self) {
        if let (Some(focus), Some(token)) = (&self.focus, self.focus_token.take()) {
            focus.unsubscribe(token);
        }
    }
}

impl Drop for PollingRefreshController {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The fetch worker's closure.
///
/// The completion guard is created on the worker itself. A job that is
/// dropped without running (failed spawn) posts nothing, so the consumer
/// never blocks on its own mailbox.
fn fetch_job(
    poster: Poster<PollMessage>,
    fetch_id: u64,
    source: Arc<dyn RemoteSource>,
    precheck: bool,
    marker: Option<String>,
) -> impl FnOnce() + Send + 'static {
    move || {
        let guard = CompletionGuard {
            poster,
            fetch_id,
            outcome: None,
        };
        let outcome = run_refresh(source.as_ref(), precheck, marker.as_deref());
        guard.complete(outcome);
    }
}

/// Worker-thread body: optional pre-check, then fetch.
fn run_refresh(source: &dyn RemoteSource, precheck: bool, marker: Option<&str>) -> FetchOutcome {
    if precheck {
        match source.check_for_updates(marker) {
            Ok(false) => return FetchOutcome::Unchanged,
            Ok(true) => {}
            Err(e) => return FetchOutcome::Failed(e),
        }
    }
    match source.fetch() {
        Ok(items) => {
            let marker = source.marker(&items);
            FetchOutcome::Loaded { items, marker }
        }
        Err(e) => FetchOutcome::Failed(e),
    }
}
