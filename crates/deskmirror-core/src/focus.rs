//! Application focus fan-out.
//!
//! One broadcaster is created by the composition root and shared as
//! `Arc<FocusSignalBroadcaster>`. Each running
//! [`PollingRefreshController`](crate::poll::PollingRefreshController) holds
//! a [`SubscriptionToken`] and releases it on `stop()`.
//!
//! Listeners are invoked on the publishing thread, outside the registry
//! lock, and are expected to do nothing but post into a mailbox.
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

type Listener = Arc<dyn Fn(bool) + Send + Sync>;

/// Handle returned by [`FocusSignalBroadcaster::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionToken(u64);

struct Registry {
    next_token: u64,
    foregrounded: bool,
    listeners: Vec<(SubscriptionToken, Listener)>,
}

pub struct FocusSignalBroadcaster {
    registry: Mutex<Registry>,
}

impl Default for FocusSignalBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusSignalBroadcaster {
    /// New broadcaster. The application starts foregrounded.
    pub fn new() -> Self {
        Self {
            registry: Mutex::new(Registry {
                next_token: 0,
                foregrounded: true,
                listeners: Vec::new(),
            }),
        }
    }

    pub fn subscribe(&self, listener: impl Fn(bool) + Send + Sync + 'static) -> SubscriptionToken {
        let mut registry = self.registry.lock();
        let token = SubscriptionToken(registry.next_token);
        registry.next_token += 1;
        registry.listeners.push((token, Arc::new(listener)));
        token
    }

    /// Remove a listener. Returns `false` if the token was already released.
    pub fn unsubscribe(&self, token: SubscriptionToken) -> bool {
        let mut registry = self.registry.lock();
        let before = registry.listeners.len();
        registry.listeners.retain(|(t, _)| *t != token);
        registry.listeners.len() != before
    }

    /// Record the current focus state and notify listeners on a transition.
    ///
    /// Returns the number of listeners notified (0 when nothing changed).
    pub fn publish(&self, foregrounded: bool) -> usize {
        let listeners: Vec<Listener> = {
            let mut registry = self.registry.lock();
            if registry.foregrounded == foregrounded {
                return 0;
            }
            registry.foregrounded = foregrounded;
            registry.listeners.iter().map(|(_, l)| Arc::clone(l)).collect()
        };

        debug!(
            "Focus: {} ({} listeners)",
            if foregrounded { "foreground" } else { "background" },
            listeners.len()
        );
        for listener in &listeners {
            listener(foregrounded);
        }
        listeners.len()
    }

    pub fn is_foregrounded(&self) -> bool {
        self.registry.lock().foregrounded
    }

    pub fn subscriber_count(&self) -> usize {
        self.registry.lock().listeners.len()
    }
}
