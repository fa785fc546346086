use std::fmt;

/// Last recorded outcome of a refresh, shown verbatim in the UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RefreshStatus {
    #[default]
    NotLoaded,
    Loaded,
    ConfigurationMissing,
    Error(String),
}

impl fmt::Display for RefreshStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoaded => f.write_str("not loaded"),
            Self::Loaded => f.write_str("loaded"),
            Self::ConfigurationMissing => f.write_str("configuration missing"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Lifecycle state of a controller. `busy` is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Running,
    Paused,
}

/// Result of asking the controller to tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// A refresh was launched on a worker thread.
    Started,
    /// A refresh was already in flight; nothing happened.
    Skipped,
    /// The worker thread could not be created; recorded as an error status.
    Failed,
}

/// Something the consumer may want to react to, returned from
/// `process_messages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshEvent {
    Loaded { count: usize },
    /// The list grew by this many items since the previous load.
    NewItems(usize),
    /// The pre-check reported no change; nothing was fetched.
    Unchanged,
    ConfigurationMissing,
    Failed(String),
    Paused,
    Resumed,
}
