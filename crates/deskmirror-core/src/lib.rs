/// DeskMirror Core — refresh orchestration and data model.
///
/// This crate contains all change-detection and refresh logic with zero UI
/// dependencies. State is owned by a single consumer (the UI thread in the
/// GUI, the test thread in tests); background threads only post messages.
///
/// # Modules
///
/// - [`dispatch`] — Mailboxes that move background results onto the consumer.
/// - [`poll`] — Timer-driven polling of a remote list, one fetch at a time.
/// - [`focus`] — Foreground/background fan-out with explicit subscriptions.
/// - [`watch`] — Recursive folder watching, debounce and snapshot rebuilds.
/// - [`model`] — Folder snapshots, task items and the list-kind table.
/// - [`source`] — The `RemoteSource` trait and a JSON board-export source.
/// - [`config`] — Key/value settings stores.
pub mod config;
pub mod dispatch;
pub mod error;
pub mod focus;
pub mod model;
pub mod poll;
pub mod source;
pub mod watch;
