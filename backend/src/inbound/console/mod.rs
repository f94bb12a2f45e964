//! Management console: form and list state driven by server actions.
//!
//! [`state`] holds the pure reducer, [`actor`] runs it on a Tokio task fed by
//! message passing, and [`view`] renders snapshots as HTML.

pub mod actor;
pub mod state;
pub mod view;

pub use actor::{ConsoleClosed, ConsoleHandle, spawn_console};
pub use state::{CommandKind, ConsoleCommand, ConsoleEvent, ConsoleState, RequestState};
pub use view::{escape, render_console, render_load_error};
