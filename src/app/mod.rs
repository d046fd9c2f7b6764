//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the plugin runtime (main.rs) and the
//! loader/registry/viewport/worker layers. It implements the event-driven
//! architecture that powers the picker.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! User Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──── Fetch results / Worker ──────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Load phase and browse mode types
//! - [`settings`]: Display settings and the settings section controls
//! - [`state`]: Central application state container
//! - `view`: View model computation

pub mod actions;
pub mod handler;
pub mod modes;
pub mod settings;
pub mod state;
mod view;

pub use actions::{Action, SEND_MESSAGE_NAME};
pub use handler::{handle_event, Event};
pub use modes::{BrowseMode, LoadPhase};
pub use settings::DisplaySettings;
pub use state::{AppState, Cursor, Direction};
