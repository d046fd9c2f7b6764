//! Actions representing side effects to be executed by the plugin runtime.
//!
//! The event handler never talks to the host directly. It returns a
//! `Vec<Action>` after each event and the plugin shim executes them in order:
//! issuing web requests, posting to the persistence worker, piping picked items
//! to the host and hiding the pane.
//!
//! # Example
//!
//! ```rust
//! use stickerpicker::app::Action;
//! use stickerpicker::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToWorker(WorkerMessage::load_state())];
//! assert_eq!(actions.len(), 1);
//! ```

use crate::domain::OutboundSticker;
use crate::loader::FetchRequest;
use crate::worker::WorkerMessage;

/// Pipe message name under which picked items leave the plugin.
pub const SEND_MESSAGE_NAME: &str = "stickerpicker::send";

/// Commands representing side effects to be executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Issues a web request for an index or pack document.
    ///
    /// The response comes back as a `FetchCompleted` event carrying the
    /// request's context.
    Fetch(FetchRequest),

    /// Posts a message to the persistence worker.
    PostToWorker(WorkerMessage),

    /// Delivers a picked item to the host.
    EmitItem {
        /// Serialized as the pipe message payload.
        payload: OutboundSticker,
    },

    /// Hides the plugin pane.
    CloseFocus,
}
