//! Remote catalog loading.
//!
//! - [`messages`]: fetch envelopes exchanged with the host
//! - [`sequence`]: the per-cycle index then packs state machine

pub mod messages;
pub mod sequence;

pub use messages::{FetchRequest, FetchResponse, FetchTarget};
pub use sequence::{register_then_publish, LoaderStep, PackLoader};
