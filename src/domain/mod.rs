//! Domain layer for the sticker picker.
//!
//! This module contains the document and error types shared by every other
//! layer, independent of Zellij-specific APIs or infrastructure concerns.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`item`]: Stickers, packs and the outbound payload
//! - [`index`]: The pack index document
//! - [`settings`]: Display setting values and bounds
//!
//! # Examples
//!
//! ```
//! use stickerpicker::domain::{Item, Pack, Result};
//!
//! fn single_pack() -> Result<Pack> {
//!     Ok(Pack::new("cats", "Cats", vec![Item::new("c1", "mxc://x/1", "cat")]))
//! }
//! ```

pub mod error;
pub mod index;
pub mod item;
pub mod settings;

pub use error::{status_text, PickerError, Result};
pub use index::{AltSourceConfig, PackIndex, DEFAULT_HOMESERVER_URL};
pub use item::{Item, OutboundSticker, Pack, FREQUENTLY_USED_PACK_ID, FREQUENTLY_USED_TITLE};
pub use settings::ThemeName;
