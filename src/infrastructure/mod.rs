//! Infrastructure layer for filesystem and network location handling.
//!
//! This module provides utilities for working with the Zellij plugin sandbox
//! environment, where the host filesystem is mounted under `/host`, and for
//! resolving remote index and pack locations.

pub mod locations;
pub mod paths;

pub use locations::{index_location, packs_base, resolve};
pub use paths::{get_data_dir, state_file_path, trace_file_path};
