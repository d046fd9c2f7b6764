//! Path utilities for the Zellij sandbox environment.
//!
//! The host filesystem is mounted under `/host` inside the plugin sandbox. All
//! durable files the picker writes live in a single data directory beneath it.

use std::path::PathBuf;

/// File name of the durable key-value store.
pub const STATE_FILE_NAME: &str = "state.json";

/// File name of the OTLP trace export.
pub const TRACE_FILE_NAME: &str = "stickerpicker-otlp.json";

/// Returns the data directory for picker storage.
///
/// The directory is located at `/host/.local/share/zellij/stickerpicker` in the
/// Zellij sandbox, which typically resolves to
/// `~/.local/share/zellij/stickerpicker` on the host.
///
/// # Examples
///
/// ```
/// use stickerpicker::infrastructure::get_data_dir;
///
/// let data_dir = get_data_dir();
/// assert_eq!(data_dir.to_str().unwrap(), "/host/.local/share/zellij/stickerpicker");
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("stickerpicker")
}

/// Returns the path of the durable store file.
#[must_use]
pub fn state_file_path() -> PathBuf {
    get_data_dir().join(STATE_FILE_NAME)
}

/// Returns the path of the trace export file.
#[must_use]
pub fn trace_file_path() -> PathBuf {
    get_data_dir().join(TRACE_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_live_in_data_dir() {
        assert!(state_file_path().starts_with(get_data_dir()));
        assert!(trace_file_path().ends_with(TRACE_FILE_NAME));
    }
}
