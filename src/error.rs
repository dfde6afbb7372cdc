//! Error types for `mapcover`
//!
//! Toggle paths never fail (a missing scene or source is a silent no-op), so
//! these errors only cover the ambient concerns: settings persistence,
//! logging setup and saved hotkey data.
//!
//! Error variants use `#[source]` to preserve error chains.

use thiserror::Error;

/// Simple error type for wrapping string messages while implementing `std::error::Error`
#[derive(Debug, Error)]
#[error("{0}")]
pub struct StringError(pub String);

impl StringError {
    /// Create a new `StringError` from a string message
    pub fn new(msg: impl Into<String>) -> Box<Self> {
        Box::new(Self(msg.into()))
    }
}

/// Main error type for `mapcover`
#[derive(Debug, Error)]
pub enum MapCoverError {
    /// Configuration error
    /// Preserves the underlying error source for full error chain transparency
    #[error("Configuration error: {0}")]
    ConfigError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Saved hotkey data could not be decoded
    #[error("Invalid saved hotkey data for '{name}': {source}")]
    InvalidHotkeyData {
        /// Hotkey action name the data was stored under
        name: String,
        /// Decoding failure
        #[source]
        source: serde_json::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for `mapcover` operations
pub type Result<T> = std::result::Result<T, MapCoverError>;

/// Convert an error to a user-friendly message
pub fn get_user_friendly_error(error: &MapCoverError) -> String {
    match error {
        MapCoverError::ConfigError(_) => "Failed to load or save settings.\n\n\
             Your settings may not persist.\n\
             Check that you have write permissions to:\n\
             %APPDATA%\\MapCover"
            .to_string(),
        MapCoverError::InvalidHotkeyData { name, .. } => {
            format!(
                "The saved key binding for '{name}' could not be read.\n\n\
                 Assign the hotkey again in the hotkey settings."
            )
        }
        MapCoverError::IoError(e) => {
            format!(
                "A file system error occurred:\n\n{e}\n\n\
                 Please check file permissions and disk space."
            )
        }
        MapCoverError::JsonError(e) => {
            format!(
                "Settings file is corrupted:\n\n{e}\n\n\
                 Default settings will be used."
            )
        }
    }
}
