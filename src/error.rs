//! Error types for telemetry decoding and content discovery.
//!
//! All errors implement the `std::error::Error` trait and include structured context
//! for debugging and recovery guidance.
//!
//! ## Error Categories
//!
//! - **Connection Errors**: A shared memory page could not be opened or mapped
//! - **Decode Errors**: A raw page buffer is shorter than its record layout, or
//!   kept changing while it was copied
//! - **File Errors**: Filesystem access with path context
//! - **Parse Errors**: Malformed content metadata (normally logged and defaulted)
//! - **Setup Path Errors**: The four reasons a setup directory cannot be prepared
//! - **Setup File Errors**: Unsafe car, track or file names, and missing or
//!   already existing setup files
//! - **Windows API Errors**: Platform-specific Windows operation failures
//!
//! Absence is never an error: a missing install root, car directory or shared
//! memory page is reported as "not found" by the operation that looked for it.
//!
//! ## Recovery and Retry
//!
//! ```rust
//! use pitbox::PitboxError;
//!
//! let error = PitboxError::connection_failed("Assetto Corsa not running");
//! if error.is_retryable() {
//!     for suggestion in error.recovery_suggestions() {
//!         println!("  - {}", suggestion);
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

#[cfg(windows)]
use windows_core as core;

/// Result type alias for pitbox operations.
pub type Result<T, E = PitboxError> = std::result::Result<T, E>;

/// Main error type for pitbox operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PitboxError {
    #[error("Failed to connect to Assetto Corsa shared memory: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{layout} page needs {expected} bytes, buffer holds {actual}")]
    Decode { layout: &'static str, expected: usize, actual: usize },

    #[error("{layout} page was rewritten during every read attempt")]
    TornRead { layout: &'static str },

    #[error("File error: {path}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {context}: {details}")]
    Parse { context: String, details: String },

    #[error("{feature} is only available on {required_platform}")]
    UnsupportedPlatform { feature: String, required_platform: String },

    #[error("Windows API error: {operation}")]
    #[cfg(windows)]
    WindowsApi {
        operation: String,
        #[source]
        source: core::Error,
    },

    #[error("Assetto Corsa installation not detected")]
    InstallationNotDetected,

    #[error("Invalid Assetto Corsa installation: {missing} not found")]
    InvalidInstallation { missing: &'static str },

    #[error("Cannot write to setups directory {path} (permission denied)")]
    SetupsNotWritable { path: PathBuf },

    #[error("Cannot create setup directory {path}: {source}")]
    SetupDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid identifier {id:?}: must be a single folder or file name")]
    InvalidIdentifier { id: String },

    #[error("Setup already exists: {path}")]
    SetupExists { path: PathBuf },

    #[error("Setup does not exist: {path}")]
    SetupNotFound { path: PathBuf },
}

impl PitboxError {
    /// Returns whether this error is potentially recoverable through retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            PitboxError::Connection { .. } => true,
            PitboxError::Decode { .. } => true,
            PitboxError::TornRead { .. } => true,
            PitboxError::File { .. } => false,
            PitboxError::Parse { .. } => false,
            PitboxError::UnsupportedPlatform { .. } => false,
            #[cfg(windows)]
            PitboxError::WindowsApi { .. } => true,
            PitboxError::InstallationNotDetected => true,
            PitboxError::InvalidInstallation { .. } => true,
            PitboxError::SetupsNotWritable { .. } => false,
            PitboxError::SetupDirectory { .. } => false,
            PitboxError::InvalidIdentifier { .. } => false,
            PitboxError::SetupExists { .. } => false,
            PitboxError::SetupNotFound { .. } => false,
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            PitboxError::Connection { .. } => vec![
                "Ensure Assetto Corsa is running and a session is loaded",
                "Run pitbox in the same Windows session as the simulator",
                "Reconnect once the simulator has finished loading",
            ],
            PitboxError::Decode { .. } => vec![
                "Retry the read on the next poll",
                "Check that the simulator version matches the page layouts",
            ],
            PitboxError::TornRead { .. } => vec![
                "Retry the read on the next poll",
                "Poll less often than the simulator's physics rate",
            ],
            PitboxError::File { .. } => vec![
                "Check the file exists and is readable",
                "Check file permissions",
            ],
            PitboxError::Parse { .. } => vec![
                "Check the metadata file is valid JSON or INI",
                "Reinstall the affected car or track",
            ],
            PitboxError::UnsupportedPlatform { .. } => vec![
                "Use platform-appropriate features",
                "Content discovery works on every platform; live telemetry needs Windows",
            ],
            #[cfg(windows)]
            PitboxError::WindowsApi { .. } => vec![
                "Check Windows API permissions",
                "Verify the simulator is running under the same user",
            ],
            PitboxError::InstallationNotDetected => vec![
                "Install Assetto Corsa or point pitbox at its folders",
                "Launch the simulator once so it creates its documents folder",
            ],
            PitboxError::InvalidInstallation { .. } => vec![
                "Check both the documents folder and the game folder exist",
                "Refresh detection after moving the installation",
            ],
            PitboxError::SetupsNotWritable { .. } => vec![
                "Check permissions on the setups folder",
                "Disable folder protection for the documents folder",
            ],
            PitboxError::SetupDirectory { .. } => vec![
                "Check permissions on the setups folder",
                "Ensure sufficient disk space",
            ],
            PitboxError::InvalidIdentifier { .. } => vec![
                "Use the car or track folder name as listed by the catalog",
                "Remove path separators and '..' from the name",
            ],
            PitboxError::SetupExists { .. } => vec![
                "Choose another file name",
                "Back up the existing setup, then save with overwrite enabled",
            ],
            PitboxError::SetupNotFound { .. } => vec![
                "List the setups again; the file may have been removed",
            ],
        }
    }

    /// Helper constructor for file errors with path context.
    pub fn file_error(path: PathBuf, source: std::io::Error) -> Self {
        PitboxError::File { path, source }
    }

    /// Helper constructor for connection errors.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        PitboxError::Connection { reason: reason.into(), source: None }
    }

    /// Helper constructor for connection errors with source.
    pub fn connection_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        PitboxError::Connection { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for short page buffers.
    pub fn short_buffer(layout: &'static str, expected: usize, actual: usize) -> Self {
        PitboxError::Decode { layout, expected, actual }
    }

    /// Helper constructor for rejected car, track or file names.
    pub fn invalid_identifier(id: impl Into<String>) -> Self {
        PitboxError::InvalidIdentifier { id: id.into() }
    }

    /// Helper constructor for metadata parse failures.
    pub fn parse_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        PitboxError::Parse { context: context.into(), details: details.into() }
    }

    /// Helper constructor for Windows API errors.
    #[cfg(windows)]
    pub fn windows_api_error(operation: impl Into<String>, source: core::Error) -> Self {
        PitboxError::WindowsApi { operation: operation.into(), source }
    }

    /// Helper constructor for unsupported platform errors.
    pub fn unsupported_platform(
        feature: impl Into<String>,
        required_platform: impl Into<String>,
    ) -> Self {
        PitboxError::UnsupportedPlatform {
            feature: feature.into(),
            required_platform: required_platform.into(),
        }
    }
}

impl From<std::io::Error> for PitboxError {
    fn from(err: std::io::Error) -> Self {
        PitboxError::File { path: PathBuf::from("<unknown>"), source: err }
    }
}

#[cfg(windows)]
impl From<core::Error> for PitboxError {
    fn from(err: core::Error) -> Self {
        PitboxError::WindowsApi {
            operation: "Unknown Windows operation".to_string(),
            source: err,
        }
    }
}
