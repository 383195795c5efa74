//! NUTNR Processor Library
//!
//! A Rust library for ingesting OOI nitrate sensor (NUTNR-B / ISUS) logs captured
//! by a data concentrator logger (DCL) and decoding them into typed particles.
//!
//! This library provides tools for:
//! - Classifying DCL log lines into status, metadata and instrument frames
//! - Validating full ASCII light (NLF) and dark (NDF) frames field by field
//! - Building instrument, dark-instrument and metadata particles for the
//!   recovered and telemetered delivery modes
//! - Reporting malformed frames as recoverable exceptions without aborting a parse
//! - Driving a parser over one file and handing particles to a downstream consumer

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod dataset_driver;
        pub mod dcl_full_parser;
        pub mod exception_sink;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{DataMode, ParseOutcome, Particle, ParticleKind, ParticleType, ParticleValue};
pub use app::services::dcl_full_parser::{DclFullParser, RecoverableParseError};
pub use config::Config;

/// Result type alias for the NUTNR processor
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal error types for NUTNR processing operations
///
/// Malformed log content never surfaces here; it is reported per frame as a
/// [`RecoverableParseError`] and parsing continues.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Configuration file could not be parsed
    #[error("Configuration file error in '{file}': {source}")]
    ConfigFile {
        file: String,
        #[source]
        source: toml::de::Error,
    },

    /// Particle serialization error
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Invalid input glob pattern
    #[error("Invalid input pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a configuration file error
    pub fn config_file(file: impl Into<String>, source: toml::de::Error) -> Self {
        Self::ConfigFile {
            file: file.into(),
            source,
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create an invalid pattern error
    pub fn pattern(pattern: impl Into<String>, source: glob::PatternError) -> Self {
        Self::Pattern {
            pattern: pattern.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "Particle serialization failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
