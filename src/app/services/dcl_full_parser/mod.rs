//! Parser for NUTNR-B DCL full-frame logs
//!
//! A DCL log wraps the instrument's serial output, prefixing every line with the
//! logger's own timestamp. Between the logger's status messages the instrument
//! prints a short console header (firmware, power-up steps, log file name)
//! followed by full ASCII frames: one dark (NDF) frame and then light (NLF)
//! frames for each data block.
//!
//! ## Architecture
//!
//! - [`classifier`] - Splits a line into its DCL timestamp and payload and tags it
//! - [`field_parsers`] - Typed parsing of individual frame fields
//! - [`validator`] - Field count and syntax checks for instrument frames
//! - [`metadata`] - Assembly of the block header into one metadata record
//! - [`particle_builder`] - Mapping of validated content to particles
//! - [`parser`] - The pull loop tying the above together
//! - [`stats`] - Scan statistics
//!
//! ## Usage
//!
//! ```rust
//! use nutnr_processor::app::services::dcl_full_parser::DclFullParser;
//! use nutnr_processor::app::services::exception_sink::ExceptionRecorder;
//!
//! # fn example() -> nutnr_processor::Result<()> {
//! let log = "2013/04/24 00:00:11.052 [nutnr:DLOGP6]:Idle state, without initialize\n";
//! let mut exceptions = ExceptionRecorder::new();
//! let mut parser = DclFullParser::recovered(log.as_bytes(), &mut exceptions);
//! let particles = parser.get_records(10)?;
//! assert!(particles.is_empty());
//! # drop(parser);
//! assert_eq!(exceptions.count(), 0);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod error;
pub mod field_parsers;
pub mod metadata;
pub mod parser;
pub mod particle_builder;
pub mod stats;
pub mod validator;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use classifier::{Frame, InstrumentFrame, InstrumentFrameType, classify_line};
pub use error::RecoverableParseError;
pub use parser::{DclFullParser, ParserConfig};
pub use stats::ScanStats;
pub use validator::ValidatedFrame;
