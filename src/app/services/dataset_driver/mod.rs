//! Dataset drivers for NUTNR-B DCL full-frame logs
//!
//! A driver opens one log file, builds a parser for its delivery mode and
//! streams the decoded particles to a [`ParticleDataHandler`] in one shot.
//!
//! - [`handler`] - The downstream consumer interface, an in-memory collector
//!   and a JSON lines writer
//! - [`driver`] - The generic driver loop
//! - [`nutnr_b_dcl_full`] - Recovered and telemetered entry points
//!
//! ```rust,no_run
//! use nutnr_processor::app::services::dataset_driver::{
//!     DriverContext, ParticleCollector, parse_recovered,
//! };
//! use std::path::Path;
//!
//! # fn example() -> nutnr_processor::Result<()> {
//! let collector = parse_recovered(
//!     &DriverContext::default(),
//!     Path::new("20130424.nutnr_b_dcl_full.log"),
//!     ParticleCollector::new(),
//! )?;
//! println!("{} particles", collector.particles().len());
//! # Ok(())
//! # }
//! ```

pub mod driver;
pub mod handler;
pub mod nutnr_b_dcl_full;

#[cfg(test)]
mod tests;

pub use driver::{DriverContext, SimpleDatasetDriver};
pub use handler::{JsonLinesWriter, ParticleCollector, ParticleDataHandler};
pub use crate::constants::DRIVER_VERSION;
pub use nutnr_b_dcl_full::{parse_file, parse_recovered, parse_telemetered};
