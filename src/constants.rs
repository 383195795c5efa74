//! Application constants for NUTNR processor
//!
//! This module contains the DCL log format markers, frame layout, stream names
//! and default values used throughout the NUTNR processor application.

// =============================================================================
// DCL Log Format
// =============================================================================

/// DCL controller timestamp format prefixing every log line
pub const DCL_TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S%.3f";

/// Status message marking the start of a new instrument block
pub const INSTRUMENT_STARTED_MESSAGE: &str = "Instrument started";

/// File name suffix of NUTNR-B DCL full-frame logs
pub const DCL_FULL_LOG_SUFFIX: &str = ".nutnr_b_dcl_full.log";

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch
pub const NTP_UNIX_EPOCH_OFFSET_SECS: f64 = 2_208_988_800.0;

// =============================================================================
// Instrument Frame Layout
// =============================================================================

/// Fixed prefix of every full ASCII instrument frame header
pub const FRAME_HEADER_PREFIX: &str = "SAT";

/// Frame type of a dark (no light) full frame
pub const DARK_FRAME_TYPE: &str = "NDF";

/// Frame type of a light full frame
pub const LIGHT_FRAME_TYPE: &str = "NLF";

/// Number of spectrometer channels carried by a full frame
pub const SPECTRAL_CHANNEL_COUNT: usize = 256;

/// Scalar fields between the time of sample and the spectral channels
pub const SCALAR_FIELD_NAMES: &[&str] = &[
    "nitrate_concentration",
    "aux_fitting_1",
    "aux_fitting_2",
    "aux_fitting_3",
    "rms_error",
    "temp_interior",
    "temp_spectrometer",
    "temp_lamp",
    "lamp_time",
    "humidity",
    "voltage_lamp",
    "voltage_analog",
    "voltage_main",
    "ref_channel_average",
    "ref_channel_variance",
    "sea_water_dark",
    "spec_channel_average",
];

/// Index of the only integer-valued scalar field
pub const LAMP_TIME_SCALAR_INDEX: usize = 8;

/// Total comma separated fields in a full frame:
/// header, date, time, scalars, spectral channels, checksum
pub const FULL_FRAME_FIELD_COUNT: usize = 3 + 17 + SPECTRAL_CHANNEL_COUNT + 1;

/// Largest value a spectral channel count may take
pub const MAX_SPECTRAL_COUNT: u32 = 65_535;

// =============================================================================
// Particle Stream Names
// =============================================================================

/// Downstream stream identifiers
pub mod streams {
    pub const INSTRUMENT: &str = "nutnr_b_dcl_full_instrument";
    pub const INSTRUMENT_RECOVERED: &str = "nutnr_b_dcl_full_instrument_recovered";
    pub const DARK_INSTRUMENT: &str = "nutnr_b_dcl_dark_full_instrument";
    pub const DARK_INSTRUMENT_RECOVERED: &str = "nutnr_b_dcl_dark_full_instrument_recovered";
    pub const METADATA: &str = "nutnr_b_dcl_full_metadata";
    pub const METADATA_RECOVERED: &str = "nutnr_b_dcl_full_metadata_recovered";
}

// =============================================================================
// Driver Defaults
// =============================================================================

/// Version stamped on the dataset drivers
pub const DRIVER_VERSION: &str = "15.6.1";

/// Units of work pulled from a parser per driver iteration
pub const DEFAULT_BATCH_SIZE: usize = 64;

/// Log level used when neither the config nor the CLI picks one
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "NUTNR_";
