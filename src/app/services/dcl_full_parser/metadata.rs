//! Block header assembly
//!
//! The instrument prints its console header one message per line after the DCL
//! reports `Instrument started`. The builder collects those messages; a
//! metadata record exists only once every field has been seen.

use chrono::NaiveDateTime;

use super::classifier::{DclStamp, MetadataRecord};

/// Complete header of one data block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMetadata {
    pub dcl_controller_start_timestamp: String,
    pub startup_time: NaiveDateTime,
    pub firmware_version: String,
    pub firmware_date: String,
    pub spec_on_time: NaiveDateTime,
    pub spec_powered_time: NaiveDateTime,
    pub lamp_on_time: NaiveDateTime,
    pub lamp_powered_time: NaiveDateTime,
    pub data_log_file: String,
}

/// Builder for block metadata extraction
#[derive(Debug, Clone, Default)]
pub struct MetadataBuilder {
    start: Option<(String, NaiveDateTime)>,
    firmware: Option<(String, String)>,
    spec_on_time: Option<NaiveDateTime>,
    spec_powered_time: Option<NaiveDateTime>,
    lamp_on_time: Option<NaiveDateTime>,
    lamp_powered_time: Option<NaiveDateTime>,
    data_log_file: Option<String>,
}

impl MetadataBuilder {
    /// Start collecting a new header at the `Instrument started` message
    pub fn started(stamp: &DclStamp<'_>) -> Self {
        Self {
            start: Some((stamp.text.to_string(), stamp.time)),
            ..Self::default()
        }
    }

    /// Record one console message; a repeated message replaces the earlier one
    pub fn record(&mut self, record: MetadataRecord, stamp: &DclStamp<'_>) {
        match record {
            MetadataRecord::Firmware { version, date } => self.firmware = Some((version, date)),
            MetadataRecord::SpectrometerOn => self.spec_on_time = Some(stamp.time),
            MetadataRecord::SpectrometerPowered => self.spec_powered_time = Some(stamp.time),
            MetadataRecord::LampOn => self.lamp_on_time = Some(stamp.time),
            MetadataRecord::LampPowered => self.lamp_powered_time = Some(stamp.time),
            MetadataRecord::DataLogFile(name) => self.data_log_file = Some(name),
        }
    }

    /// Names of the fields still missing
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.start.is_none() {
            missing.push("startup_time");
        }
        if self.firmware.is_none() {
            missing.push("firmware_version");
        }
        if self.spec_on_time.is_none() {
            missing.push("spec_on_time");
        }
        if self.spec_powered_time.is_none() {
            missing.push("spec_powered_time");
        }
        if self.lamp_on_time.is_none() {
            missing.push("lamp_on_time");
        }
        if self.lamp_powered_time.is_none() {
            missing.push("lamp_powered_time");
        }
        if self.data_log_file.is_none() {
            missing.push("nutnr_data_log_file");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Finish the header, or `None` if any field never arrived
    pub fn build(self) -> Option<BlockMetadata> {
        let (dcl_controller_start_timestamp, startup_time) = self.start?;
        let (firmware_version, firmware_date) = self.firmware?;

        Some(BlockMetadata {
            dcl_controller_start_timestamp,
            startup_time,
            firmware_version,
            firmware_date,
            spec_on_time: self.spec_on_time?,
            spec_powered_time: self.spec_powered_time?,
            lamp_on_time: self.lamp_on_time?,
            lamp_powered_time: self.lamp_powered_time?,
            data_log_file: self.data_log_file?,
        })
    }
}
