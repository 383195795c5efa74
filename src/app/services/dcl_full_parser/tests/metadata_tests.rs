//! Tests for block header assembly

use crate::app::services::dcl_full_parser::classifier::{DclStamp, MetadataRecord};
use crate::app::services::dcl_full_parser::metadata::MetadataBuilder;
use chrono::NaiveDateTime;

fn stamp(text: &str) -> DclStamp<'_> {
    DclStamp {
        text,
        time: NaiveDateTime::parse_from_str(text, "%Y/%m/%d %H:%M:%S%.3f").unwrap(),
    }
}

fn complete_builder() -> MetadataBuilder {
    let mut builder = MetadataBuilder::started(&stamp("2013/04/24 00:00:45.002"));
    builder.record(
        MetadataRecord::Firmware {
            version: "2.9.6".to_string(),
            date: "Jun  4 2012 08:47:31".to_string(),
        },
        &stamp("2013/04/24 00:00:45.053"),
    );
    builder.record(MetadataRecord::SpectrometerOn, &stamp("2013/04/24 00:00:45.099"));
    builder.record(MetadataRecord::SpectrometerPowered, &stamp("2013/04/24 00:00:50.111"));
    builder.record(MetadataRecord::LampOn, &stamp("2013/04/24 00:00:50.142"));
    builder.record(MetadataRecord::LampPowered, &stamp("2013/04/24 00:00:51.166"));
    builder.record(
        MetadataRecord::DataLogFile("DATA\\SCH13114.DAT".to_string()),
        &stamp("2013/04/24 00:00:51.184"),
    );
    builder
}

#[test]
fn test_complete_header_builds() {
    let builder = complete_builder();
    assert!(builder.is_complete());

    let metadata = builder.build().unwrap();
    assert_eq!(metadata.dcl_controller_start_timestamp, "2013/04/24 00:00:45.002");
    assert_eq!(metadata.firmware_version, "2.9.6");
    assert_eq!(metadata.data_log_file, "DATA\\SCH13114.DAT");
    assert_eq!(
        metadata.spec_powered_time,
        stamp("2013/04/24 00:00:50.111").time
    );
}

#[test]
fn test_header_without_start_is_incomplete() {
    let mut builder = MetadataBuilder::default();
    builder.record(MetadataRecord::LampOn, &stamp("2013/04/24 00:00:50.142"));

    assert!(!builder.is_complete());
    assert!(builder.missing_fields().contains(&"startup_time"));
    assert!(builder.build().is_none());
}

#[test]
fn test_missing_fields_are_named() {
    let mut builder = MetadataBuilder::started(&stamp("2013/04/24 00:00:45.002"));
    builder.record(MetadataRecord::SpectrometerOn, &stamp("2013/04/24 00:00:45.099"));

    assert_eq!(
        builder.missing_fields(),
        vec![
            "firmware_version",
            "spec_powered_time",
            "lamp_on_time",
            "lamp_powered_time",
            "nutnr_data_log_file",
        ]
    );
}
