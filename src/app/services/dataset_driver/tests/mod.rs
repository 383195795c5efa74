//! Test utilities for dataset driver testing

use crate::app::services::dcl_full_parser::tests::{block_header, dcl, frame_line, log_content};

mod handler_tests;

/// Two blocks: the first with three light frames, the second with one
pub fn two_block_log() -> String {
    let mut lines = block_header("2013/04/24 00:00");
    lines.push(frame_line("2013/04/24 00:00:08.282", "NDF", 0));
    lines.push(frame_line("2013/04/24 00:00:09.382", "NLF", 1));
    lines.push(frame_line("2013/04/24 00:00:10.482", "NLF", 2));
    lines.push(frame_line("2013/04/24 00:00:11.582", "NLF", 3));
    lines.extend(block_header("2013/04/24 01:00"));
    lines.push(frame_line("2013/04/24 01:00:08.282", "NDF", 4));
    lines.push(frame_line("2013/04/24 01:00:09.382", "NLF", 5));
    log_content(&lines)
}

/// One block with a bad frame type between two light frames
pub fn log_with_bad_frame() -> String {
    let mut lines = block_header("2013/04/24 00:00");
    lines.push(frame_line("2013/04/24 00:00:08.282", "NDF", 0));
    lines.push(frame_line("2013/04/24 00:00:09.382", "NLF", 1));
    lines.push(frame_line("2013/04/24 00:00:10.482", "NXF", 2));
    lines.push(frame_line("2013/04/24 00:00:11.582", "NLF", 3));
    lines.push(dcl("2013/04/24 00:00:12.000", "[nutnr:DLOGP6]:Instrument stopped"));
    log_content(&lines)
}
