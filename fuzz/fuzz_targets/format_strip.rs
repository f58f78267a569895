//! Fuzz target for mIRC format stripping
//!
//! Verifies the color/format scanner never panics and stays idempotent
//! on arbitrary display text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use slirc_client::FormattedStringExt;
use std::str;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = str::from_utf8(data) {
        if input.len() > 4096 {
            return;
        }

        let once = input.strip_format().into_owned();
        let twice = once.strip_format().into_owned();
        assert_eq!(once, twice);

        let _ = input.strip_colors();
        let _ = input.is_formatted();
    }
});
