//! Fuzz target for inbound line parsing
//!
//! Feeds randomly generated input to the line parser and the hostmask
//! splitter, ensuring neither ever panics on server-controlled text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::str;

fuzz_target!(|data: &[u8]| {
    // Only fuzz valid UTF-8 strings to focus on protocol-level issues
    if let Ok(input) = str::from_utf8(data) {
        if input.is_empty() || input.len() > 8192 {
            return;
        }

        // Line splitting - should never panic
        if let Ok(line) = slirc_client::Line::parse(input) {
            // Prefix classification - should never panic either
            if let Some(prefix) = line.prefix {
                let _ = slirc_client::HostMask::parse(prefix);
            }
            let _ = line.numeric();
        }
    }
});
