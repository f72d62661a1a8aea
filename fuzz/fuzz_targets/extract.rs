#![no_main]

use libfuzzer_sys::fuzz_target;
use sqltrail_core::extract_lineage;

fuzz_target!(|data: &[u8]| {
    if let Ok(sql) = std::str::from_utf8(data) {
        // The engine must degrade on arbitrary input, never panic; the
        // only allowed error is InvalidInput for blank text.
        let _ = extract_lineage(sql);
    }
});
