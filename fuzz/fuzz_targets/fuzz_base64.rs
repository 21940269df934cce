//! Fuzz target for base64 decoding.
//!
//! Tests that atob rejects malformed input with an error instead of
//! panicking, and that anything it accepts encodes back to the same bytes.

#![no_main]

use lexcolor::{atob, btoa};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    if let Ok(binary) = atob(data) {
        let encoded = btoa(&binary).expect("atob output is latin-1");
        let again = atob(&encoded).expect("btoa output decodes");
        assert_eq!(again, binary);
    }

    // Wide chars must be refused, never truncated.
    let _ = btoa(data);
});
