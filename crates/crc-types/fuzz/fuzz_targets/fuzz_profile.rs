#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Profile files come from disk as-is; parsing must reject, never panic
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(profile) = crc_types::Profile::from_json_str(s)
    {
        let _ = profile.display_name();
        let _ = profile.summary();
    }
});
