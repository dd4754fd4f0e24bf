#![no_main]

use libfuzzer_sys::fuzz_target;
use reconify::config::DateWindow;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        // Accepted windows must round-trip through their display form.
        if let Ok(window) = text.parse::<DateWindow>() {
            assert_eq!(window.to_string().parse::<DateWindow>(), Ok(window));
        }
    }
});
