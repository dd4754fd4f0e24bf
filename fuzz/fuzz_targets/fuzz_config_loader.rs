#![no_main]

use std::path::Path;

use libfuzzer_sys::fuzz_target;
use reconify::config::{ConfigLoader, resolve, validate};

fuzz_target!(|data: &[u8]| {
    // Convert bytes to string, ignoring invalid UTF-8
    if let Ok(yaml_str) = std::str::from_utf8(data) {
        let loader = ConfigLoader::with_defaults();

        // Loading may fail; validation and resolution must never panic and
        // must agree on whether the document is usable.
        if let Ok(config) = loader.load_from_str(yaml_str, Path::new("fuzz.yaml")) {
            let errors = validate(&config);
            assert_eq!(errors.is_empty(), resolve(&config).is_ok());
        }
    }
});
