#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve::{serializers, Engine};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(document) = serializers::parse_batch(s) {
            let engine = Engine::new();
            let count = document.expressions.len();
            let results = engine.evaluate(document.expressions, &document.parameters);
            assert!(results.len() <= count);
        }
    }
});
