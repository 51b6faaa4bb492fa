#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve::Engine;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let engine = Engine::new();
        if let Ok(expression) = engine.compile(s) {
            // The canonical form must compile to the same tree
            let again = engine.compile(&expression.to_string());
            assert_eq!(again.as_ref(), Ok(&expression));
        }
    }
});
