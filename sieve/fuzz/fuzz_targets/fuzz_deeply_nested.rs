#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve::Engine;

fuzz_target!(|input: (u8, u8)| {
    let engine = Engine::new();
    let (depth, negations) = input;

    let mut expr = String::from("x > 1");
    for _ in 0..depth {
        expr = format!("({} && true)", expr);
    }
    expr = format!("{}{}", "!".repeat(negations as usize), expr);

    let parameters = [("x".to_string(), sieve::Value::from(2))].into_iter().collect();
    let _ = engine.evaluate_expression(&expr, &parameters);
});
