//! Fuzz target for the rank comparator, NaN and infinities included.

#![no_main]

use libfuzzer_sys::fuzz_target;
use txr_core::rank::probability_greater_equal;

fuzz_target!(|data: (Vec<f64>, Vec<f64>)| {
    if let Ok(p) = probability_greater_equal(&data.0, &data.1) {
        assert!((0.0..=1.0).contains(&p));
    }
});
