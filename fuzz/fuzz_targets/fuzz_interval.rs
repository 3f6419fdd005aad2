//! Fuzz target for the interval estimator.
//!
//! Any combination of rates, counts and alpha yields either an error or an
//! ordered interval inside [0, 1].

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use txr_core::interval::{confidence_interval_txr, SampleCounts};

#[derive(Debug, Arbitrary)]
struct Input {
    tpr: f64,
    tnr: f64,
    alpha: f64,
    n_pos: Option<u16>,
    n_neg: Option<u16>,
    prevalence: Option<f64>,
    n_total: Option<u16>,
}

fuzz_target!(|input: Input| {
    let Ok(counts) = SampleCounts::resolve(
        input.n_pos.map(u64::from),
        input.n_neg.map(u64::from),
        input.prevalence,
        input.n_total.map(u64::from),
    ) else {
        return;
    };
    if let Ok(ci) = confidence_interval_txr(input.tpr, input.tnr, counts, input.alpha) {
        for iv in [ci.tpr, ci.tnr] {
            assert!(0.0 <= iv.lower && iv.lower <= iv.upper && iv.upper <= 1.0);
        }
    }
});
