//! Fuzz target for layout and metric name parsing.

#![no_main]

use libfuzzer_sys::fuzz_target;
use txr_common::MatrixLayout;
use txr_core::metrics::MetricName;

fuzz_target!(|data: &str| {
    if let Ok(layout) = data.parse::<MatrixLayout>() {
        assert_eq!(layout.token(), data.trim());
    }
    let _ = data.parse::<MetricName>();
});
