//! TXR math utilities.

pub mod math;

pub use math::beta::*;
pub use math::proportion::{clopper_pearson, ProportionInterval};
pub use math::stable::*;
