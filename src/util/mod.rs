//! Utility modules: setting normalization, timeouts.

pub mod normalize;
pub mod timeout;
