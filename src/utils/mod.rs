//! Shared utilities: Arrow column extraction, statistics helpers,
//! logging conventions and synthetic dataset generation.

pub mod arrow;
pub mod logging;
pub mod stats;
pub mod synthetic;
