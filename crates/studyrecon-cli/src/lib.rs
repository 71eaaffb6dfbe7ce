//! CLI library components for the study reconciler.

pub mod logging;
pub mod pipeline;
