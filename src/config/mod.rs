//! Layered JSON job configuration.

pub mod merge;
pub mod options;
