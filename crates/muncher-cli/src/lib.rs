//! CLI library components for the procedure spreadsheet muncher.

pub mod logging;
pub mod sink;
pub mod source;
