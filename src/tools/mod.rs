//! Batch jobs for lingoscan
//!
//! Each tool corresponds to a CLI command.

mod batch;
mod json;
mod scan;

pub use batch::*;
pub use scan::*;
