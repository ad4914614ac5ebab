//! Data models

pub mod scan;

pub use scan::*;
