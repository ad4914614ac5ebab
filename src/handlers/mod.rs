//! HTTP handlers

pub mod diagnostics;
pub mod health;
pub mod home;
pub mod recent;
pub mod scan;
pub mod stats;
