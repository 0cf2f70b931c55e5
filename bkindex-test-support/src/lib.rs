//! Shared test utilities used across bkindex crates.

pub mod property_profile;
pub mod tracing;
