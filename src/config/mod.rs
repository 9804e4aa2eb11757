//! Configuration and shared types
//!
//! Closed enums, descriptors and the error type used by every primitive,
//! plus the device locations handed in by the caller.

pub mod paths;
pub mod types;
