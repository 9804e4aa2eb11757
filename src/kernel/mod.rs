//! Thin wrappers around Linux kernel primitives.
//!
//! All `unsafe` code is concentrated here with explicit SAFETY comments.
//! The families are independent of each other and hold no state.

pub mod console;
pub mod device;
pub mod mount;
pub mod signal;
