//! Pseudo filesystem mounting
//!
//! Boot code calls these on every start; a target that is already a
//! mountpoint is left alone.

pub mod guard;

// Re-export commonly used items
pub use guard::*;
