//! sysprim: boot-time system primitives for an init process
//!
//! # Architecture
//!
//! The crate is organized by Linux kernel primitive families:
//!
//! ## Kernel Primitives ([`kernel`])
//! - [`kernel::signal`]: Process-group signal delivery
//! - [`kernel::console`]: Standard descriptor wiring and terminal reset
//! - [`kernel::mount`]: Guarded, idempotent pseudo filesystem mounts
//! - [`kernel::device`]: Device node materialization and verification
//!
//! ## Configuration ([`config`])
//! - [`config::types`]: Shared type definitions, closed enums and errors
//! - [`config::paths`]: Console and null device locations
//!
//! # Error policy
//!
//! Every primitive returns [`Result`] and propagates the OS error, except
//! device materialization which is best-effort: it logs and returns `()`.
//!
//! None of these primitives decide *when* to run. They hold no state
//! between calls and operate directly on process and filesystem state
//! owned by the kernel.

// Configuration & shared types
pub mod config;

// Kernel Primitives
pub mod kernel;

pub use config::paths::SystemPaths;
pub use config::types::*;
pub use kernel::console::setup_console;
pub use kernel::device::{ensure_device, materialize_device, verify_device};
pub use kernel::mount::mount_once;
pub use kernel::signal::kill_group;
