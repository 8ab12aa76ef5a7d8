//! # cudakit-core
//!
//! Core library for the cudakit CLI providing:
//! - The error taxonomy shared by every pipeline stage
//! - Data model types (requests, resolved toolkits, cache keys, command plans)
//! - Host platform detection
//! - The per-platform host strategy (command construction, artifact naming)

pub mod error;
pub mod platform;
pub mod strategy;
pub mod types;

pub use error::{Error, Result};
pub use platform::PlatformProfile;
pub use strategy::{strategy_for, HostStrategy};
