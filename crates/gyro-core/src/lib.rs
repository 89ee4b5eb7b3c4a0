//! gyro-core: Shared amounts, types, errors, and configuration
//!
//! This crate provides the foundational types used across the Gyro SDK workspace.

pub mod amount;
pub mod config;
pub mod conversions;
pub mod errors;
pub mod types;

pub use amount::*;
pub use config::*;
pub use errors::*;
pub use types::*;
