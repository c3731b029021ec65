//! Type definitions and aliases
//!
//! This module contains type aliases for commonly used complex types.

mod aliases;

pub use aliases::*;
