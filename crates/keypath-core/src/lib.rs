//! Core types for keypath
//!
//! This crate defines the pieces shared by every other keypath crate:
//! - [`Error`]: the error taxonomy raised by builders, mutators and stores
//! - [`Value`]: the dynamically typed host value seen at the scripting boundary
//! - [`CacheConfig`]: over-allocation and depth limits, loadable from TOML

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod value;

pub use config::CacheConfig;
pub use error::{Error, Result};
pub use value::Value;

/// Maximum number of subscripts in an M key.
pub const MAX_SUBSCRIPTS: usize = 31;
