//! Key-path buffer cache
//!
//! A [`KeyPathBuffer`] holds a variable name and a run of subscript views in
//! the shape the low-level key-value calls expect. This crate builds them:
//!
//! - [`explicit`]: from a flat subscript list supplied by the caller
//! - [`recursive`]: from a chain of logical nodes, sharing one physical
//!   buffer between ancestors and descendants where no slot is contested
//! - [`append`]: extend an existing key by more subscripts
//! - [`replace`]: overwrite one slot in place for cheap iteration
//! - [`stringify`]: render a key for diagnostics in zwrite form
//!
//! Subscripts are [`bytes::Bytes`] views. Building or sharing a buffer bumps
//! reference counts; the subscript bytes themselves are never copied.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod append;
pub mod buffer;
pub mod explicit;
pub mod recursive;
pub mod replace;
pub mod stringify;

pub use append::append;
pub use buffer::{can_share, BufferHandle, KeyPathBuffer, KeyRef};
pub use explicit::{from_subscripts, from_values};
pub use recursive::{build, KeyNode, Parent};
pub use replace::{replace, replace_subscript};
pub use stringify::{display, is_canonical_integer, stringify, zwrite};
