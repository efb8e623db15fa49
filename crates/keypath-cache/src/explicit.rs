//! Build a buffer from an explicit subscript list
//!
//! Used when the caller already holds the flat list of subscripts instead of
//! a node chain. Two entry points:
//!
//! - [`from_subscripts`]: typed, for Rust callers
//! - [`from_values`]: host boundary, `(varname, table [, table | string...])`
//!
//! The host form never stringifies numbers. A subscript string created here
//! would be owned by nobody but the buffer, which would silently disconnect
//! the key from whatever the caller retains.

use bytes::Bytes;
use keypath_core::{CacheConfig, Error, Result, Value};

use crate::buffer::KeyPathBuffer;

/// Build a buffer of `primary` followed by `extra`.
///
/// The result has length `primary.len() + extra.len()` and that many slots
/// plus the configured headroom.
pub fn from_subscripts(
    config: &CacheConfig,
    varname: Bytes,
    primary: &[Bytes],
    extra: &[Bytes],
) -> Result<KeyPathBuffer> {
    let depth = primary.len() + extra.len();
    config.check_depth(depth)?;

    let mut buffer = KeyPathBuffer::allocate(config, Some(varname), depth);
    for subscript in primary.iter().chain(extra) {
        buffer.push(subscript.clone());
    }
    Ok(buffer)
}

/// Build a buffer from host arguments.
///
/// - `args[0]`: varname string
/// - `args[1]`: table of subscript strings
/// - `args[2]`, optional: a second table, or the first of a trailing list of
///   subscript strings
///
/// Parameter positions in errors are 1-based, as the host sees them.
pub fn from_values(config: &CacheConfig, args: &[Value]) -> Result<KeyPathBuffer> {
    let varname = match args.first() {
        Some(Value::String(s)) => s.clone(),
        other => {
            return Err(Error::input_type(
                "parameter #1",
                "a string",
                other.unwrap_or(&Value::Null),
            ))
        }
    };
    let primary = match args.get(1) {
        Some(Value::Table(items)) => items.as_slice(),
        other => {
            return Err(Error::input_type(
                "parameter #2",
                "a table",
                other.unwrap_or(&Value::Null),
            ))
        }
    };

    // (parameter number, elements, elements are table members)
    let extra: Option<(usize, &[Value], bool)> = match args.get(2) {
        None => None,
        Some(Value::Table(items)) => {
            if let Some(surplus) = args.get(3) {
                return Err(Error::input_type(
                    "parameter #4",
                    "absent when parameter #3 is a table",
                    surplus,
                ));
            }
            Some((3, items.as_slice(), true))
        }
        Some(Value::String(_)) => Some((3, &args[2..], false)),
        Some(other) => {
            return Err(Error::input_type(
                "parameter #3",
                "a table or a list of strings",
                other,
            ))
        }
    };

    let depth = primary.len() + extra.map_or(0, |(_, items, _)| items.len());
    config.check_depth(depth)?;

    let mut buffer = KeyPathBuffer::allocate(config, Some(varname), depth);
    push_strings(&mut buffer, 2, primary, true)?;
    if let Some((param, items, in_table)) = extra {
        push_strings(&mut buffer, param, items, in_table)?;
    }
    Ok(buffer)
}

fn push_strings(
    buffer: &mut KeyPathBuffer,
    param: usize,
    items: &[Value],
    in_table: bool,
) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => buffer.push(s.clone()),
            other => {
                let position = if in_table {
                    format!("parameter #{}, table element {}", param, i + 1)
                } else {
                    format!("parameter #{}", param + i)
                };
                return Err(Error::input_type(position, "a string", other));
            }
        }
    }
    Ok(())
}
