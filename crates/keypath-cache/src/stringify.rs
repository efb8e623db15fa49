//! Render buffers as text
//!
//! Subscripts are joined with `,`. A subscript that reads back as the same
//! integer it spells (`42`, `-7`) is written bare; anything else is quoted
//! in M zwrite form:
//!
//! | Input bytes      | Rendered            |
//! |------------------|---------------------|
//! | `USA`            | `"USA"`             |
//! | `042`            | `"042"`             |
//! | `say "hi"`       | `"say ""hi"""`      |
//! | `a\nb`           | `"a"_$C(10)_"b"`    |
//! | `\x01\x02`       | `$C(1,2)`           |
//! | `\xff` (invalid) | `$ZCH(255)`         |

use bytes::Bytes;
use keypath_core::{Error, Result};

use crate::buffer::KeyPathBuffer;

/// Render the first `depth` subscripts (all by default) and return them with
/// the varname.
///
/// Depth 0 yields an empty string. Fails with `IndexRange` if `depth` is
/// negative or larger than the buffer's length.
pub fn stringify(buffer: &KeyPathBuffer, depth: Option<i64>) -> Result<(String, Option<Bytes>)> {
    let depth = checked_depth(buffer, depth)?;
    let mut out = String::new();
    write_subscripts(&mut out, &buffer.subscripts()[..depth]);
    Ok((out, buffer.varname().cloned()))
}

/// Render as a full key, e.g. `^Population("USA",17900802)`.
///
/// At depth 0 only the varname is written.
pub fn display(buffer: &KeyPathBuffer, depth: Option<i64>) -> Result<String> {
    let depth = checked_depth(buffer, depth)?;
    let mut out = match buffer.varname() {
        Some(name) => String::from_utf8_lossy(name).into_owned(),
        None => String::new(),
    };
    if depth > 0 {
        out.push('(');
        write_subscripts(&mut out, &buffer.subscripts()[..depth]);
        out.push(')');
    }
    Ok(out)
}

fn checked_depth(buffer: &KeyPathBuffer, depth: Option<i64>) -> Result<usize> {
    let len = buffer.len();
    match depth {
        None => Ok(len),
        Some(d) if d < 0 || d as u64 > len as u64 => Err(Error::index_range(d, 0, len)),
        Some(d) => Ok(d as usize),
    }
}

fn write_subscripts(out: &mut String, subscripts: &[Bytes]) {
    for (i, subscript) in subscripts.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        if is_canonical_integer(subscript) {
            // canonical integers are ASCII digits with an optional '-'
            out.push_str(&String::from_utf8_lossy(subscript));
        } else {
            zwrite(subscript, out);
        }
    }
}

/// Returns true if `s` parses as a 64-bit integer whose decimal rendering
/// is exactly `s`.
///
/// `"42"` and `"-7"` qualify; `"042"`, `"+5"`, `"-0"`, `"1.0"` and `" 1"`
/// do not.
pub fn is_canonical_integer(s: &[u8]) -> bool {
    let Ok(text) = std::str::from_utf8(s) else {
        return false;
    };
    text.parse::<i64>().map_or(false, |n| n.to_string() == text)
}

/// Append the zwrite quoting of `s` to `out`.
pub fn zwrite(s: &[u8], out: &mut String) {
    if s.is_empty() {
        out.push_str("\"\"");
        return;
    }
    let mut writer = ZwrWriter {
        out,
        open: None,
        started: false,
    };
    let mut rest = s;
    while !rest.is_empty() {
        let (valid, invalid) = match std::str::from_utf8(rest) {
            Ok(text) => (text, &rest[rest.len()..]),
            Err(e) => {
                let (good, bad) = rest.split_at(e.valid_up_to());
                let bad_len = e.error_len().unwrap_or(bad.len());
                // `good` was just validated
                let text = std::str::from_utf8(good).unwrap_or_default();
                (text, &bad[..bad_len])
            }
        };
        for ch in valid.chars() {
            if ch.is_control() {
                writer.code(Run::Char, ch as u32);
            } else {
                writer.text(ch);
            }
        }
        for &byte in invalid {
            writer.code(Run::Byte, u32::from(byte));
        }
        rest = &rest[valid.len() + invalid.len()..];
    }
    writer.close();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Run {
    Text,
    /// `$C(...)` control characters
    Char,
    /// `$ZCH(...)` bytes outside valid UTF-8
    Byte,
}

struct ZwrWriter<'a> {
    out: &'a mut String,
    open: Option<Run>,
    started: bool,
}

impl ZwrWriter<'_> {
    fn text(&mut self, ch: char) {
        if self.open != Some(Run::Text) {
            self.begin(Run::Text);
            self.out.push('"');
        }
        if ch == '"' {
            self.out.push_str("\"\"");
        } else {
            self.out.push(ch);
        }
    }

    fn code(&mut self, run: Run, code: u32) {
        if self.open == Some(run) {
            self.out.push(',');
        } else {
            self.begin(run);
            self.out.push_str(if run == Run::Char { "$C(" } else { "$ZCH(" });
        }
        self.out.push_str(&code.to_string());
    }

    fn begin(&mut self, run: Run) {
        self.close();
        if self.started {
            self.out.push('_');
        }
        self.started = true;
        self.open = Some(run);
    }

    fn close(&mut self) {
        match self.open.take() {
            Some(Run::Text) => self.out.push('"'),
            Some(_) => self.out.push(')'),
            None => {}
        }
    }
}
