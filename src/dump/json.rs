//! Whitespace-only JSON re-indentation.
//!
//! The body is validated with serde_json but never turned into a `Value`:
//! tokens are copied byte for byte and `PrettyFormatter` only decides where
//! newlines and indentation go. Duplicate keys, number spellings and string
//! escapes survive exactly as the client sent them.

use std::io;

use serde::de::IgnoredAny;
use serde_json::ser::{Formatter, PrettyFormatter};

enum Frame {
    Array { first: bool },
    Object { first: bool, expect_key: bool },
}

/// `raw` indented by two spaces, or `None` when it is not valid JSON.
pub fn indent(raw: &[u8]) -> Option<Vec<u8>> {
    serde_json::from_slice::<IgnoredAny>(raw).ok()?;
    reindent(raw).ok()
}

fn reindent(raw: &[u8]) -> io::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(raw.len() + raw.len() / 2);
    let mut fmt = PrettyFormatter::with_indent(b"  ");
    let mut stack: Vec<Frame> = Vec::new();
    let mut i = 0;

    while i < raw.len() {
        match raw[i] {
            b' ' | b'\t' | b'\n' | b'\r' | b',' => i += 1,
            b':' => {
                fmt.begin_object_value(&mut out)?;
                i += 1;
            }
            b'{' => {
                begin_value(&mut fmt, &mut out, &mut stack)?;
                fmt.begin_object(&mut out)?;
                stack.push(Frame::Object {
                    first: true,
                    expect_key: true,
                });
                i += 1;
            }
            b'[' => {
                begin_value(&mut fmt, &mut out, &mut stack)?;
                fmt.begin_array(&mut out)?;
                stack.push(Frame::Array { first: true });
                i += 1;
            }
            b'}' => {
                stack.pop();
                fmt.end_object(&mut out)?;
                end_value(&mut fmt, &mut out, &mut stack)?;
                i += 1;
            }
            b']' => {
                stack.pop();
                fmt.end_array(&mut out)?;
                end_value(&mut fmt, &mut out, &mut stack)?;
                i += 1;
            }
            b'"' => {
                let end = string_end(raw, i);
                let is_key = matches!(
                    stack.last(),
                    Some(Frame::Object { expect_key: true, .. })
                );
                if is_key {
                    if let Some(Frame::Object { first, expect_key }) = stack.last_mut() {
                        fmt.begin_object_key(&mut out, *first)?;
                        *first = false;
                        *expect_key = false;
                    }
                    out.extend_from_slice(&raw[i..end]);
                    fmt.end_object_key(&mut out)?;
                } else {
                    begin_value(&mut fmt, &mut out, &mut stack)?;
                    out.extend_from_slice(&raw[i..end]);
                    end_value(&mut fmt, &mut out, &mut stack)?;
                }
                i = end;
            }
            _ => {
                let end = scalar_end(raw, i);
                begin_value(&mut fmt, &mut out, &mut stack)?;
                out.extend_from_slice(&raw[i..end]);
                end_value(&mut fmt, &mut out, &mut stack)?;
                i = end;
            }
        }
    }

    Ok(out)
}

fn begin_value(fmt: &mut PrettyFormatter<'_>, out: &mut Vec<u8>, stack: &mut [Frame]) -> io::Result<()> {
    match stack.last_mut() {
        Some(Frame::Array { first }) => {
            fmt.begin_array_value(out, *first)?;
            *first = false;
            Ok(())
        }
        // Object values are opened by the `:` before them.
        _ => Ok(()),
    }
}

fn end_value(fmt: &mut PrettyFormatter<'_>, out: &mut Vec<u8>, stack: &mut [Frame]) -> io::Result<()> {
    match stack.last_mut() {
        Some(Frame::Array { .. }) => fmt.end_array_value(out),
        Some(Frame::Object { expect_key, .. }) => {
            *expect_key = true;
            fmt.end_object_value(out)
        }
        None => Ok(()),
    }
}

/// Index just past the closing quote of the string starting at `start`.
fn string_end(raw: &[u8], start: usize) -> usize {
    let mut i = start + 1;
    while i < raw.len() {
        match raw[i] {
            b'\\' => i += 2,
            b'"' => return i + 1,
            _ => i += 1,
        }
    }
    raw.len()
}

/// Index just past a number or literal starting at `start`.
fn scalar_end(raw: &[u8], start: usize) -> usize {
    raw[start..]
        .iter()
        .position(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b',' | b':' | b']' | b'}'))
        .map_or(raw.len(), |offset| start + offset)
}
