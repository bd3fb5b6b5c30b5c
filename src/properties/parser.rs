//! Properties-format parser.
//!
//! # Format
//! ```text
//! # comment            ! also a comment
//! key=value            key: value        key value
//! multi=first,\
//!       second         (continuation, leading whitespace dropped)
//! path=C:\\tmp         (\t \n \r \f \uXXXX escapes, \x => x)
//! ```
//!
//! # Design Decisions
//! - Works on whole text; files are small and read in one go
//! - Duplicate keys: last one wins
//! - The only syntax error is a malformed `\uXXXX` escape

use std::collections::HashMap;
use thiserror::Error;

/// Error raised when properties text cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A `\u` escape not followed by four hex digits.
    #[error("malformed \\uxxxx escape on line {line}")]
    MalformedUnicodeEscape { line: usize },
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t' || c == '\x0c'
}

/// Split text into natural lines, treating `\n`, `\r` and `\r\n` as terminators.
fn natural_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if i < bytes.len() && bytes[i] == b'\n' {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Count backslashes at the end of a line.
fn trailing_backslashes(line: &str) -> usize {
    line.chars().rev().take_while(|c| *c == '\\').count()
}

/// A logical line: natural lines joined across continuations.
struct LogicalLine {
    number: usize,
    text: String,
}

fn logical_lines(text: &str) -> Vec<LogicalLine> {
    let naturals = natural_lines(text);
    let mut out = Vec::new();
    let mut idx = 0;

    while idx < naturals.len() {
        let number = idx + 1;
        let first = naturals[idx].trim_start_matches(is_blank);
        idx += 1;

        if first.is_empty() || first.starts_with('#') || first.starts_with('!') {
            continue;
        }

        let mut joined = String::from(first);
        while trailing_backslashes(&joined) % 2 == 1 {
            joined.pop();
            match naturals.get(idx) {
                Some(next) => {
                    joined.push_str(next.trim_start_matches(is_blank));
                    idx += 1;
                }
                None => break,
            }
        }

        out.push(LogicalLine { number, text: joined });
    }
    out
}

/// Resolve escape sequences in a key or value.
fn unescape(raw: &[char], line: usize) -> Result<String, ParseError> {
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;

    while i < raw.len() {
        let c = raw[i];
        i += 1;
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(&esc) = raw.get(i) else {
            break;
        };
        i += 1;
        match esc {
            't' => out.push('\t'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            'f' => out.push('\x0c'),
            'u' => {
                let digits = raw.get(i..i + 4).ok_or(ParseError::MalformedUnicodeEscape { line })?;
                let mut code = 0u32;
                for d in digits {
                    let v = d.to_digit(16).ok_or(ParseError::MalformedUnicodeEscape { line })?;
                    code = code * 16 + v;
                }
                i += 4;
                // Lone surrogates have no char representation.
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Split one logical line into an escaped key and value.
fn split_entry(line: &LogicalLine) -> Result<(String, String), ParseError> {
    let chars: Vec<char> = line.text.chars().collect();
    let len = chars.len();

    let mut key_len = 0;
    let mut value_start = len;
    let mut has_separator = false;
    let mut preceding_backslash = false;

    while key_len < len {
        let c = chars[key_len];
        if (c == '=' || c == ':') && !preceding_backslash {
            value_start = key_len + 1;
            has_separator = true;
            break;
        } else if is_blank(c) && !preceding_backslash {
            value_start = key_len + 1;
            break;
        }
        preceding_backslash = c == '\\' && !preceding_backslash;
        key_len += 1;
    }

    while value_start < len {
        let c = chars[value_start];
        if !is_blank(c) {
            if !has_separator && (c == '=' || c == ':') {
                has_separator = true;
            } else {
                break;
            }
        }
        value_start += 1;
    }

    let key = unescape(&chars[..key_len], line.number)?;
    let value = unescape(&chars[value_start.min(len)..], line.number)?;
    Ok((key, value))
}

/// Parse properties text into a key/value map.
pub fn parse(text: &str) -> Result<HashMap<String, String>, ParseError> {
    let mut entries = HashMap::new();
    for line in logical_lines(text) {
        let (key, value) = split_entry(&line)?;
        entries.insert(key, value);
    }
    Ok(entries)
}
