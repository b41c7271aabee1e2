//! Properties-format configuration loading.
//!
//! The broker configuration is a UTF-8 Java-properties file: `key=value`,
//! `key: value`, or `key value` lines, `#`/`!` comments, trailing-backslash
//! line continuation, and the usual `\t \n \r \f \\ \uXXXX` escapes. Every
//! resolved pair is handed verbatim to the Kafka client; this tool defines
//! no configuration keys of its own.

use crate::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::iter::Peekable;
use std::path::Path;
use std::str::Chars;

/// Reads a properties file into a key-value map.
///
/// Duplicate keys resolve last-seen-wins. An empty key or a malformed
/// escape sequence is a parse error; a line without a separator becomes a
/// key with an empty value.
pub fn load_properties(path: &Path) -> Result<HashMap<String, String>> {
    let text = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;

    parse_properties(&text)
        .map_err(|e| Error::Config(format!("failed to parse {}: {}", path.display(), e)))
}

fn parse_properties(text: &str) -> std::result::Result<HashMap<String, String>, String> {
    let mut options = HashMap::new();

    for (line_no, line) in logical_lines(text) {
        let (key, value) =
            parse_line(&line).map_err(|e| format!("line {}: {}", line_no, e))?;
        options.insert(key, value);
    }

    Ok(options)
}

/// Joins continuation lines (trailing odd backslash) into logical lines,
/// dropping blanks and comments. Yields the 1-based number of each logical
/// line's first physical line for error reporting.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut lines = text.lines().enumerate().peekable();

    while let Some((idx, line)) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        out.push((idx + 1, logical));
    }

    out
}

/// A line continues onto the next when it ends with an odd number of
/// backslashes; an even run is escaped backslashes in the value.
fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

fn parse_line(line: &str) -> std::result::Result<(String, String), String> {
    let mut chars = line.chars().peekable();
    let mut key = String::new();
    let mut rest: Option<String> = None;

    while let Some(c) = chars.next() {
        match c {
            '\\' => key.push(unescape_char(&mut chars)?),
            '=' | ':' => {
                rest = Some(chars.collect());
                break;
            }
            c if c.is_whitespace() => {
                // Unescaped whitespace ends the key; an `=` or `:` may
                // still follow before the value starts.
                while matches!(chars.peek(), Some(w) if w.is_whitespace()) {
                    chars.next();
                }
                if matches!(chars.peek(), Some('=' | ':')) {
                    chars.next();
                }
                rest = Some(chars.collect());
                break;
            }
            c => key.push(c),
        }
    }

    let key = key.trim().to_string();
    if key.is_empty() {
        return Err("empty property key".to_string());
    }

    // Leading whitespace before the value is not significant; trailing
    // whitespace is part of the value, per properties-format rules.
    let value = match rest {
        Some(raw) => unescape(raw.trim_start())?,
        None => String::new(),
    };

    Ok((key, value))
}

fn unescape(s: &str) -> std::result::Result<String, String> {
    let mut chars = s.chars().peekable();
    let mut out = String::with_capacity(s.len());

    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push(unescape_char(&mut chars)?),
            c => out.push(c),
        }
    }

    Ok(out)
}

fn unescape_char(chars: &mut Peekable<Chars>) -> std::result::Result<char, String> {
    match chars.next() {
        Some('t') => Ok('\t'),
        Some('n') => Ok('\n'),
        Some('r') => Ok('\r'),
        Some('f') => Ok('\u{000C}'),
        Some('u') => {
            let mut code = 0u32;
            for _ in 0..4 {
                let digit = chars
                    .next()
                    .and_then(|c| c.to_digit(16))
                    .ok_or_else(|| "malformed \\uXXXX escape".to_string())?;
                code = code * 16 + digit;
            }
            char::from_u32(code).ok_or_else(|| format!("invalid unicode escape \\u{:04X}", code))
        }
        Some(other) => Ok(other),
        None => Err("dangling escape at end of line".to_string()),
    }
}
