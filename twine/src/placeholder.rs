//! Placeholder conversion between the strings file convention and platform
//! conventions.
//!
//! The strings file stores printf placeholders the Apple way (`%@` for
//! strings). Android wants `%s`, explicit positions once a string has more
//! than one placeholder, and doubled bare percent signs. Flash uses `{0}`,
//! `{1}`, ...
//!
//! Grammar: `%[param$][flags][width][.precision][length]conversion`.

use lazy_static::lazy_static;
use regex::Regex;

use crate::error::Error;

const FLAGS: &[u8] = b"-+ 0#";
const LENGTHS: [&str; 8] = ["hh", "h", "ll", "l", "L", "z", "j", "t"];
const CONVERSIONS: &[u8] = b"diufFeEgGxXoscpaA@";

lazy_static! {
    static ref FLASH_PLACEHOLDER_REGEX: Regex = Regex::new(r"\{\d+\}").unwrap();
}

/// One recognized placeholder, borrowing from the scanned input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Placeholder<'a> {
    /// Digits of `param$`, without the `$`.
    param: Option<&'a str>,
    /// Flags, width, precision and length, verbatim.
    modifiers: &'a str,
    conversion: char,
}

impl Placeholder<'_> {
    fn render(&self, out: &mut String, param: Option<&str>, conversion: char) {
        out.push('%');
        if let Some(param) = param {
            out.push_str(param);
            out.push('$');
        }
        out.push_str(self.modifiers);
        out.push(conversion);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Text(&'a str),
    /// `%%`
    Escaped,
    /// A `%` that does not start a placeholder.
    Bare,
    Placeholder(Placeholder<'a>),
}

/// Tries to read a placeholder starting at `start`, which must hold `%`.
/// Returns the placeholder and the index just after it.
fn scan_placeholder(input: &str, start: usize) -> Option<(Placeholder<'_>, usize)> {
    let bytes = input.as_bytes();
    let mut j = start + 1;

    // Optional positional index: digits followed by '$'
    let mut param = None;
    let start_digits = j;
    while j < bytes.len() && bytes[j].is_ascii_digit() {
        j += 1;
    }
    if j > start_digits && j < bytes.len() && bytes[j] == b'$' {
        param = Some(&input[start_digits..j]);
        j += 1;
    } else {
        j = start_digits;
    }

    let modifiers_start = j;
    while j < bytes.len() && FLAGS.contains(&bytes[j]) {
        j += 1;
    }
    if j < bytes.len() && bytes[j] == b'*' {
        j += 1;
    } else {
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
    }
    if j + 1 < bytes.len() && bytes[j] == b'.' {
        if bytes[j + 1] == b'*' {
            j += 2;
        } else if bytes[j + 1].is_ascii_digit() {
            j += 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
        }
    }
    if let Some(length) = LENGTHS.iter().find(|l| input[j..].starts_with(**l)) {
        j += length.len();
    }
    let modifiers_end = j;

    let conversion = *bytes.get(j)?;
    if !CONVERSIONS.contains(&conversion) {
        return None;
    }
    Some((
        Placeholder {
            param,
            modifiers: &input[modifiers_start..modifiers_end],
            conversion: conversion as char,
        },
        j + 1,
    ))
}

fn segments(input: &str) -> Vec<Segment<'_>> {
    let bytes = input.as_bytes();
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        if text_start < i {
            out.push(Segment::Text(&input[text_start..i]));
        }
        if bytes.get(i + 1) == Some(&b'%') {
            out.push(Segment::Escaped);
            i += 2;
        } else if let Some((placeholder, next)) = scan_placeholder(input, i) {
            out.push(Segment::Placeholder(placeholder));
            i = next;
        } else {
            out.push(Segment::Bare);
            i += 1;
        }
        text_start = i;
    }
    if text_start < bytes.len() {
        out.push(Segment::Text(&input[text_start..]));
    }
    out
}

/// Converts a strings file value to Android conventions.
///
/// - `%@` becomes `%s`
/// - bare `%` becomes `%%`, but only when the value has placeholders
/// - with two or more placeholders, unnumbered ones are numbered `%1$`, `%2$`,
///   ...; mixing numbered and unnumbered ones is an error
pub fn convert_to_android(input: &str) -> Result<String, Error> {
    let segments = segments(input);
    let placeholders: Vec<&Placeholder> = segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Placeholder(p) => Some(p),
            _ => None,
        })
        .collect();

    if placeholders.is_empty() {
        return Ok(input.to_string());
    }

    let numbered = placeholders.iter().filter(|p| p.param.is_some()).count();
    let renumber = placeholders.len() >= 2 && numbered == 0;
    if placeholders.len() >= 2 && numbered != 0 && numbered != placeholders.len() {
        return Err(Error::PlaceholderMix(input.to_string()));
    }

    let mut out = String::with_capacity(input.len() + 8);
    let mut position = 0;
    for segment in &segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Escaped | Segment::Bare => out.push_str("%%"),
            Segment::Placeholder(p) => {
                position += 1;
                let conversion = if p.conversion == '@' { 's' } else { p.conversion };
                if renumber {
                    p.render(&mut out, Some(position.to_string().as_str()), conversion);
                } else {
                    p.render(&mut out, p.param, conversion);
                }
            }
        }
    }
    Ok(out)
}

/// Converts an Android value back: `%s` becomes `%@`. Nothing else changes.
pub fn convert_from_android(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for segment in segments(input) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Escaped => out.push_str("%%"),
            Segment::Bare => out.push('%'),
            Segment::Placeholder(p) => {
                let conversion = if p.conversion == 's' { '@' } else { p.conversion };
                p.render(&mut out, p.param, conversion);
            }
        }
    }
    out
}

/// Replaces every placeholder with its Flash index: `{0}`, `{1}`, ...
pub fn convert_to_flash(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut index = 0;
    for segment in segments(input) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Escaped => out.push_str("%%"),
            Segment::Bare => out.push('%'),
            Segment::Placeholder(_) => {
                out.push_str(&format!("{{{index}}}"));
                index += 1;
            }
        }
    }
    out
}

/// Replaces Flash `{N}` placeholders with `%@`.
pub fn convert_from_flash(input: &str) -> String {
    FLASH_PLACEHOLDER_REGEX.replace_all(input, "%@").into_owned()
}
