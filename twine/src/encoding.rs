//! Character encoding of localization files.
//!
//! Input is decoded in this order: a byte order mark wins, then an explicit
//! encoding label, then UTF-16 detection from a zero byte among the first two
//! bytes, then UTF-8. Output is UTF-8 unless a label asks for something else.

use std::{fs, io::Read, path::Path};

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use encoding_rs_io::DecodeReaderBytesBuilder;

use crate::error::Error;

/// Looks up an encoding by its WHATWG label (`utf-8`, `utf-16le`,
/// `windows-1252`, ...).
pub fn encoding_for_label(label: &str) -> Result<&'static Encoding, Error> {
    Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| Error::Encoding(label.to_string()))
}

/// Guesses UTF-16 from BOM-less content: ASCII text encoded as UTF-16 has a
/// zero byte in one of the first two positions.
pub fn sniff_utf16(bytes: &[u8]) -> Option<&'static Encoding> {
    match bytes {
        [0, _, ..] => Some(UTF_16BE),
        [_, 0, ..] => Some(UTF_16LE),
        _ => None,
    }
}

/// Decodes `bytes` to a string, stripping any byte order mark.
pub fn decode(bytes: &[u8], label: Option<&str>) -> Result<String, Error> {
    let explicit = label.map(encoding_for_label).transpose()?;
    let encoding = explicit.or_else(|| sniff_utf16(bytes));

    let mut decoder = DecodeReaderBytesBuilder::new()
        .encoding(encoding)
        .bom_override(true)
        .strip_bom(true)
        .build(bytes);
    let mut decoded = String::new();
    decoder.read_to_string(&mut decoded)?;
    Ok(decoded)
}

/// Reads and decodes the file at `path`.
pub fn read_to_string<P: AsRef<Path>>(path: P, label: Option<&str>) -> Result<String, Error> {
    let bytes = fs::read(path)?;
    decode(&bytes, label)
}

fn utf16_units(text: &str, big_endian: bool, bom: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2 + 2);
    let units = bom.then_some(0xFEFF_u16).into_iter().chain(text.encode_utf16());
    for unit in units {
        if big_endian {
            out.extend_from_slice(&unit.to_be_bytes());
        } else {
            out.extend_from_slice(&unit.to_le_bytes());
        }
    }
    out
}

/// Encodes `text` for writing. `UTF-16` means big endian with a byte order
/// mark; `UTF-16LE` and `UTF-16BE` are written without one.
pub fn encode(text: &str, label: Option<&str>) -> Result<Vec<u8>, Error> {
    let Some(label) = label else {
        return Ok(text.as_bytes().to_vec());
    };
    match label.trim().to_ascii_lowercase().as_str() {
        "utf-16" | "utf16" => return Ok(utf16_units(text, true, true)),
        "utf-16be" => return Ok(utf16_units(text, true, false)),
        "utf-16le" => return Ok(utf16_units(text, false, false)),
        _ => {}
    }

    let encoding = encoding_for_label(label)?;
    if encoding == UTF_8 {
        return Ok(text.as_bytes().to_vec());
    }
    let (bytes, _, _) = encoding.encode(text);
    Ok(bytes.into_owned())
}

/// Encodes `text` and writes it to `path`.
pub fn write<P: AsRef<Path>>(path: P, text: &str, label: Option<&str>) -> Result<(), Error> {
    fs::write(path, encode(text, label)?)?;
    Ok(())
}
