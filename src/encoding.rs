//! JSON encoding of event bodies.

use std::io;

use clap::ValueEnum;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::{Result, WrapErr};

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PayloadFormat {
    /// `", "` and `": "` separators, non-ASCII escaped as `\uXXXX`.
    #[default]
    Spaced,
    /// No whitespace, UTF-8 passed through.
    Compact,
}

impl PayloadFormat {
    /// Serializes `value` to JSON bytes in this format.
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<Vec<u8>> {
        let mut body = Vec::with_capacity(128);

        match self {
            PayloadFormat::Compact => serde_json::to_writer(&mut body, value),
            PayloadFormat::Spaced => {
                let mut serializer = Serializer::with_formatter(&mut body, SpacedFormatter);
                value.serialize(&mut serializer)
            }
        }
        .wrap_err("Failed to serialize event to JSON")?;

        Ok(body)
    }
}

/// Single-line JSON with a space after each separator and ASCII-only output.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }

    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (index, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..index])?;

            let mut units = [0u16; 2];
            for unit in ch.encode_utf16(&mut units) {
                write!(writer, "\\u{:04x}", unit)?;
            }
            start = index + ch.len_utf8();
        }

        writer.write_all(&fragment.as_bytes()[start..])
    }
}
