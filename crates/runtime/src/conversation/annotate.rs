//! Human-readable tool call annotations.

use crate::model::ToolCall;
use serde::Serialize;
use serde_json::{Serializer, Value, ser::Formatter};
use std::io;

/// Compact JSON with a space after `,` and `:`, e.g. `{"location_id": "QIM4"}`.
/// Non-ASCII characters are written as-is.
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
}

pub(crate) fn spaced_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, SpacedFormatter);
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}

/// The line emitted into the answer when a tool is invoked.
pub fn tool_call_annotation(call: &ToolCall) -> String {
    format!(
        "[Calling tool {} with args {}]",
        call.name,
        spaced_json(&call.input)
    )
}
