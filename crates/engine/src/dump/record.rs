use std::fmt::Write as _;
use std::path::Path;

use protocol::{Timespec, Uuid};
use time::OffsetDateTime;
use time::macros::format_description;

use super::escape::{escape_into, path_bytes};

const TITLE_WIDTH: usize = 16;
const PATH_WIDTH: usize = 32;

/// One typed detail value of a dump line.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Value<'a> {
    Unsigned(u64),
    Octal(u32),
    Hex(u64),
    Uuid(&'a Uuid),
    Path(&'a Path),
    Bytes(&'a [u8]),
    Time(Timespec),
}

/// One dump line: title, resolved path and ordered detail fields.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Record<'a> {
    pub title: &'static str,
    pub path: &'a Path,
    pub fields: &'a [(&'static str, Value<'a>)],
}

impl Record<'_> {
    /// Renders the record into `out` without a trailing newline.
    pub(crate) fn render_into(&self, out: &mut String) {
        out.clear();

        let title = format!("{}:", self.title);
        let _ = write!(out, "{title:<TITLE_WIDTH$}");

        let path_start = out.len();
        escape_into(&path_bytes(self.path), out);
        if self.fields.is_empty() {
            return;
        }

        let path_len = out.len() - path_start;
        if path_len < PATH_WIDTH {
            out.extend(std::iter::repeat_n(' ', PATH_WIDTH - path_len));
        } else {
            out.push(' ');
        }

        for (index, (name, value)) in self.fields.iter().enumerate() {
            if index > 0 {
                out.push(' ');
            }
            out.push_str(name);
            out.push('=');
            render_value(value, out);
        }
    }
}

fn render_value(value: &Value<'_>, out: &mut String) {
    match *value {
        Value::Unsigned(value) => {
            let _ = write!(out, "{value}");
        }
        Value::Octal(value) => {
            let _ = write!(out, "{value:o}");
        }
        Value::Hex(value) => {
            let _ = write!(out, "{value:#x}");
        }
        Value::Uuid(value) => {
            let _ = write!(out, "{}", value.hyphenated());
        }
        Value::Path(value) => escape_into(&path_bytes(value), out),
        Value::Bytes(value) => escape_into(value, out),
        Value::Time(value) => out.push_str(&format_time(value)),
    }
}

/// Formats a timestamp as UTC calendar time, or `seconds.nanoseconds` when it
/// falls outside the representable calendar range.
pub(crate) fn format_time(value: Timespec) -> String {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]+0000");

    i64::try_from(value.sec())
        .ok()
        .and_then(|sec| OffsetDateTime::from_unix_timestamp(sec).ok())
        .and_then(|when| when.format(format).ok())
        .unwrap_or_else(|| value.to_string())
}
