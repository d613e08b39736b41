//! Console output of intermediate and final structures

use serde::Serialize;
use std::io::{self, Write};

/// Print `value` as indented JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> io::Result<()> {
    let rendered = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")
}
