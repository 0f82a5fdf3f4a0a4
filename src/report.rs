//! Reporting errors to a writer or to `tracing`.
//!
//! [`fprint`] writes one line per layer, outermost first, each prefixed with the
//! `file:line` of the call that created the layer:
//!
//! ```text
//! src/api.rs:88: handling request
//! src/db.rs:41: loading user
//! src/db.rs:12: not found :: user 42
//! ```
//!
//! Layers that add no text of their own (stack-only layers) are skipped.

use std::io::{self, Write};

use crate::error::Error;

/// Write the per-layer report for `err` to `w`.
pub fn fprint<W: Write + ?Sized>(w: &mut W, err: &Error) -> io::Result<()> {
    for layer in err.layers() {
        let message = layer.layer_message().to_string();
        if message.is_empty() {
            continue;
        }
        if let Some(location) = layer.location() {
            write!(w, "{}:{}: ", location.file(), location.line())?;
        }
        writeln!(w, "{}", message)?;
    }
    Ok(())
}

/// Write the per-layer report for `err` to standard error.
///
/// Does nothing when `err` is `None`.
pub fn print(err: Option<&Error>) {
    if let Some(err) = err {
        let stderr = io::stderr();
        // Failures writing to stderr are ignored.
        let _ = fprint(&mut stderr.lock(), err);
    }
}

/// Emit `err` as a single `tracing` event at `ERROR` level.
///
/// Fields: `error` (short message), `cause` (root cause), `location` (where the
/// outermost layer was created) and `details` (full rendering with stacks).
#[cfg(feature = "tracing")]
pub fn log(err: &Error) {
    let location = match err.location() {
        Some(location) => format!("{}:{}", location.file(), location.line()),
        None => String::from("unknown"),
    };
    tracing::error!(
        error = %err,
        cause = %err.cause(),
        location = %location,
        details = ?err,
        "error reported"
    );
}
