//! Convenient re-exports for common usage.
//!
//! ```rust
//! use causeway::prelude::*;
//!
//! fn parse(input: &str) -> Result<u32, Error> {
//!     let n: u32 = input.trim().parse().wrap("parsing count")?;
//!     ensure!(n > 0, "count must be positive");
//!     Ok(n)
//! }
//!
//! assert_eq!(parse(" 3 ").unwrap(), 3);
//! assert_eq!(
//!     parse("x").unwrap_err().to_string(),
//!     "parsing count: invalid digit found in string"
//! );
//! ```

pub use crate::{Error, OptionExt, ResultExt, Verbosity, bail, combine, ensure, format_err};
