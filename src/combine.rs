//! Aggregating independent errors.
//!
//! [`combine`] folds any number of optional errors into one: nothing when all
//! are absent, the single error (with a fresh stack) when only one is present,
//! and a [`Combination`] otherwise. [`uncombine`] reverses it.

use core::fmt;
use core::panic::Location;
use std::error::Error as StdError;

use crate::error::Error;
use crate::failure::Failure;
use crate::format::{Verbose, Verbosity};
use crate::layer::WithStack;
use crate::stack::Stack;

/// Two or more independent errors reported as one.
///
/// The short rendering is every element's message, one per line. The root
/// [`cause`](Error::cause) is the cause of the first element.
///
/// ```rust
/// use causeway::{Error, combine};
///
/// let err = combine([Error::plain("a"), Error::plain("b")]).unwrap();
/// assert_eq!(err.to_string(), "a\nb");
/// assert_eq!(err.cause().to_string(), "a");
/// assert_eq!(err.uncombine().len(), 2);
/// ```
#[derive(Debug)]
pub struct Combination {
    errors: Vec<Error>,
    stack: Stack,
    location: &'static Location<'static>,
}

impl Combination {
    /// The elements, in the order they were combined.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always `false`: a combination holds at least one element.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Take the elements.
    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    /// Add `err` with a stack recorded at the caller. Absent errors are ignored.
    ///
    /// ```rust
    /// use causeway::{Combination, Error, combine};
    ///
    /// let mut err = combine([Error::plain("a"), Error::plain("b")]).unwrap();
    /// if let Some(combination) = err.downcast_mut::<Combination>() {
    ///     combination.append(Error::plain("c"));
    ///     combination.append(None::<Error>);
    /// }
    /// assert_eq!(err.to_string(), "a\nb\nc");
    /// ```
    #[track_caller]
    #[inline(never)]
    pub fn append(&mut self, err: impl Into<Option<Error>>) {
        if let Some(err) = err.into() {
            self.errors.push(WithStack::traced(err, 1));
        }
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl StdError for Combination {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.errors
            .first()
            .map(|err| err.as_dyn_error() as &(dyn StdError + 'static))
    }
}

impl Failure for Combination {
    fn caused_by(&self) -> Option<&Error> {
        self.errors.first()
    }

    fn stack(&self) -> Option<&Stack> {
        Some(&self.stack)
    }

    fn location(&self) -> Option<&'static Location<'static>> {
        Some(self.location)
    }

    fn fmt_full(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for err in &self.errors {
            writeln!(f, "{}", err.cause())?;
        }
        self.stack.fmt_with(f, Verbosity::Full)
    }
}

/// Combine optional errors into at most one.
///
/// - no present errors: `None`
/// - one: that error with a stack recorded here
/// - two or more: a [`Combination`] of them, in order, with a stack recorded here
///
/// Accepts `Error`s or `Option<Error>`s; absent entries are dropped.
#[track_caller]
#[inline(never)]
pub fn combine<I>(errors: I) -> Option<Error>
where
    I: IntoIterator,
    I::Item: Into<Option<Error>>,
{
    let mut errors: Vec<Error> = errors.into_iter().filter_map(|err| err.into()).collect();
    if errors.len() > 1 {
        return Some(Error::from_failure(Combination {
            errors,
            stack: Stack::capture(1),
            location: Location::caller(),
        }));
    }
    let err = errors.pop()?;
    Some(WithStack::traced(err, 1))
}

/// The elements of a combination, the error itself for anything else, or
/// nothing for an absent error.
pub fn uncombine(err: Option<Error>) -> Vec<Error> {
    match err {
        Some(err) => err.uncombine(),
        None => Vec::new(),
    }
}
