//! Sentinel error kinds.
//!
//! Each kind has its own constructor returning an [`Error`] whose outermost
//! layer is a [`KindError`] rendered `"<label> :: <detail>"`. The kind survives
//! any amount of wrapping and is recovered with [`Error::kind`] or
//! [`Error::is_kind`].
//!
//! ```rust
//! use causeway::kind::{self, Kind};
//!
//! let err = kind::not_found("user 42").wrap("loading profile");
//! assert_eq!(err.to_string(), "loading profile: not found :: user 42");
//! assert_eq!(err.kind(), Some(Kind::NotFound));
//! ```

use core::fmt;
use core::panic::Location;
use std::error::Error as StdError;

use crate::error::Error;
use crate::failure::Failure;
use crate::stack::Stack;

/// The family a sentinel error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
    /// The caller lacks permission for the operation.
    AccessDenied,
    /// The item being created is already present.
    AlreadyExists,
    /// Input could not be parsed or has the wrong shape.
    BadFormat,
    /// A concurrent modification got there first.
    ConflictingChange,
    /// Stored data could not be loaded.
    DataLoad,
    /// The feature or resource is switched off.
    Disabled,
    /// An argument was rejected; the detail names it.
    InvalidArgument,
    /// A filesystem or device operation failed.
    Io,
    /// A quota or rate limit was hit.
    Limited,
    /// A network operation failed.
    Network,
    /// The requested item does not exist.
    NotFound,
    /// Something was used before it was set up.
    Uninitialized,
    /// A value of an unexpected type was supplied.
    UnsupportedType,
}

impl Kind {
    /// Every kind, in declaration order.
    pub const ALL: [Kind; 13] = [
        Kind::AccessDenied,
        Kind::AlreadyExists,
        Kind::BadFormat,
        Kind::ConflictingChange,
        Kind::DataLoad,
        Kind::Disabled,
        Kind::InvalidArgument,
        Kind::Io,
        Kind::Limited,
        Kind::Network,
        Kind::NotFound,
        Kind::Uninitialized,
        Kind::UnsupportedType,
    ];

    /// The message prefix for this kind.
    pub const fn label(self) -> &'static str {
        match self {
            Kind::AccessDenied => "access denied",
            Kind::AlreadyExists => "already exists",
            Kind::BadFormat => "bad format",
            Kind::ConflictingChange => "conflicting change",
            Kind::DataLoad => "data load failed",
            Kind::Disabled => "disabled",
            Kind::InvalidArgument => "invalid argument",
            Kind::Io => "io operation failed",
            Kind::Limited => "limited",
            Kind::Network => "network operation failed",
            Kind::NotFound => "not found",
            Kind::Uninitialized => "uninitialized",
            Kind::UnsupportedType => "unsupported type",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A leaf error tagged with a [`Kind`].
///
/// Equality compares kind and detail only, so a bare value built with
/// [`KindError::new`] works as a sentinel for [`Error::is`]:
///
/// ```rust
/// use causeway::kind::{self, Kind, KindError};
///
/// let err = kind::disabled("uploads").wrap("handling request");
/// assert!(err.is(&KindError::new(Kind::Disabled, "uploads")));
/// assert!(!err.is(&KindError::new(Kind::Disabled, "downloads")));
/// ```
#[derive(Debug)]
pub struct KindError {
    kind: Kind,
    detail: String,
    stack: Option<Stack>,
    location: Option<&'static Location<'static>>,
}

impl KindError {
    /// A bare sentinel value with no stack or location.
    pub fn new(kind: Kind, detail: impl fmt::Display) -> Self {
        Self {
            kind,
            detail: detail.to_string(),
            stack: None,
            location: None,
        }
    }

    #[track_caller]
    #[inline(never)]
    fn traced(kind: Kind, detail: String, skip: usize) -> Error {
        Error::from_failure(Self {
            kind,
            detail,
            stack: Some(Stack::capture(skip.saturating_add(1))),
            location: Some(Location::caller()),
        })
    }

    /// The family this sentinel belongs to.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// The text after the `" :: "` separator.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl PartialEq for KindError {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.detail == other.detail
    }
}

impl Eq for KindError {}

impl fmt::Display for KindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :: {}", self.kind.label(), self.detail)
    }
}

impl StdError for KindError {}

impl Failure for KindError {
    fn stack(&self) -> Option<&Stack> {
        self.stack.as_ref()
    }

    fn location(&self) -> Option<&'static Location<'static>> {
        self.location
    }
}

macro_rules! kind_constructors {
    ($($(#[$meta:meta])* $name:ident => $kind:ident;)*) => {
        $(
            $(#[$meta])*
            #[track_caller]
            #[inline(never)]
            pub fn $name(detail: impl fmt::Display) -> Error {
                KindError::traced(Kind::$kind, detail.to_string(), 1)
            }
        )*
    };
}

kind_constructors! {
    /// The caller lacks permission for the operation.
    access_denied => AccessDenied;
    /// The object being created is already present.
    already_exists => AlreadyExists;
    /// Input does not have the expected format.
    bad_format => BadFormat;
    /// A concurrent change conflicts with this one.
    conflicting_change => ConflictingChange;
    /// Loading data failed.
    data_load => DataLoad;
    /// The feature or object is disabled.
    disabled => Disabled;
    /// An I/O operation failed.
    io => Io;
    /// A limit or quota was reached.
    limited => Limited;
    /// A network operation failed.
    network => Network;
    /// The expected object is not present.
    not_found => NotFound;
    /// A component was used before being initialized.
    uninitialized => Uninitialized;
    /// A value has a type that is not supported.
    unsupported_type => UnsupportedType;
}

/// `argument` was rejected for `reason`; renders
/// `invalid argument :: <argument> - <reason>`.
#[track_caller]
#[inline(never)]
pub fn invalid_argument(argument: impl fmt::Display, reason: impl fmt::Display) -> Error {
    KindError::traced(
        Kind::InvalidArgument,
        format!("{} - {}", argument, reason),
        1,
    )
}
