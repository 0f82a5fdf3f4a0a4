//! Unit tests for causeway.
//!
//! These tests are in a separate file for organization but remain in the `src/`
//! directory to retain access to `pub(crate)` items like `short_function_name`.

use crate::stack::{MAX_DEPTH, short_function_name};
use crate::{
    Error, Fundamental, Kind, ResultExt, Stack, Symbol, Verbosity, WithStack, Wrapped, cause,
    kind, with_message, with_stack, wrap,
};
use std::collections::HashSet;
use std::fmt;
use std::hint::black_box;

#[derive(Debug, PartialEq, Eq)]
enum TestError {
    NotFound,
    InvalidInput,
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestError::NotFound => write!(f, "not found"),
            TestError::InvalidInput => write!(f, "invalid input"),
        }
    }
}

impl std::error::Error for TestError {}

static_assertions::assert_impl_all!(Error: Send, Sync);
static_assertions::assert_not_impl_any!(Error: std::error::Error);
static_assertions::const_assert!(
    core::mem::size_of::<Error>() <= 3 * core::mem::size_of::<usize>()
);

// ============================================================================
// Function names
// ============================================================================

#[test]
fn test_short_function_name() {
    assert_eq!(short_function_name("app::db::connect"), "connect");
    assert_eq!(short_function_name("app::db::Conn::query"), "Conn::query");
    assert_eq!(short_function_name("main"), "main");
    assert_eq!(short_function_name("app::run::{{closure}}"), "run");
    assert_eq!(
        short_function_name("app::run::{{closure}}::{{closure}}"),
        "run"
    );
    assert_eq!(
        short_function_name("alloc::vec::Vec<T>::push"),
        "Vec<T>::push"
    );
    assert_eq!(
        short_function_name("core::ptr::drop_in_place<app::Foo>"),
        "drop_in_place<app::Foo>"
    );
    assert_eq!(
        short_function_name("<app::Foo as core::fmt::Display>::fmt"),
        "<app::Foo as core::fmt::Display>::fmt"
    );
}

// ============================================================================
// Frames and stacks
// ============================================================================

#[test]
fn test_unknown_frame_formats_without_failing() {
    let frame = crate::Frame::UNKNOWN;
    assert_eq!(format!("{}", frame), "unknown:0");
    assert_eq!(format!("{:+}", frame), "unknown:0");
    assert_eq!(frame.render(Verbosity::Full).to_string(), "unknown:0");
    assert_eq!(frame.source(Verbosity::Short).to_string(), "unknown");
    assert_eq!(frame.source(Verbosity::Full).to_string(), "unknown");
    assert_eq!(frame.function(), "unknown");
    assert_eq!(frame.short_function(), "unknown");
    assert_eq!(frame.file(), "unknown");
    assert_eq!(frame.file_name(), "unknown");
    assert_eq!(frame.line(), 0);
    assert!(!frame.resolve().is_resolved());
}

#[test]
fn test_symbol_without_file_keeps_function_name() {
    let symbol = Symbol {
        name: Some("app::run".into()),
        file: None,
        line: None,
    };
    assert_eq!(symbol.render(Verbosity::Full).to_string(), "app::run\n\tunknown:0");
    assert_eq!(symbol.render(Verbosity::Short).to_string(), "unknown:0");
    assert!(symbol.is_resolved());

    let symbol = Symbol {
        name: Some("app::run".into()),
        file: Some("/src/app.rs".into()),
        line: Some(7),
    };
    assert_eq!(symbol.render(Verbosity::Full).to_string(), "app::run\n\t/src/app.rs:7");
    assert_eq!(symbol.render(Verbosity::Short).to_string(), "app.rs:7");

    assert_eq!(Symbol::default().render(Verbosity::Full).to_string(), "unknown:0");
}

#[test]
fn test_stack_formats() {
    let stack = Stack::from_frames([crate::Frame::UNKNOWN, crate::Frame::UNKNOWN]);
    assert_eq!(format!("{}", stack), "[unknown:0 unknown:0]");
    assert_eq!(format!("{:+}", stack), "\nunknown:0\nunknown:0");
    assert_eq!(stack.sources().to_string(), "[unknown unknown]");
    assert_eq!(Stack::default().to_string(), "[]");
    assert_eq!(format!("{:+}", Stack::default()), "");
}

#[test]
fn test_stack_depth_is_capped() {
    let stack = Stack::from_frames(std::iter::repeat_n(crate::Frame::UNKNOWN, MAX_DEPTH + 8));
    assert_eq!(stack.len(), MAX_DEPTH);
}

#[test]
fn test_capture_records_current_function() {
    let stack = Stack::capture(0);
    assert!(!stack.is_empty());
    assert!(stack.len() <= MAX_DEPTH);
    assert!(
        stack
            .iter()
            .any(|frame| frame.function().contains("test_capture_records_current_function")),
        "Got:\n{:+}",
        stack
    );
}

#[test]
fn test_capture_with_huge_skip_is_empty() {
    assert!(Stack::capture(usize::MAX).is_empty());
    assert!(Stack::capture(usize::MAX - 1).is_empty());

    let err = Error::plain("x").with_stack_skip(usize::MAX);
    assert_eq!(err.to_string(), "x");
    assert!(err.stack().is_some_and(Stack::is_empty));

    let err = crate::with_stack_skip(usize::MAX, Some(Error::plain("x")))
        .expect("present error stays present");
    assert!(err.stack().is_some_and(Stack::is_empty));
}

#[inline(never)]
fn recurse_then_fail(depth: u32) -> Error {
    let err = if depth == 0 {
        Error::new("bottom")
    } else {
        recurse_then_fail(depth - 1)
    };
    black_box(&err);
    err
}

#[test]
fn test_deep_capture_is_capped() {
    let err = recurse_then_fail(100);
    let stack = err.stack().expect("Error::new records a stack");
    assert_eq!(stack.len(), MAX_DEPTH, "Got:\n{:+}", stack);
    assert!(
        stack
            .iter()
            .all(|frame| frame.function().contains("recurse_then_fail")),
        "Got:\n{:+}",
        stack
    );
}

#[test]
fn test_new_captures_caller_stack() {
    let err = Error::new("boom");
    let stack = err.stack().expect("Error::new records a stack");
    assert!(
        stack
            .iter()
            .any(|frame| frame.function().contains("test_new_captures_caller_stack")),
        "Got:\n{:+}",
        stack
    );
}

// ============================================================================
// First frame is the annotating call site
// ============================================================================

fn assert_first_frame(err: &Error, site: &str) {
    let stack = err.stack().expect("layer records a stack");
    let first = stack.first().expect("stack is not empty");
    assert!(
        first.function().contains(site),
        "expected first frame in {}, got:\n{:+}",
        site,
        stack
    );
}

#[inline(never)]
fn site_new() -> Error {
    let err = Error::new("x");
    black_box(&err);
    err
}

#[inline(never)]
fn site_wrap(err: Error) -> Error {
    let err = err.wrap("ctx");
    black_box(&err);
    err
}

#[inline(never)]
fn site_with_stack(err: Error) -> Error {
    let err = err.with_stack();
    black_box(&err);
    err
}

#[inline(never)]
fn site_result_wrap() -> Error {
    let result: Result<(), TestError> = Err(black_box(TestError::NotFound));
    let err = result.wrap("ctx").unwrap_err();
    black_box(&err);
    err
}

#[inline(never)]
fn site_option_wrap() -> Error {
    let err = wrap(Some(Error::plain("x")), "ctx").expect("present error stays present");
    black_box(&err);
    err
}

#[inline(never)]
fn site_kind() -> Error {
    let err = kind::not_found("x");
    black_box(&err);
    err
}

#[inline(never)]
fn site_format_err() -> Error {
    let err = crate::format_err!("port {} in use", 8080);
    black_box(&err);
    err
}

/// Annotates on behalf of its own caller.
#[inline(never)]
fn stack_for_caller(err: Error) -> Error {
    let err = err.with_stack_skip(1);
    black_box(&err);
    err
}

#[inline(never)]
fn site_skipped_helper() -> Error {
    let err = stack_for_caller(Error::plain("x"));
    black_box(&err);
    err
}

#[inline(never)]
fn stack_for_caller_option(err: Error) -> Option<Error> {
    let err = crate::with_stack_skip(1, Some(err));
    black_box(&err);
    err
}

#[inline(never)]
fn site_skipped_option_helper() -> Error {
    let err = stack_for_caller_option(Error::plain("x")).expect("present error stays present");
    black_box(&err);
    err
}

#[test]
fn test_first_frame_is_call_site() {
    assert_first_frame(&site_new(), "site_new");
    assert_first_frame(&site_wrap(Error::plain("x")), "site_wrap");
    assert_first_frame(&site_with_stack(Error::plain("x")), "site_with_stack");
    assert_first_frame(&site_result_wrap(), "site_result_wrap");
    assert_first_frame(&site_option_wrap(), "site_option_wrap");
    assert_first_frame(&site_kind(), "site_kind");
    assert_first_frame(&site_format_err(), "site_format_err");
}

#[test]
fn test_with_stack_skip_starts_at_helpers_caller() {
    assert_first_frame(&site_skipped_helper(), "site_skipped_helper");
    assert_first_frame(&site_skipped_option_helper(), "site_skipped_option_helper");
}

// ============================================================================
// Layers
// ============================================================================

#[test]
fn test_plain_has_no_stack() {
    let err = Error::plain("boom");
    assert!(err.stack().is_none());
    assert_eq!(format!("{}", err), "boom");
    assert_eq!(format!("{:+}", err), "boom");
    assert_eq!(format!("{:?}", err), "boom");
    assert!(err.is_layer::<Fundamental>());
}

#[test]
fn test_with_message_layers_render_innermost_first() {
    let err = Error::plain("e0").with_message("ctx").with_message("outer");
    assert_eq!(err.to_string(), "outer: ctx: e0");
    assert_eq!(format!("{:+}", err), "e0\nctx\nouter");
    assert!(err.stack().is_none());
    assert!(err.is_layer::<Wrapped>());
}

#[test]
fn test_wrap_records_stack_after_message() {
    let err = Error::plain("e0").wrap("ctx");
    assert_eq!(err.to_string(), "ctx: e0");
    assert!(err.stack().is_some());
    let full = format!("{:+}", err);
    assert!(full.starts_with("e0\nctx\n"), "Got:\n{}", full);
}

#[test]
fn test_with_stack_keeps_message() {
    let err = Error::plain("e0").with_stack();
    assert_eq!(err.to_string(), "e0");
    assert!(err.is_layer::<WithStack>());
    assert!(err.stack().is_some());
    let full = format!("{:+}", err);
    assert!(full.starts_with("e0\n"), "Got:\n{}", full);
    assert_eq!(err.layer_message().to_string(), "");
}

#[test]
fn test_render_ignores_formatter_flags() {
    let err = Error::plain("e0").with_stack().with_message("ctx");
    assert_eq!(format!("{:+}", err.render(Verbosity::Short)), "ctx: e0");
    assert_eq!(
        err.render(Verbosity::Full).to_string(),
        format!("{:+}", err)
    );
}

#[test]
fn test_layer_messages() {
    let err = Error::plain("e0").with_message("ctx");
    let layers: Vec<String> = err
        .layers()
        .map(|layer| layer.layer_message().to_string())
        .collect();
    assert_eq!(layers, ["ctx", "e0"]);
}

// ============================================================================
// Locations
// ============================================================================

#[test]
fn test_location_is_call_site() {
    let line = line!() + 1;
    let err = Error::plain("e0");
    let location = err.location().expect("native layers have a location");
    assert!(location.file().ends_with("tests.rs"));
    assert_eq!(location.line(), line);

    let line = line!() + 1;
    let err = err.wrap("ctx");
    assert_eq!(err.location().map(|l| l.line()), Some(line));
}

#[test]
fn test_result_ext_location_is_call_site() {
    fn fallible() -> Result<(), TestError> {
        Err(TestError::NotFound)
    }

    let line = line!() + 1;
    let err = fallible().wrap("looking up").unwrap_err();
    assert_eq!(err.location().map(|l| l.line()), Some(line));
    assert_eq!(err.to_string(), "looking up: not found");
}

#[test]
fn test_foreign_errors_have_no_location() {
    let err = Error::from(TestError::InvalidInput);
    assert!(err.location().is_none());
    assert!(err.stack().is_none());
    assert!(err.caused_by().is_none());
    assert_eq!(format!("{:+}", err), "invalid input");
}

// ============================================================================
// Option-level functions
// ============================================================================

#[test]
fn test_absent_errors_stay_absent() {
    assert!(wrap(None, "msg").is_none());
    assert!(with_stack(None).is_none());
    assert!(with_message(None, "x").is_none());
    assert!(crate::with_stack_skip(1, None).is_none());
    assert!(cause(None).is_none());
}

#[test]
fn test_cause_is_fixed_point() {
    let err = wrap(Some(Error::plain("e0")), "ctx").expect("present error stays present");
    let root = cause(Some(&err)).expect("root cause exists");
    assert_eq!(root.to_string(), "e0");
    let again = cause(Some(root)).expect("root cause exists");
    assert!(core::ptr::eq(root, again));
}

// ============================================================================
// Downcasting
// ============================================================================

#[test]
fn test_downcast_round_trip() {
    let err = Error::from(TestError::NotFound);
    assert_eq!(err.downcast_ref::<TestError>(), Some(&TestError::NotFound));

    let err = err.downcast::<Fundamental>().unwrap_err();
    assert_eq!(err.downcast::<TestError>().ok(), Some(TestError::NotFound));
}

#[test]
fn test_downcast_native_layer() {
    let err = Error::plain("e0").with_message("ctx");
    let wrapped = err.downcast::<Wrapped>().expect("outermost layer is Wrapped");
    assert_eq!(wrapped.message(), "ctx");
    assert_eq!(wrapped.cause().to_string(), "e0");
}

#[test]
fn test_find_walks_sources() {
    let err = Error::from(TestError::InvalidInput).wrap("a").with_stack().wrap("b");
    assert_eq!(err.find::<TestError>(), Some(&TestError::InvalidInput));
    assert!(err.is(&TestError::InvalidInput));
    assert!(!err.is(&TestError::NotFound));
    assert_eq!(err.chain().count(), 4);
}

// ============================================================================
// Kinds
// ============================================================================

#[test]
fn test_kind_labels_are_distinct() {
    let labels: HashSet<&str> = Kind::ALL.iter().map(|kind| kind.label()).collect();
    assert_eq!(labels.len(), Kind::ALL.len());
}

#[test]
fn test_kind_constructors_produce_their_own_kind() {
    let errors = [
        (kind::access_denied("x"), Kind::AccessDenied),
        (kind::already_exists("x"), Kind::AlreadyExists),
        (kind::bad_format("x"), Kind::BadFormat),
        (kind::conflicting_change("x"), Kind::ConflictingChange),
        (kind::data_load("x"), Kind::DataLoad),
        (kind::disabled("x"), Kind::Disabled),
        (kind::invalid_argument("x", "y"), Kind::InvalidArgument),
        (kind::io("x"), Kind::Io),
        (kind::limited("x"), Kind::Limited),
        (kind::network("x"), Kind::Network),
        (kind::not_found("x"), Kind::NotFound),
        (kind::uninitialized("x"), Kind::Uninitialized),
        (kind::unsupported_type("x"), Kind::UnsupportedType),
    ];
    for (err, expected) in &errors {
        assert_eq!(err.kind(), Some(*expected), "Got: {}", err);
        assert!(err.stack().is_some());
    }
}
