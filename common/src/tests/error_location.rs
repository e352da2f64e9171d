use crate::ErrorLocation;

/// **VALUE**: Verifies that `ErrorLocation::caller()` captures file, line, and column.
///
/// **WHY THIS MATTERS**: ErrorLocation is the foundation of error reporting in this
/// workspace. If it stops capturing accurate positions, every error message in the
/// session core loses its debugging value.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - `#[track_caller]` is removed from `ErrorLocation::caller()`
/// - File path extraction breaks
/// - Line/column capture fails
#[test]
fn given_caller_when_error_location_created_then_captures_file_line_column() {
    // GIVEN/WHEN: Capturing the current location
    let location = ErrorLocation::caller();

    // THEN: Should capture this file and a plausible position
    assert!(
        location.file.contains("error_location.rs"),
        "Should capture file path"
    );
    assert_eq!(location.line, 16, "Should capture correct line number");
    assert!(location.column > 0, "Should capture column number");
}

/// **VALUE**: Verifies that Display produces the "[file:line:column]" format.
///
/// **WHY THIS MATTERS**: Every error variant interpolates its location into the
/// message. If the format breaks, log lines lose the position information.
///
/// **BUG THIS CATCHES**: Would catch if:
/// - Display implementation drops the brackets or a component
/// - Format becomes inconsistent (wrong number of colons)
#[test]
fn given_error_location_when_formatted_then_produces_bracketed_format() {
    // GIVEN: An ErrorLocation
    let location = ErrorLocation::caller();

    // WHEN: Formatting as string
    let formatted = format!("{}", location);

    // THEN: Should produce "[file:line:column]" format
    assert!(formatted.starts_with('['), "Should start with '['");
    assert!(formatted.ends_with(']'), "Should end with ']'");
    assert!(
        formatted.contains("error_location.rs"),
        "Should include filename"
    );
    assert!(
        formatted.contains(&location.line.to_string()),
        "Should include line number"
    );
    assert_eq!(
        formatted.matches(':').count(),
        2,
        "Should have exactly 2 colons"
    );
}

/// **VALUE**: Verifies that `#[track_caller]` propagation gives each call site its
/// own location.
///
/// **WHY THIS MATTERS**: If propagation breaks, every error reports the same
/// constructor line instead of the actual error site, which makes the whole
/// location mechanism useless.
///
/// **BUG THIS CATCHES**: Would catch if an intermediate helper loses its
/// `#[track_caller]` attribute during refactoring.
#[test]
fn given_multiple_call_sites_when_capturing_location_then_each_has_unique_line() {
    // GIVEN: A helper that forwards the caller location
    #[track_caller]
    fn capture_location() -> ErrorLocation {
        ErrorLocation::caller()
    }

    // WHEN: Capturing from two different call sites
    let first = capture_location();
    let second = capture_location();

    // THEN: Same file, sequential lines
    assert_eq!(first.file, second.file, "Should have same file");
    assert_eq!(first.line + 1, second.line, "Lines should be sequential");
}
