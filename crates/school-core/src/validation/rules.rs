//! Pure field predicates.
//!
//! Patterns are compiled once and shared. None of these functions allocate on
//! the happy path or have side effects.

use std::sync::LazyLock;

use regex::Regex;

/// `local@domain.tld`: one `@`, no whitespace, at least two domain labels.
/// Both sides are dot-separated runs of non-empty labels.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s.]+(\.[^@\s.]+)*@[^@\s.]+(\.[^@\s.]+)+$").expect("email pattern compiles")
});

/// Scheme followed by at least one non-space character.
static URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://\S+$").expect("url pattern compiles"));

/// Three ASCII letters then three ASCII digits, e.g. `REG123`.
static COURSE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{3}[0-9]{3}$").expect("course code pattern compiles"));

/// Required text is present when it has at least one non-whitespace character.
#[must_use]
pub fn is_present(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Optional text is present when it is `Some` and non-blank.
#[must_use]
pub fn is_present_opt(value: Option<&str>) -> bool {
    value.is_some_and(is_present)
}

#[must_use]
pub fn is_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Starts with exactly one `http://` or `https://` and carries no second scheme marker.
#[must_use]
pub fn is_url(value: &str) -> bool {
    URL.is_match(value) && value.matches("://").count() == 1
}

#[must_use]
pub fn is_course_code(value: &str) -> bool {
    COURSE_CODE.is_match(value)
}

/// Parse the editable text form of an integer field.
#[must_use]
pub fn parse_integer(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

/// Inclusive range check. `NaN` is never in range.
#[must_use]
pub fn in_range(value: f64, min: f64, max: f64) -> bool {
    (min..=max).contains(&value)
}
