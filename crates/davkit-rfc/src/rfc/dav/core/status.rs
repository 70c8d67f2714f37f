//! HTTP status carried inside multistatus `status` elements.

use std::fmt;

/// Status code from a `status` element, always in `100..=599`.
///
/// The reason phrase is not kept; servers localize it freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(u16);

impl Status {
    pub const OK: Self = Self(200);
    pub const CREATED: Self = Self(201);
    pub const FORBIDDEN: Self = Self(403);
    pub const NOT_FOUND: Self = Self(404);
    pub const CONFLICT: Self = Self(409);
    pub const FAILED_DEPENDENCY: Self = Self(424);
    pub const INSUFFICIENT_STORAGE: Self = Self(507);

    /// Wraps a code, rejecting values outside `100..=599`.
    #[must_use]
    pub const fn new(code: u16) -> Option<Self> {
        if code >= 100 && code <= 599 {
            Some(Self(code))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn code(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        self.0 >= 200 && self.0 <= 299
    }

    /// Parses `HTTP/<version> <code> [<reason>]`.
    ///
    /// The first token must name an HTTP version and the second must be
    /// exactly three digits.
    #[must_use]
    pub fn from_status_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();

        if !parts.next()?.starts_with("HTTP/") {
            return None;
        }

        let code = parts.next()?;
        if code.len() != 3 || !code.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        code.parse().ok().and_then(Self::new)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_with_reason() {
        assert_eq!(Status::from_status_line("HTTP/1.1 200 OK"), Some(Status::OK));
        assert_eq!(
            Status::from_status_line("HTTP/1.1 404 Not Found"),
            Some(Status::NOT_FOUND)
        );
        assert_eq!(
            Status::from_status_line("  HTTP/2 418 I'm a teapot ").map(Status::code),
            Some(418)
        );
    }

    #[test]
    fn status_line_without_reason() {
        assert_eq!(Status::from_status_line("HTTP/1.1 403"), Some(Status::FORBIDDEN));
    }

    #[test]
    fn malformed_status_lines() {
        for line in [
            "",
            "200 OK",
            "HTTP/1.1",
            "HTTP/1.1 abc OK",
            "HTTP/1.1 +20 OK",
            "HTTP/1.1 2000 OK",
            "HTTP/1.1 099 Low",
            "HTTP/1.1 600 High",
        ] {
            assert_eq!(Status::from_status_line(line), None, "{line:?}");
        }
    }

    #[test]
    fn success_range() {
        assert!(Status::CREATED.is_success());
        assert!(Status::new(299).is_some_and(Status::is_success));
        assert!(!Status::NOT_FOUND.is_success());
        assert_eq!(Status::new(42), None);
    }
}
