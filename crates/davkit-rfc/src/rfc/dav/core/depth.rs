//! The `Depth` request header (RFC 4918 §10.2).

use std::fmt;

/// How far below the target resource a request applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Target only: `getProperties` and `sync-collection`.
    Zero,
    /// Target and its members: `listChildren`.
    One,
    /// Whole subtree. Never sent by the client; servers may refuse it.
    Infinity,
}

impl Depth {
    pub const HEADER: &'static str = "Depth";

    /// Header text: `0`, `1` or `infinity`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::One => "1",
            Self::Infinity => "infinity",
        }
    }

    /// The `(name, value)` header pair for this depth.
    #[must_use]
    pub const fn header(self) -> (&'static str, &'static str) {
        (Self::HEADER, self.as_str())
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_pairs() {
        assert_eq!(Depth::Zero.header(), ("Depth", "0"));
        assert_eq!(Depth::One.header(), ("Depth", "1"));
        assert_eq!(Depth::Infinity.to_string(), "infinity");
    }
}
