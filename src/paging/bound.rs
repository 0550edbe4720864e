//! Possibly-unbounded result quantities
//!
//! Page sizes, the number of results required for paging and the number of
//! permission-valid items requested are all either a finite count or
//! unbounded. Arithmetic saturates to `Unbounded`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A result count that may be unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultBound {
    /// A concrete number of results
    Finite(usize),
    /// No upper limit
    Unbounded,
}

impl ResultBound {
    /// Returns true if unbounded
    pub fn is_unbounded(&self) -> bool {
        matches!(self, ResultBound::Unbounded)
    }

    /// Returns the finite value, if any
    pub fn finite(&self) -> Option<usize> {
        match self {
            ResultBound::Finite(n) => Some(*n),
            ResultBound::Unbounded => None,
        }
    }

    /// Saturating addition; overflow becomes `Unbounded`
    pub fn saturating_add(self, other: ResultBound) -> ResultBound {
        match (self, other) {
            (ResultBound::Finite(a), ResultBound::Finite(b)) => a
                .checked_add(b)
                .map_or(ResultBound::Unbounded, ResultBound::Finite),
            _ => ResultBound::Unbounded,
        }
    }

    /// Saturating multiplication by a finite factor
    ///
    /// A zero factor yields zero even for an unbounded value.
    pub fn saturating_mul(self, factor: usize) -> ResultBound {
        if factor == 0 {
            return ResultBound::Finite(0);
        }
        match self {
            ResultBound::Finite(n) => n
                .checked_mul(factor)
                .map_or(ResultBound::Unbounded, ResultBound::Finite),
            ResultBound::Unbounded => ResultBound::Unbounded,
        }
    }

    /// Adds one to a finite bound; `Unbounded` stays unbounded
    pub fn increment(self) -> ResultBound {
        self.saturating_add(ResultBound::Finite(1))
    }

    /// True when `len` is strictly greater than this bound
    pub fn is_exceeded_by(&self, len: usize) -> bool {
        match self {
            ResultBound::Finite(n) => len > *n,
            ResultBound::Unbounded => false,
        }
    }

    /// True when this bound is strictly greater than `len`
    pub fn exceeds(&self, len: usize) -> bool {
        match self {
            ResultBound::Finite(n) => *n > len,
            ResultBound::Unbounded => true,
        }
    }

    /// True when `len` items satisfy this bound
    pub fn is_satisfied_by(&self, len: usize) -> bool {
        match self {
            ResultBound::Finite(n) => len >= *n,
            ResultBound::Unbounded => false,
        }
    }
}

impl From<usize> for ResultBound {
    fn from(n: usize) -> Self {
        ResultBound::Finite(n)
    }
}

impl From<Option<usize>> for ResultBound {
    fn from(n: Option<usize>) -> Self {
        n.map_or(ResultBound::Unbounded, ResultBound::Finite)
    }
}

impl fmt::Display for ResultBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultBound::Finite(n) => write!(f, "{}", n),
            ResultBound::Unbounded => write!(f, "unbounded"),
        }
    }
}
