//! Component id type and process-wide unique id allocation.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;

/// Unique id of a component.
///
/// Ids are allocated from a single process-wide counter (see [`next_id`]),
/// so a component id identifies its component across every session and
/// window of the server. The value `0` is reserved and never allocated; it
/// stands for "no component" ([`Id::NONE`]).
///
/// The wire format is plain base-10 digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Id(pub u64);

/// Error returned when a string is not a valid component id.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid component id: {text:?}")]
pub struct ParseIdError {
    /// The rejected input.
    pub text: String,
}

impl Id {
    /// The reserved "no component" id.
    pub const NONE: Id = Id(0);

    /// Tells if this id is the reserved "no component" id.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Id {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(Id).map_err(|_| ParseIdError {
            text: s.to_string(),
        })
    }
}

/// Last allocated id value. The first call to [`next_id`] returns 1.
static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Allocates a new unique component id.
///
/// Safe for concurrent callers: allocations are totally ordered and no value
/// is ever repeated.
#[must_use]
pub fn next_id() -> Id {
    Id(LAST_ID.fetch_add(1, Ordering::Relaxed) + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_small_and_large() {
        for i in 0u64..512 {
            let id = Id(i);
            assert_eq!(id.to_string().parse::<Id>().unwrap(), id);
        }
        for i in (u64::MAX - 512)..=u64::MAX {
            let id = Id(i);
            assert_eq!(id.to_string().parse::<Id>().unwrap(), id);
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<Id>().is_err());
        assert!("x12".parse::<Id>().is_err());
        assert!("-1".parse::<Id>().is_err());
        assert!("12 ".parse::<Id>().is_err());
    }

    #[test]
    fn allocation_is_monotonic() {
        let a = next_id();
        let b = next_id();
        let c = next_id();
        assert!(a < b && b < c);
        assert!(!a.is_none());
    }
}
