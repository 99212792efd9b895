//! Concrete path segments.

use std::fmt;
use std::sync::Arc;

use super::destructor::Destructor;

/// One atomic key of a concrete path.
///
/// Object keys and array indices are the usual cases. A destructuring
/// expression such as `{a,b:c}` is also a segment: it is addressed like a
/// key but reads and writes through its compiled rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Named key (`a`, `foo-bar`, `a.*[1]` when escaped)
    Key(String),
    /// Array index (`0`, `[3]`)
    Index(usize),
    /// Destructuring expression (`{a,b}`, `[x,y]`)
    Destructor(Arc<Destructor>),
}

/// An ordered sequence of segments. Order is addressing order.
pub type Segments = Vec<Segment>;

impl Segment {
    /// Builds a segment from a bare name, turning all-digit names into
    /// indices.
    pub fn from_name(name: &str) -> Self {
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = name.parse::<usize>() {
                return Segment::Index(index);
            }
        }
        Segment::Key(name.to_string())
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            Segment::Index(index) => Some(*index),
            _ => None,
        }
    }

    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }

    /// Returns the destructuring expression if this segment is one.
    pub fn as_destructor(&self) -> Option<&Destructor> {
        match self {
            Segment::Destructor(destructor) => Some(destructor),
            _ => None,
        }
    }

    /// Key used when this segment addresses an object entry.
    pub(crate) fn object_key(&self) -> String {
        match self {
            Segment::Key(key) => key.clone(),
            Segment::Index(index) => index.to_string(),
            Segment::Destructor(destructor) => destructor.source().to_string(),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Index(index) => write!(f, "{}", index),
            Segment::Destructor(destructor) => write!(f, "{}", destructor.source()),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl From<i32> for Segment {
    fn from(index: i32) -> Self {
        usize::try_from(index)
            .map(Segment::Index)
            .unwrap_or_else(|_| Segment::Key(index.to_string()))
    }
}

/// Joins segments with `.`, the canonical rendering of a literal path.
pub fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".")
}

/// Builds a [`Segments`] vector from keys and indices.
///
/// ```
/// use pathquill::{segments, Segment};
///
/// let path = segments!["a", 49, "s"];
/// assert_eq!(path[1], Segment::Index(49));
/// ```
#[macro_export]
macro_rules! segments {
    () => {
        ::std::vec::Vec::<$crate::Segment>::new()
    };
    ($($segment:expr),+ $(,)?) => {
        ::std::vec![$($crate::Segment::from($segment)),+]
    };
}
