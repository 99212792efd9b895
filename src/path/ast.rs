//! Abstract syntax tree types for path patterns.
//!
//! A compiled pattern is a singly-linked chain of [`Node`]s: every node
//! carries an optional `after` link to the node matched against the
//! following segment, mirroring the dot-separated layout of the source.

/// A node of a compiled pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    /// Next node in the chain.
    pub after: Option<Box<Node>>,
}

/// The closed set of pattern node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Literal segment (`a`, `0`, `a\.b`)
    Identifier(Identifier),
    /// Segment separator (`.`)
    Dot,
    /// Any single segment, optionally filtered (`*`, `*(a,b)`, `*[1:3]`)
    Wildcard(Wildcard),
    /// Prefix match of the preceding identifier (`aa~`)
    Expand,
    /// Whitespace-insensitive literal (`[[a.b]]`)
    Ignore(String),
    /// Structural reshape (`{a,b:c}`, `[x,y]`)
    Destructor(DestructorExpression),
}

/// Literal segment match.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub value: String,
    /// Set when written with bracket index sugar (`a[0]`).
    pub array_index: bool,
}

/// Wildcard operator with its optional filter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wildcard {
    pub filter: Option<Filter>,
}

/// Filter attached to a wildcard.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Group(GroupExpression),
    Range(RangeExpression),
}

/// Alternation (`*(a,b)`) or exclusion (`*(!a,b)`) of member chains.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupExpression {
    pub members: Vec<Node>,
    pub is_exclude: bool,
}

/// Inclusive numeric bounds; an absent bound is unconstrained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RangeExpression {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl RangeExpression {
    pub fn contains(&self, value: i64) -> bool {
        self.start.map_or(true, |start| value >= start) && self.end.map_or(true, |end| value <= end)
    }
}

/// A destructuring expression together with its normalized source text.
#[derive(Debug, Clone, PartialEq)]
pub struct DestructorExpression {
    pub pattern: DestructorPattern,
    /// Source with all whitespace removed, e.g. `{a,b:c}`.
    pub source: String,
}

/// Top-level shape of a destructuring expression.
#[derive(Debug, Clone, PartialEq)]
pub enum DestructorPattern {
    Object(ObjectPattern),
    Array(ArrayPattern),
}

/// `{key, key: value, ...}`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectPattern {
    pub properties: Vec<ObjectPatternProperty>,
}

/// One property of an object pattern. `value` absent means the target key
/// equals the source key.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPatternProperty {
    pub key: String,
    pub value: Option<PatternValue>,
}

/// `[element, ...]`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArrayPattern {
    pub elements: Vec<PatternValue>,
}

/// A value position inside a destructuring template.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternValue {
    Identifier(String),
    Object(ObjectPattern),
    Array(ArrayPattern),
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, after: None }
    }

    pub fn with_after(kind: NodeKind, after: Option<Node>) -> Self {
        Self {
            kind,
            after: after.map(Box::new),
        }
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Identifier(Identifier {
            value: value.into(),
            array_index: false,
        }))
    }

    pub fn after(&self) -> Option<&Node> {
        self.after.as_deref()
    }

    /// Iterates over this node and every node reachable through `after`.
    pub fn chain(&self) -> impl Iterator<Item = &Node> {
        std::iter::successors(Some(self), |node| node.after())
    }
}
