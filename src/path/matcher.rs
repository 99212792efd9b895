//! Matches concrete segment sequences against compiled pattern trees.

use super::ast::{Filter, GroupExpression, Identifier, Node, NodeKind, RangeExpression, Wildcard};
use super::segment::Segment;

const LITERAL_SCORE: u32 = 4;
const PREFIX_SCORE: u32 = 3;
const RANGE_SCORE: u32 = 2;
const WILDCARD_SCORE: u32 = 1;
const EXCLUSION_SCORE: u32 = 0;

/// Outcome of a match along with its specificity score.
///
/// Scores only matter relative to each other: literal segments outrank
/// prefix matches, which outrank ranges, bare wildcards and exclusions in
/// that order. A failed match always scores zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchRecord {
    pub matched: bool,
    pub score: u32,
}

impl MatchRecord {
    pub fn unmatched() -> Self {
        Self::default()
    }
}

/// Walks a candidate path against a pattern tree.
///
/// Group-filtered wildcards push a frame while their members run, so nested
/// literals can tell whether an enclosing wildcard still has a continuation
/// to consume the remaining segments.
pub struct Matcher<'a> {
    tree: &'a Node,
    candidate: Vec<String>,
    pos: usize,
    stack: Vec<&'a Node>,
    score: u32,
}

impl<'a> Matcher<'a> {
    pub fn new(tree: &'a Node) -> Self {
        Self {
            tree,
            candidate: Vec::new(),
            pos: 0,
            stack: Vec::new(),
            score: 0,
        }
    }

    /// Matches `candidate` against the tree.
    pub fn match_path(&mut self, candidate: &[Segment]) -> MatchRecord {
        self.candidate = candidate.iter().map(ToString::to_string).collect();
        self.pos = 0;
        self.stack.clear();
        self.score = 0;

        if self.candidate.is_empty() {
            return MatchRecord::unmatched();
        }

        if self.match_node(self.tree) {
            MatchRecord {
                matched: true,
                score: self.score,
            }
        } else {
            MatchRecord::unmatched()
        }
    }

    fn current(&self) -> Option<&str> {
        self.candidate.get(self.pos).map(String::as_str)
    }

    /// A chain may stop here when this is the last segment, or when every
    /// open wildcard still has a continuation to consume what remains.
    fn may_end_here(&self) -> bool {
        self.pos + 1 >= self.candidate.len()
            || (!self.stack.is_empty() && self.stack.iter().all(|frame| frame.after.is_some()))
    }

    fn match_node(&mut self, node: &'a Node) -> bool {
        match &node.kind {
            NodeKind::Identifier(identifier) => self.match_identifier(node, identifier),
            NodeKind::Ignore(value) => self.match_literal(node, value),
            NodeKind::Destructor(expression) => self.match_literal(node, &expression.source),
            NodeKind::Expand => self.match_next(node.after()),
            NodeKind::Wildcard(wildcard) => self.match_wildcard(node, wildcard),
            NodeKind::Dot => {
                self.pos += 1;
                self.match_next(node.after())
            }
        }
    }

    fn match_next(&mut self, after: Option<&'a Node>) -> bool {
        match after {
            Some(node) => self.match_node(node),
            None => self.pos < self.candidate.len(),
        }
    }

    fn match_identifier(&mut self, node: &'a Node, identifier: &Identifier) -> bool {
        let (expand, after) = match node.after() {
            Some(next) if next.kind == NodeKind::Expand => (true, next.after()),
            other => (false, other),
        };
        if after.is_none() && !self.may_end_here() {
            return false;
        }

        let matched = match self.current() {
            Some(current) if expand => current.starts_with(identifier.value.as_str()),
            Some(current) => current == identifier.value,
            None => false,
        };
        if !matched {
            return false;
        }

        self.score += if expand { PREFIX_SCORE } else { LITERAL_SCORE };
        self.match_next(after)
    }

    /// Ignore and destructor literals compare with whitespace removed.
    fn match_literal(&mut self, node: &'a Node, value: &str) -> bool {
        if node.after.is_none() && !self.may_end_here() {
            return false;
        }

        let matched = self
            .current()
            .is_some_and(|current| strip_whitespace(current) == value);
        if !matched {
            return false;
        }

        self.score += LITERAL_SCORE;
        self.match_next(node.after())
    }

    fn match_wildcard(&mut self, node: &'a Node, wildcard: &'a Wildcard) -> bool {
        if self.pos >= self.candidate.len() {
            return match &wildcard.filter {
                Some(Filter::Group(group)) if group.is_exclude => self.continue_after(node),
                _ => false,
            };
        }

        match &wildcard.filter {
            None => {
                self.score += WILDCARD_SCORE;
                self.match_next(node.after())
            }
            Some(Filter::Group(group)) => self.match_group(node, group),
            Some(Filter::Range(range)) => self.match_range(node, range),
        }
    }

    fn match_group(&mut self, node: &'a Node, group: &'a GroupExpression) -> bool {
        let pos = self.pos;
        let score = self.score;

        if group.is_exclude {
            self.stack.push(node);
            let mut excluded = false;
            for member in &group.members {
                let hit = self.match_node(member);
                self.pos = pos;
                self.score = score;
                if hit {
                    excluded = true;
                    break;
                }
            }
            self.stack.pop();

            if excluded {
                return false;
            }
            self.score += EXCLUSION_SCORE;
            return self.continue_after(node);
        }

        for member in &group.members {
            self.pos = pos;
            self.score = score;

            self.stack.push(node);
            let hit = self.match_node(member);
            self.stack.pop();

            if hit && self.continue_after(node) {
                return true;
            }
        }

        self.pos = pos;
        self.score = score;
        false
    }

    fn match_range(&mut self, node: &'a Node, range: &RangeExpression) -> bool {
        let in_range = self
            .current()
            .and_then(|current| current.parse::<i64>().ok())
            .is_some_and(|value| range.contains(value));
        if !in_range {
            return false;
        }

        self.score += RANGE_SCORE;
        self.match_next(node.after())
    }

    fn continue_after(&mut self, node: &'a Node) -> bool {
        match node.after() {
            Some(after) => self.match_node(after),
            None => true,
        }
    }
}

/// Compares two literal paths segment by segment.
pub fn match_segments(source: &[Segment], target: &[Segment]) -> MatchRecord {
    let equal = source.len() == target.len()
        && source
            .iter()
            .zip(target)
            .all(|(left, right)| left.to_string() == right.to_string());
    if equal {
        MatchRecord {
            matched: true,
            score: LITERAL_SCORE * source.len() as u32,
        }
    } else {
        MatchRecord::unmatched()
    }
}

pub(crate) fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}
