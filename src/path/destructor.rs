//! Destructuring expressions (`{a,b:c}`, `[x,y]`).
//!
//! A destructuring expression is compiled once into a flat list of
//! [`Rule`]s. Each rule pairs a location on the flat side (the value handed
//! to or returned from the accessor) with a location inside the nested
//! container. Reading, writing, deleting and existence checks are all
//! per-rule delegations to the plain accessors.

use std::fmt;

use serde_json::{Map, Value};

use super::accessor;
use super::ast::{
    ArrayPattern, DestructorExpression, DestructorPattern, NodeKind, ObjectPattern, PatternValue,
};
use super::error::ParseError;
use super::parser::Parser;
use super::segment::{Segment, Segments};

/// Shape of the flat value produced by a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestructorKind {
    Object,
    Array,
}

/// One key remapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Location on the flat side.
    pub key: Segments,
    /// Location inside the nested container.
    pub path: Segments,
}

/// A compiled destructuring expression.
#[derive(Clone)]
pub struct Destructor {
    source: String,
    kind: DestructorKind,
    rules: Vec<Rule>,
}

impl Destructor {
    /// Compiles the rules of a parsed destructuring expression.
    pub fn new(expression: &DestructorExpression) -> Self {
        let mut rules = Vec::new();
        let kind = match &expression.pattern {
            DestructorPattern::Object(pattern) => {
                compile_object(pattern, &[], &[], &mut rules);
                DestructorKind::Object
            }
            DestructorPattern::Array(pattern) => {
                compile_array(pattern, &[], &[], &mut rules);
                DestructorKind::Array
            }
        };
        log::trace!(
            "Compiled destructor {} into {} rules",
            expression.source,
            rules.len()
        );

        Self {
            source: expression.source.clone(),
            kind,
            rules,
        }
    }

    /// Parses and compiles a standalone expression such as `{a,b:c}`.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let parsed = Parser::parse(source)?;
        match parsed.tree.as_ref().map(|tree| &tree.kind) {
            Some(NodeKind::Destructor(expression)) => Ok(Self::new(expression)),
            _ => Err(ParseError::InvalidSyntax {
                message: format!("Not a destructuring expression: {}", source),
            }),
        }
    }

    /// Normalized source text, whitespace removed.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> DestructorKind {
        self.kind
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Builds the flat value from `source`. Rules whose value is absent
    /// are skipped.
    pub fn read(&self, source: Option<&Value>) -> Value {
        let mut result = match self.kind {
            DestructorKind::Object => Value::Object(Map::new()),
            DestructorKind::Array => Value::Array(Vec::new()),
        };
        let Some(source) = source else {
            return result;
        };

        for rule in &self.rules {
            if let Some(value) = accessor::get_in(source, &rule.path) {
                let value = value.into_owned();
                accessor::set_in(&mut result, &rule.key, value);
            }
        }
        result
    }

    /// Spreads the flat `value` into `target`, leaving uncovered keys alone.
    pub fn write(&self, target: &mut Value, value: &Value) {
        for rule in &self.rules {
            if let Some(item) = accessor::get_in(value, &rule.key) {
                let item = item.into_owned();
                accessor::set_in(target, &rule.path, item);
            }
        }
    }

    /// Removes every location the rules point at.
    pub fn delete(&self, target: &mut Value) {
        for rule in &self.rules {
            accessor::delete_in(target, &rule.path);
        }
    }

    /// Whether every location the rules point at exists.
    pub fn exists(&self, source: &Value) -> bool {
        self.rules
            .iter()
            .all(|rule| accessor::exist_in(source, &rule.path, 0))
    }
}

impl PartialEq for Destructor {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl fmt::Debug for Destructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destructor")
            .field("source", &self.source)
            .field("kind", &self.kind)
            .field("rules", &self.rules.len())
            .finish()
    }
}

fn prefixed(prefix: &[Segment], segment: Segment) -> Segments {
    let mut segments = prefix.to_vec();
    segments.push(segment);
    segments
}

fn compile_object(
    pattern: &ObjectPattern,
    key_prefix: &[Segment],
    path_prefix: &[Segment],
    rules: &mut Vec<Rule>,
) {
    for property in &pattern.properties {
        let path = prefixed(path_prefix, Segment::from_name(&property.key));
        match &property.value {
            None => rules.push(Rule {
                key: prefixed(key_prefix, Segment::from_name(&property.key)),
                path,
            }),
            Some(PatternValue::Identifier(name)) => rules.push(Rule {
                key: prefixed(key_prefix, Segment::from_name(name)),
                path,
            }),
            Some(PatternValue::Object(nested)) => compile_object(nested, key_prefix, &path, rules),
            Some(PatternValue::Array(nested)) => compile_array(nested, key_prefix, &path, rules),
        }
    }
}

fn compile_array(
    pattern: &ArrayPattern,
    key_prefix: &[Segment],
    path_prefix: &[Segment],
    rules: &mut Vec<Rule>,
) {
    for (index, element) in pattern.elements.iter().enumerate() {
        let key = prefixed(key_prefix, Segment::Index(index));
        match element {
            PatternValue::Identifier(name) => rules.push(Rule {
                key,
                path: prefixed(path_prefix, Segment::from_name(name)),
            }),
            PatternValue::Object(nested) => compile_object(nested, &key, path_prefix, rules),
            PatternValue::Array(nested) => compile_array(nested, &key, path_prefix, rules),
        }
    }
}
