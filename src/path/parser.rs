//! Pattern string parser.
//!
//! Turns a pattern such as `a.*(!b,c).d` into a chain of [`Node`]s and
//! classifies it. Patterns without dynamic operators are additionally
//! flattened into a list of [`Segment`]s so they can be addressed directly.

use std::sync::Arc;

use super::ast::{
    ArrayPattern, DestructorExpression, DestructorPattern, Filter, GroupExpression, Identifier,
    Node, NodeKind, ObjectPattern, ObjectPatternProperty, PatternValue, RangeExpression, Wildcard,
};
use super::destructor::Destructor;
use super::error::ParseError;
use super::segment::{Segment, Segments};
use super::tokenizer::{Spanned, Token, Tokenizer};

/// Result of compiling a pattern string.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPattern {
    /// Root of the chain; `None` for an empty pattern.
    pub tree: Option<Node>,
    /// Flattened segments; empty for match patterns.
    pub segments: Segments,
    /// Contains a wildcard, expand, group or range operator.
    pub is_match_pattern: bool,
    /// Contains a wildcard operator.
    pub is_wild_match_pattern: bool,
    /// Contains an exclusion group.
    pub have_exclude_pattern: bool,
}

/// Recursive-descent parser for path patterns.
pub struct Parser {
    tokenizer: Tokenizer,
    current: Spanned,
    destructor_depth: usize,
    is_match_pattern: bool,
    is_wild_match_pattern: bool,
    have_exclude_pattern: bool,
}

impl Parser {
    /// Creates a new parser for the given pattern string.
    pub fn new(pattern: &str) -> Result<Self, ParseError> {
        let mut tokenizer = Tokenizer::new(pattern);
        let current = tokenizer.next_token(false)?;
        Ok(Self {
            tokenizer,
            current,
            destructor_depth: 0,
            is_match_pattern: false,
            is_wild_match_pattern: false,
            have_exclude_pattern: false,
        })
    }

    /// Parses the pattern string.
    pub fn parse(pattern: &str) -> Result<ParsedPattern, ParseError> {
        let mut parser = Parser::new(pattern)?;
        parser.parse_pattern()
    }

    fn parse_pattern(&mut self) -> Result<ParsedPattern, ParseError> {
        let tree = if self.current.token == Token::Eof {
            None
        } else {
            let node = self.parse_chain()?;
            if self.current.token != Token::Eof {
                return Err(self.unexpected("'.' or end of pattern"));
            }
            Some(node)
        };

        let segments = match (&tree, self.is_match_pattern) {
            (Some(node), false) => literal_segments(node),
            _ => Vec::new(),
        };

        Ok(ParsedPattern {
            tree,
            segments,
            is_match_pattern: self.is_match_pattern,
            is_wild_match_pattern: self.is_wild_match_pattern,
            have_exclude_pattern: self.have_exclude_pattern,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current = self.tokenizer.next_token(self.destructor_depth > 0)?;
        Ok(())
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match &self.current.token {
            Token::Eof => ParseError::UnexpectedEnd {
                expected: expected.to_string(),
            },
            token => ParseError::UnexpectedToken {
                position: self.current.position,
                found: token.describe(),
                expected: expected.to_string(),
            },
        }
    }

    fn expect(&mut self, token: Token, expected: &str) -> Result<(), ParseError> {
        if self.current.token == token {
            self.advance()
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Parses one segment and everything chained after it.
    fn parse_chain(&mut self) -> Result<Node, ParseError> {
        match self.current.token.clone() {
            Token::Name(name) => self.parse_identifier(name),
            Token::Star => self.parse_wildcard(),
            Token::Ignore(body) => self.parse_ignore(&body),
            Token::BraceL | Token::BracketL => self.parse_destructor_expression(),
            _ => Err(self.unexpected("segment")),
        }
    }

    /// Parses `.` followed by the next segment, if present.
    fn parse_after(&mut self) -> Result<Option<Node>, ParseError> {
        if self.current.token != Token::Dot {
            return Ok(None);
        }
        self.advance()?;
        let next = self.parse_chain()?;
        Ok(Some(Node::with_after(NodeKind::Dot, Some(next))))
    }

    /// Parses `name`, `name[0][1]` and `name~`.
    fn parse_identifier(&mut self, name: String) -> Result<Node, ParseError> {
        if name.is_empty() {
            return Err(ParseError::InvalidSyntax {
                message: format!("Empty identifier at position {}", self.current.position),
            });
        }
        self.advance()?;

        let mut indices = Vec::new();
        while self.current.token == Token::BracketL {
            self.advance()?;
            match self.current.token.clone() {
                Token::Name(index) if !index.is_empty() => indices.push(index),
                _ => return Err(self.unexpected("array index")),
            }
            self.advance()?;
            self.expect(Token::BracketR, "']'")?;
        }

        let expand = self.current.token == Token::Expand;
        if expand {
            self.is_match_pattern = true;
            self.advance()?;
        }

        let after = self.parse_after()?;
        let mut tail = if expand {
            Some(Node::with_after(NodeKind::Expand, after))
        } else {
            after
        };
        for index in indices.into_iter().rev() {
            let node = Node::with_after(
                NodeKind::Identifier(Identifier {
                    value: index,
                    array_index: true,
                }),
                tail,
            );
            tail = Some(Node::with_after(NodeKind::Dot, Some(node)));
        }

        Ok(Node::with_after(
            NodeKind::Identifier(Identifier {
                value: name,
                array_index: false,
            }),
            tail,
        ))
    }

    fn parse_wildcard(&mut self) -> Result<Node, ParseError> {
        self.is_match_pattern = true;
        self.is_wild_match_pattern = true;
        self.advance()?;

        let filter = match self.current.token {
            Token::ParenL => Some(Filter::Group(self.parse_group()?)),
            Token::BracketL => Some(Filter::Range(self.parse_range()?)),
            _ => None,
        };

        let after = self.parse_after()?;
        Ok(Node::with_after(NodeKind::Wildcard(Wildcard { filter }), after))
    }

    /// Parses `( [!] member, member, ... )`.
    fn parse_group(&mut self) -> Result<GroupExpression, ParseError> {
        self.advance()?;

        let is_exclude = self.current.token == Token::Bang;
        if is_exclude {
            self.have_exclude_pattern = true;
            self.advance()?;
        }

        let mut members = Vec::new();
        loop {
            if self.current.token == Token::Bang {
                return Err(ParseError::InvalidSyntax {
                    message: format!(
                        "'!' must lead the group, found at position {}",
                        self.current.position
                    ),
                });
            }
            members.push(self.parse_chain()?);
            match self.current.token {
                Token::Comma => self.advance()?,
                Token::ParenR => {
                    self.advance()?;
                    break;
                }
                _ => return Err(self.unexpected("',' or ')'")),
            }
        }

        Ok(GroupExpression {
            members,
            is_exclude,
        })
    }

    /// Parses `[start:end]`, `[start:]`, `[:end]`, `[:]` or `[n]`.
    fn parse_range(&mut self) -> Result<RangeExpression, ParseError> {
        self.advance()?;

        let start = self.parse_range_bound()?;
        let range = if self.current.token == Token::Colon {
            self.advance()?;
            let end = self.parse_range_bound()?;
            RangeExpression { start, end }
        } else if start.is_some() {
            RangeExpression { start, end: start }
        } else {
            return Err(match self.current.token {
                Token::BracketR => ParseError::InvalidSyntax {
                    message: format!("Empty range at position {}", self.current.position),
                },
                _ => self.unexpected("range bound"),
            });
        };

        self.expect(Token::BracketR, "']'")?;
        Ok(range)
    }

    fn parse_range_bound(&mut self) -> Result<Option<i64>, ParseError> {
        let Token::Name(bound) = self.current.token.clone() else {
            return Ok(None);
        };
        let value = bound
            .parse::<i64>()
            .map_err(|_| ParseError::InvalidSyntax {
                message: format!("Invalid range bound: {}", bound),
            })?;
        self.advance()?;
        Ok(Some(value))
    }

    fn parse_ignore(&mut self, body: &str) -> Result<Node, ParseError> {
        let value: String = body.chars().filter(|ch| !ch.is_whitespace()).collect();
        self.advance()?;
        let after = self.parse_after()?;
        Ok(Node::with_after(NodeKind::Ignore(value), after))
    }

    /// Parses a top-level `{...}` or `[...]` destructuring expression.
    fn parse_destructor_expression(&mut self) -> Result<Node, ParseError> {
        let start = self.current.position;
        self.destructor_depth += 1;

        let pattern = if self.current.token == Token::BraceL {
            DestructorPattern::Object(self.parse_object_pattern()?)
        } else {
            DestructorPattern::Array(self.parse_array_pattern()?)
        };

        // The closing bracket is still current; leave destructor context
        // before reading past it.
        let end = self.current.position + 1;
        self.destructor_depth -= 1;
        self.advance()?;

        if self.current.token == Token::Dot {
            return Err(ParseError::InvalidSyntax {
                message: format!(
                    "Destructuring expression must be the last segment (position {})",
                    self.current.position
                ),
            });
        }

        let source = self
            .tokenizer
            .slice(start, end)
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect();

        Ok(Node::new(NodeKind::Destructor(DestructorExpression {
            pattern,
            source,
        })))
    }

    /// Parses `{...}`, leaving the closing brace current.
    fn parse_object_pattern(&mut self) -> Result<ObjectPattern, ParseError> {
        self.advance()?;

        let mut properties = Vec::new();
        loop {
            match self.current.token.clone() {
                Token::BraceR => break,
                Token::Name(key) if !key.is_empty() => {
                    self.advance()?;
                    let value = if self.current.token == Token::Colon {
                        self.advance()?;
                        Some(self.parse_pattern_value()?)
                    } else {
                        None
                    };
                    properties.push(ObjectPatternProperty { key, value });

                    match self.current.token {
                        Token::Comma => self.advance()?,
                        Token::BraceR => break,
                        _ => return Err(self.unexpected("',' or '}'")),
                    }
                }
                _ => return Err(self.unexpected("property name")),
            }
        }

        Ok(ObjectPattern { properties })
    }

    /// Parses `[...]`, leaving the closing bracket current.
    fn parse_array_pattern(&mut self) -> Result<ArrayPattern, ParseError> {
        self.advance()?;

        let mut elements = Vec::new();
        loop {
            if self.current.token == Token::BracketR {
                break;
            }
            elements.push(self.parse_pattern_value()?);
            match self.current.token {
                Token::Comma => self.advance()?,
                Token::BracketR => break,
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }

        Ok(ArrayPattern { elements })
    }

    fn parse_pattern_value(&mut self) -> Result<PatternValue, ParseError> {
        match self.current.token.clone() {
            Token::Name(name) if !name.is_empty() => {
                self.advance()?;
                Ok(PatternValue::Identifier(name))
            }
            Token::BraceL => {
                let pattern = self.parse_object_pattern()?;
                self.advance()?;
                Ok(PatternValue::Object(pattern))
            }
            Token::BracketL => {
                let pattern = self.parse_array_pattern()?;
                self.advance()?;
                Ok(PatternValue::Array(pattern))
            }
            _ => Err(self.unexpected("identifier, '{' or '['")),
        }
    }
}

/// Flattens the chain of a literal pattern into segments.
fn literal_segments(tree: &Node) -> Segments {
    tree.chain()
        .filter_map(|node| match &node.kind {
            NodeKind::Identifier(identifier) => Some(Segment::from_name(&identifier.value)),
            NodeKind::Ignore(value) => Some(Segment::Key(value.clone())),
            NodeKind::Destructor(expression) => {
                Some(Segment::Destructor(Arc::new(Destructor::new(expression))))
            }
            NodeKind::Dot | NodeKind::Wildcard(_) | NodeKind::Expand => None,
        })
        .collect()
}
