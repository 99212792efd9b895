//! Character-level tokenizer for path patterns.

use super::error::ParseError;

/// A lexical token of the pattern grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Run of non-reserved characters, escapes already resolved
    Name(String),
    /// Body of a `[[ ... ]]` literal, escaped brackets resolved
    Ignore(String),
    Star,
    Bang,
    Dot,
    Expand,
    Comma,
    Colon,
    ParenL,
    ParenR,
    BracketL,
    BracketR,
    BraceL,
    BraceR,
    Eof,
}

impl Token {
    /// Text used when reporting this token in an error.
    pub fn describe(&self) -> String {
        match self {
            Token::Name(name) => name.clone(),
            Token::Ignore(body) => format!("[[{}]]", body),
            Token::Star => "*".to_string(),
            Token::Bang => "!".to_string(),
            Token::Dot => ".".to_string(),
            Token::Expand => "~".to_string(),
            Token::Comma => ",".to_string(),
            Token::Colon => ":".to_string(),
            Token::ParenL => "(".to_string(),
            Token::ParenR => ")".to_string(),
            Token::BracketL => "[".to_string(),
            Token::BracketR => "]".to_string(),
            Token::BraceL => "{".to_string(),
            Token::BraceR => "}".to_string(),
            Token::Eof => "end of pattern".to_string(),
        }
    }
}

/// A token and the character offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

fn is_reserved(ch: char) -> bool {
    matches!(
        ch,
        '*' | '.' | '!' | '[' | ']' | '(' | ')' | ',' | ':' | '~' | '{' | '}'
    )
}

/// Pull-based tokenizer; the parser asks for one token at a time and says
/// whether it is inside a destructuring expression, where `[[` is two
/// opening brackets rather than a literal escape.
pub struct Tokenizer {
    chars: Vec<char>,
    position: usize,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            position: 0,
        }
    }

    /// Returns the text between two character offsets.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start.min(self.chars.len())..end.min(self.chars.len())]
            .iter()
            .collect()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    /// Reads the next token.
    pub fn next_token(&mut self, in_destructor: bool) -> Result<Spanned, ParseError> {
        self.skip_whitespace();
        let position = self.position;
        let Some(ch) = self.peek() else {
            return Ok(Spanned {
                token: Token::Eof,
                position,
            });
        };

        let token = match ch {
            '[' if !in_destructor && self.peek_at(1) == Some('[') => {
                self.position += 2;
                Token::Ignore(self.read_ignore_body()?)
            }
            '*' => Token::Star,
            '!' => Token::Bang,
            '.' => Token::Dot,
            '~' => Token::Expand,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '(' => Token::ParenL,
            ')' => Token::ParenR,
            '[' => Token::BracketL,
            ']' => Token::BracketR,
            '{' => Token::BraceL,
            '}' => Token::BraceR,
            _ => Token::Name(self.read_name()),
        };
        if !matches!(token, Token::Name(_) | Token::Ignore(_)) {
            self.position += 1;
        }

        Ok(Spanned { token, position })
    }

    /// Reads a name; `\X` keeps `X` literally and drops the backslash.
    fn read_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.position += 1;
                if let Some(escaped) = self.peek() {
                    name.push(escaped);
                    self.position += 1;
                }
                continue;
            }
            if ch.is_whitespace() || is_reserved(ch) {
                break;
            }
            name.push(ch);
            self.position += 1;
        }
        name
    }

    /// Reads up to the first unescaped `]]`, which is consumed.
    fn read_ignore_body(&mut self) -> Result<String, ParseError> {
        let mut body = String::new();
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::UnexpectedEnd {
                        expected: "']]'".to_string(),
                    })
                }
                Some('\\') if matches!(self.peek_at(1), Some('[') | Some(']')) => {
                    if let Some(bracket) = self.peek_at(1) {
                        body.push(bracket);
                    }
                    self.position += 2;
                }
                Some(']') if self.peek_at(1) == Some(']') => {
                    self.position += 2;
                    return Ok(body);
                }
                Some(ch) => {
                    body.push(ch);
                    self.position += 1;
                }
            }
        }
    }
}
