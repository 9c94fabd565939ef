use std::iter::Peekable;
use std::str::CharIndices;

use super::SyntaxError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Str(String),
    Number(String),
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Question,
    /// `@`
    At,
    /// `@@`
    AtAt,
    Dot,
    Comma,
    Equals,
    Colon,
    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

/// Split schema text into tokens. Comments are dropped, newlines are kept
/// because a field declaration ends at the end of its line.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, SyntaxError> {
        while let Some(c) = self.peek() {
            let (line, column) = (self.line, self.column);
            match c {
                '\n' => {
                    self.bump();
                    self.push(TokenKind::Newline, line, column);
                }
                c if c.is_whitespace() => {
                    self.bump();
                }
                '/' => self.comment(line, column)?,
                '"' => {
                    let value = self.string(line, column)?;
                    self.push(TokenKind::Str(value), line, column);
                }
                '@' => {
                    self.bump();
                    if self.peek() == Some('@') {
                        self.bump();
                        self.push(TokenKind::AtAt, line, column);
                    } else {
                        self.push(TokenKind::At, line, column);
                    }
                }
                c if c.is_ascii_digit() || c == '-' => {
                    let value =
                        self.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'));
                    self.push(TokenKind::Number(value), line, column);
                }
                c if c.is_alphabetic() || c == '_' => {
                    let value = self.take_while(|c| c.is_alphanumeric() || c == '_');
                    self.push(TokenKind::Ident(value), line, column);
                }
                _ => {
                    let kind = match c {
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '[' => TokenKind::LBracket,
                        ']' => TokenKind::RBracket,
                        '?' => TokenKind::Question,
                        '.' => TokenKind::Dot,
                        ',' => TokenKind::Comma,
                        '=' => TokenKind::Equals,
                        ':' => TokenKind::Colon,
                        other => {
                            return Err(SyntaxError::new(
                                line,
                                column,
                                format!("unexpected character {other:?}"),
                            ));
                        }
                    };
                    self.bump();
                    self.push(kind, line, column);
                }
            }
        }

        let (line, column) = (self.line, self.column);
        self.push(TokenKind::Eof, line, column);
        Ok(self.tokens)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn bump(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn push(&mut self, kind: TokenKind, line: usize, column: usize) {
        self.tokens.push(Token { kind, line, column });
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if !accept(c) {
                break;
            }
            value.push(c);
            self.bump();
        }
        value
    }

    fn comment(&mut self, line: usize, column: usize) -> Result<(), SyntaxError> {
        self.bump();
        if self.peek() != Some('/') {
            return Err(SyntaxError::new(line, column, "unexpected character '/'"));
        }
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        Ok(())
    }

    fn string(&mut self, line: usize, column: usize) -> Result<String, SyntaxError> {
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(other) => value.push(other),
                    None => break,
                },
                Some('\n') | None => break,
                Some(c) => value.push(c),
            }
        }
        Err(SyntaxError::new(line, column, "unterminated string literal"))
    }
}
