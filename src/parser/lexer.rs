//! Lexer (tokenizer) for cinc source code
//!
//! Unlike a batch tokenizer, the [`Lexer`] is pulled one token at a time by
//! the parser through [`Lexer::next_token`]. Tokens borrow their lexeme from
//! the source buffer, so scanning never allocates.
//!
//! The lexer keeps no error list. An unrecognized character becomes a
//! [`TokenKind::Error`] token whose lexeme is a fixed message instead of
//! source text; surfacing it is the parser's job.

use super::ast::SourceLocation;
use std::fmt;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Single-character punctuation
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]
    Semicolon,    // ;

    // Operators
    Minus, // -
    Plus,  // +
    Star,  // *
    Slash, // /
    Equal, // =

    // Literals
    Identifier,
    Number,

    // Keywords
    Int,
    Return,

    Error,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::LeftBracket => "LEFT_BRACKET",
            TokenKind::RightBracket => "RIGHT_BRACKET",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Minus => "MINUS",
            TokenKind::Plus => "PLUS",
            TokenKind::Star => "STAR",
            TokenKind::Slash => "SLASH",
            TokenKind::Equal => "EQUAL",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Number => "NUMBER",
            TokenKind::Int => "INT",
            TokenKind::Return => "RETURN",
            TokenKind::Error => "ERROR",
            TokenKind::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// A token: its kind, the slice of source it covers and where it starts.
///
/// For [`TokenKind::Error`] the lexeme is the diagnostic message and `offset`
/// points at the offending character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub offset: usize,
    pub location: SourceLocation,
}

impl Token<'_> {
    pub fn len(&self) -> usize {
        self.lexeme.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexeme.is_empty()
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of file"),
            TokenKind::Error => write!(f, "error ({})", self.lexeme),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}

const UNEXPECTED_CHARACTER: &str = "Unexpected character.";
const UNTERMINATED_COMMENT: &str = "Unterminated block comment.";

/// Scanner state over one source buffer
pub struct Lexer<'src> {
    source: &'src str,
    start: usize,
    current: usize,
    line: usize,
    /// Offset of the first byte of the current line
    line_start: usize,
    done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            line_start: 0,
            done: false,
        }
    }

    /// Scan the next token. Once the end of input is reached every further
    /// call returns another `Eof`.
    pub fn next_token(&mut self) -> Token<'src> {
        if let Err(location) = self.skip_whitespace_and_comments() {
            return Token {
                location,
                ..self.error_token(UNTERMINATED_COMMENT)
            };
        }

        self.start = self.current;

        let Some(ch) = self.advance() else {
            return self.make_token(TokenKind::Eof);
        };

        match ch {
            '0'..='9' => self.number(),
            'a'..='z' | 'A'..='Z' | '_' => self.identifier(),

            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '{' => self.make_token(TokenKind::LeftBrace),
            '}' => self.make_token(TokenKind::RightBrace),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            ';' => self.make_token(TokenKind::Semicolon),
            '-' => self.make_token(TokenKind::Minus),
            '+' => self.make_token(TokenKind::Plus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),
            '=' => self.make_token(TokenKind::Equal),

            _ => self.error_token(UNEXPECTED_CHARACTER),
        }
    }

    /// Maximal run of decimal digits
    fn number(&mut self) -> Token<'src> {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
        self.make_token(TokenKind::Number)
    }

    /// Identifier or keyword
    fn identifier(&mut self) -> Token<'src> {
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }

        let kind = match &self.source[self.start..self.current] {
            "int" => TokenKind::Int,
            "return" => TokenKind::Return,
            _ => TokenKind::Identifier,
        };
        self.make_token(kind)
    }

    /// Skip whitespace, `// line` comments and `/* block */` comments.
    /// An unterminated block comment yields the location it opened at.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), SourceLocation> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => {
                    while !matches!(self.peek(), None | Some('\n')) {
                        self.advance();
                    }
                }
                Some('/') if self.peek_ahead(1) == Some('*') => {
                    self.start = self.current;
                    let opened_at = self.start_location();
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            None => return Err(opened_at),
                            Some('*') if self.peek_ahead(1) == Some('/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            Some(_) => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        Token {
            kind,
            lexeme: &self.source[self.start..self.current],
            offset: self.start,
            location: self.start_location(),
        }
    }

    fn error_token(&self, message: &'static str) -> Token<'src> {
        Token {
            kind: TokenKind::Error,
            lexeme: message,
            offset: self.start,
            location: self.start_location(),
        }
    }

    /// Location of `start`. Tokens never span lines, so the current line
    /// is the token's line.
    fn start_location(&self) -> SourceLocation {
        let column = self.start.saturating_sub(self.line_start) + 1;
        SourceLocation::new(self.line, column)
    }

    /// Peek at the current character without consuming it. A NUL byte ends
    /// the buffer just like the end of the string does.
    fn peek(&self) -> Option<char> {
        self.source[self.current..].chars().next().filter(|&c| c != '\0')
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.source[self.current..]
            .chars()
            .take_while(|&c| c != '\0')
            .nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.current += ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.line_start = self.current;
        }

        Some(ch)
    }
}

/// Yields every token up to and including the first `Eof`.
impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        if self.done {
            return None;
        }
        let token = self.next_token();
        self.done = token.kind == TokenKind::Eof;
        Some(token)
    }
}

/// Render the token stream of `source`, one `line:column KIND 'lexeme'`
/// entry per line. Debugging aid only.
pub fn dump_tokens(source: &str) -> String {
    Lexer::new(source)
        .map(|token| {
            format!(
                "{}:{} {} '{}'\n",
                token.location.line, token.location.column, token.kind, token.lexeme
            )
        })
        .collect()
}
