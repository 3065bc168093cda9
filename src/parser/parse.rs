//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including error types, token helpers, panic-mode recovery and the parse
//! entry points.
//!
//! # Parser Architecture
//!
//! - This module: Parser state, token helpers, error reporting, recovery
//! - `expressions`: Pratt parsing driven by a per-token rule table
//! - `statements`: `return`, expression statements and blocks
//! - `declarations`: top-level function declarations
//!
//! Parser methods are split across these files using `impl Parser` blocks,
//! each module extending the Parser while sharing its state.
//!
//! # Error recovery
//!
//! The first syntax error in a region is recorded and puts the parser into
//! panic mode; further errors are swallowed until [`Parser::synchronize`]
//! reaches a statement or declaration boundary. Parsing then carries on, so
//! one pass reports every independent mistake. A single recorded error
//! still fails the whole parse.

use super::ast::{AstBuilder, NodeRef, SourceLocation};
use super::constants::MAX_NESTING_DEPTH;
use super::lexer::{Lexer, Token, TokenKind};
use crate::memory::arena::{Arena, ArenaError};
use std::fmt;
use thiserror::Error;

/// Where a diagnostic points in relation to its token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorSite {
    /// Reported at end of input
    End,
    /// Reported at a token with this source text
    Lexeme(String),
    /// The token was a lexer error; its message says it all
    Lexical,
}

impl fmt::Display for ErrorSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSite::End => write!(f, ", at end"),
            ErrorSite::Lexeme(text) => write!(f, ", at '{}'", text),
            ErrorSite::Lexical => Ok(()),
        }
    }
}

/// One reported syntax error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at {location}{site}: {message}")]
pub struct Diagnostic {
    pub message: String,
    pub location: SourceLocation,
    pub site: ErrorSite,
}

/// Why a parse produced no program
#[derive(Debug, Error)]
pub enum ParseError {
    /// The source has syntax errors; every reported diagnostic is kept
    #[error("{} syntax error(s), first: {}", .0.len(), first_message(.0))]
    Syntax(Vec<Diagnostic>),

    /// The arena ran out of room. Not a property of the source.
    #[error("out of AST memory: {0}")]
    Arena(#[from] ArenaError),
}

impl ParseError {
    /// Syntax diagnostics, empty for arena failures
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            ParseError::Syntax(diagnostics) => diagnostics,
            ParseError::Arena(_) => &[],
        }
    }
}

fn first_message(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Failure signal threaded through the parse functions.
///
/// `Syntax` means the error was already recorded (or suppressed by panic
/// mode) and the caller should give up on the current node; block and
/// program loops catch it and resynchronize. `Arena` is fatal and goes all
/// the way out.
#[derive(Debug)]
pub(crate) enum Abort {
    Syntax,
    Arena(ArenaError),
}

impl From<ArenaError> for Abort {
    fn from(err: ArenaError) -> Self {
        Abort::Arena(err)
    }
}

pub(crate) type ParseResult<'a> = Result<NodeRef<'a>, Abort>;

/// Tree built by [`Parser::parse_with_recovery`] plus everything reported
/// along the way. With any diagnostic present the tree is partial.
#[derive(Debug)]
pub struct ParseOutput<'a> {
    pub program: NodeRef<'a>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput<'_> {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Pratt / recursive descent parser for the cinc language
pub struct Parser<'a> {
    pub(crate) lexer: Lexer<'a>,
    pub(crate) ast: AstBuilder<'a>,
    pub(crate) current: Token<'a>,
    pub(crate) previous: Token<'a>,
    /// Set by the first error, never cleared
    pub(crate) had_error: bool,
    /// Set by an error, cleared by `synchronize`
    pub(crate) panic_mode: bool,
    pub(crate) diagnostics: Vec<Diagnostic>,
    /// Open groupings, unary operands and blocks around the current token
    pub(crate) depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser over `source` that allocates its tree in `arena`.
    pub fn new(source: &'a str, arena: &'a Arena) -> Self {
        let start = Token {
            kind: TokenKind::Eof,
            lexeme: "",
            offset: 0,
            location: SourceLocation::new(1, 1),
        };

        let mut parser = Self {
            lexer: Lexer::new(source),
            ast: AstBuilder::new(arena),
            current: start,
            previous: start,
            had_error: false,
            panic_mode: false,
            diagnostics: Vec::new(),
            depth: 0,
        };
        parser.advance();
        parser
    }

    /// Parse the entire program. Succeeds only if not a single error was
    /// reported.
    pub fn parse_program(self) -> Result<NodeRef<'a>, ParseError> {
        let output = self.parse_with_recovery()?;

        if !output.is_clean() {
            return Err(ParseError::Syntax(output.diagnostics));
        }

        Ok(output.program)
    }

    /// Parse the entire program, recovering from syntax errors. The returned
    /// tree holds every declaration that parsed; it must not be treated as
    /// a valid program unless the diagnostics are empty.
    pub fn parse_with_recovery(mut self) -> Result<ParseOutput<'a>, ArenaError> {
        let first = self.current;
        let mut decls = self.ast.list()?;

        while !self.is_at_end() {
            match self.declaration() {
                Ok(decl) => decls.push(self.ast.arena(), decl)?,
                Err(Abort::Syntax) => {}
                Err(Abort::Arena(err)) => return Err(err),
            }

            if self.panic_mode {
                self.synchronize();
            }
        }

        let program = self.ast.program(first, decls)?;

        tracing::debug!(
            declarations = program.items().map_or(0, |decls| decls.len()),
            errors = self.diagnostics.len(),
            arena_used = self.ast.arena().used(),
            "parsed program"
        );

        Ok(ParseOutput {
            program,
            diagnostics: self.diagnostics,
        })
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    // ===== Error reporting =====

    /// Record an error at `token` unless already panicking.
    pub(crate) fn error_at(&mut self, token: Token<'a>, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;
        self.had_error = true;

        let site = match token.kind {
            TokenKind::Eof => ErrorSite::End,
            TokenKind::Error => ErrorSite::Lexical,
            _ => ErrorSite::Lexeme(token.lexeme.to_string()),
        };

        let diagnostic = Diagnostic {
            message: message.to_string(),
            location: token.location,
            site,
        };
        tracing::debug!(%diagnostic, "syntax error");
        self.diagnostics.push(diagnostic);
    }

    /// Error at the token just consumed
    pub(crate) fn error(&mut self, message: &str) {
        self.error_at(self.previous, message);
    }

    pub(crate) fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current, message);
    }

    /// Skip tokens up to the next statement or declaration boundary (just
    /// past a `;`, at `int` / `return`, or at end of input), then leave
    /// panic mode.
    ///
    /// Lexer errors among the skipped tokens stay suppressed. A `}` is not a
    /// boundary: when the bad statement is the last one in its block, the
    /// closing brace is skipped and the block runs on into what follows.
    pub(crate) fn synchronize(&mut self) {
        while !self.is_at_end() {
            if self.previous.kind == TokenKind::Semicolon {
                break;
            }
            if matches!(self.current.kind, TokenKind::Int | TokenKind::Return) {
                break;
            }
            self.advance();
        }

        self.panic_mode = false;

        tracing::trace!(
            line = self.current.location.line,
            column = self.current.location.column,
            "resynchronized"
        );
    }

    /// Run `parse` one nesting level deeper. Past [`MAX_NESTING_DEPTH`]
    /// levels `message` is reported at the current token instead.
    pub(crate) fn nested<T>(
        &mut self,
        message: &str,
        parse: impl FnOnce(&mut Self) -> Result<T, Abort>,
    ) -> Result<T, Abort> {
        if self.depth >= MAX_NESTING_DEPTH {
            self.error_at_current(message);
            return Err(Abort::Syntax);
        }

        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ===== Helper methods =====

    /// Move to the next token. Lexer error tokens are reported here and
    /// skipped, so `current` is never an error token.
    pub(crate) fn advance(&mut self) {
        self.previous = self.current;

        loop {
            self.current = self.lexer.next_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            let bad = self.current;
            self.error_at(bad, bad.lexeme);
        }
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Consume a `kind` token or report `message` at the current token.
    pub(crate) fn expect_token(&mut self, kind: TokenKind, message: &str) -> Result<(), Abort> {
        if self.match_token(kind) {
            Ok(())
        } else {
            self.error_at_current(message);
            Err(Abort::Syntax)
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<(), Abort> {
        self.expect_token(TokenKind::LeftParen, &format!("Expected '(' {ctx}"))
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<(), Abort> {
        self.expect_token(TokenKind::RightParen, &format!("Expected ')' {ctx}"))
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<(), Abort> {
        self.expect_token(TokenKind::LeftBrace, &format!("Expected '{{' {ctx}"))
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<(), Abort> {
        self.expect_token(TokenKind::RightBrace, &format!("Expected '}}' {ctx}"))
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<(), Abort> {
        self.expect_token(TokenKind::Semicolon, &format!("Expected ';' {ctx}"))
    }

    pub(crate) fn expect_identifier(&mut self, message: &str) -> Result<Token<'a>, Abort> {
        self.expect_token(TokenKind::Identifier, message)?;
        Ok(self.previous)
    }
}

/// Parse `source` into a `Program` tree allocated in `arena`.
///
/// Fails with [`ParseError::Syntax`] if any error was reported, even when
/// most of the source parsed, and with [`ParseError::Arena`] if the arena
/// ran out of room.
pub fn parse_program<'a>(source: &'a str, arena: &'a Arena) -> Result<NodeRef<'a>, ParseError> {
    Parser::new(source, arena).parse_program()
}
