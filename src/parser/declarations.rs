//! Declaration parsing implementation
//!
//! This module handles parsing of top-level declarations:
//!
//! - Function definitions: `int name() { ... }`
//!
//! # Grammar
//!
//! ```text
//! program     ::= declaration* EOF
//! declaration ::= function_def
//! function_def ::= "int" identifier "(" ")" block
//! ```
//!
//! Anything else at the top level is reported as `Expected declaration`; the
//! offending token is consumed so the program loop always makes progress.

use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Abort, ParseResult, Parser};

impl<'a> Parser<'a> {
    pub(crate) fn declaration(&mut self) -> ParseResult<'a> {
        if self.match_token(TokenKind::Int) {
            return self.parse_function_definition();
        }

        self.error_at_current("Expected declaration");
        self.advance();
        Err(Abort::Syntax)
    }

    /// Parse a function definition, return type already consumed
    fn parse_function_definition(&mut self) -> ParseResult<'a> {
        let return_type = self.previous;
        let name = self.expect_identifier("Expected function name")?;

        self.expect_lparen("after function name")?;
        self.expect_rparen("after '('")?;
        self.expect_lbrace("before function body")?;

        let body = self.parse_block()?;
        Ok(self.ast.function(name, return_type, body)?)
    }
}
