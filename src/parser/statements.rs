//! Statement parsing implementation
//!
//! This module handles the statement forms of the language:
//!
//! - Return statements: `return;` and `return expr;`
//! - Compound statements: `{ ... }`
//! - Expression statements: `expr;`
//!
//! # Grammar
//!
//! ```text
//! statement ::= return_stmt | block | expr_stmt
//! return_stmt ::= "return" expr? ";"
//! block     ::= "{" statement* "}"
//! expr_stmt ::= expr ";"
//! ```
//!
//! A block is also where recovery happens for statements: a statement that
//! fails is dropped, the parser resynchronizes, and the rest of the block is
//! still parsed.

use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Abort, ParseResult, Parser};

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> ParseResult<'a> {
        if self.match_token(TokenKind::Return) {
            return self.parse_return_statement();
        }

        if self.match_token(TokenKind::LeftBrace) {
            return self.nested("Block nested too deeply", Self::parse_block);
        }

        self.parse_expression_statement()
    }

    /// `expr ;`
    fn parse_expression_statement(&mut self) -> ParseResult<'a> {
        let expr = self.parse_expression()?;
        self.expect_semicolon("after expression")?;
        Ok(self.ast.expr_stmt(expr)?)
    }

    /// Parse return statement, `return` already consumed
    fn parse_return_statement(&mut self) -> ParseResult<'a> {
        let keyword = self.previous;

        if self.match_token(TokenKind::Semicolon) {
            return Ok(self.ast.return_stmt(keyword, None)?);
        }

        let expr = self.parse_expression()?;
        self.expect_semicolon("after return value")?;
        Ok(self.ast.return_stmt(keyword, Some(expr))?)
    }

    /// Parse block statements up to and including the closing brace; the
    /// opening `{` is already consumed.
    pub(crate) fn parse_block(&mut self) -> ParseResult<'a> {
        let brace = self.previous;
        let mut stmts = self.ast.list()?;

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            match self.parse_statement() {
                Ok(stmt) => stmts.push(self.ast.arena(), stmt)?,
                Err(Abort::Syntax) => {}
                Err(abort) => return Err(abort),
            }

            if self.panic_mode {
                self.synchronize();
            }
        }

        self.expect_rbrace("after block")?;
        Ok(self.ast.block(brace, stmts)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::arena::Arena;
    use crate::parser::ast::NodeKind;

    fn parse_body(source: &str) -> (String, usize) {
        let arena = Arena::with_capacity(64 * 1024).unwrap();
        let mut parser = Parser::new(source, &arena);
        assert!(parser.match_token(TokenKind::LeftBrace));
        let rendered = match parser.parse_block() {
            Ok(block) => block.to_string(),
            Err(_) => "<failed>".to_string(),
        };
        (rendered, parser.diagnostics().len())
    }

    #[test]
    fn test_expression_statement() {
        assert_eq!(parse_body("{ 1 + 2; }"), ("(block (expr (+ 1 2)))".to_string(), 0));
    }

    #[test]
    fn test_missing_semicolon() {
        let arena = Arena::with_capacity(4096).unwrap();
        let mut parser = Parser::new("1 + 2 }", &arena);
        assert!(matches!(parser.parse_statement(), Err(Abort::Syntax)));
        assert_eq!(parser.diagnostics().len(), 1);
        assert_eq!(
            parser.diagnostics()[0].message,
            "Expected ';' after expression"
        );
        assert_eq!(parser.current.kind, TokenKind::RightBrace);
    }

    #[test]
    fn test_return_forms() {
        assert_eq!(
            parse_body("{ return; return 0; }"),
            ("(block (return) (return 0))".to_string(), 0)
        );
    }

    #[test]
    fn test_nested_blocks() {
        assert_eq!(
            parse_body("{ { 1; } {} return 2; }"),
            ("(block (block (expr 1)) (block) (return 2))".to_string(), 0)
        );
    }

    #[test]
    fn test_return_keeps_keyword_token() {
        let arena = Arena::with_capacity(4096).unwrap();
        let mut parser = Parser::new("return 5;", &arena);
        let stmt = parser.parse_statement().unwrap();
        assert_eq!(stmt.token.kind, TokenKind::Return);
        match &stmt.kind {
            NodeKind::Return { expr: Some(expr) } => assert_eq!(expr.as_number(), Some(5)),
            other => panic!("Expected return with value, found {:?}", other),
        }
    }

    #[test]
    fn test_bad_statement_is_dropped_and_rest_kept() {
        let (rendered, errors) = parse_body("{ 1 + ; return 2; 3; return 4; }");
        assert_eq!(errors, 1);
        assert_eq!(rendered, "(block (return 2) (expr 3) (return 4))");
    }

    #[test]
    fn test_missing_semicolon_recovers_at_return() {
        let (rendered, errors) = parse_body("{ return 1 return 2; return 3; }");
        assert_eq!(errors, 1);
        assert_eq!(rendered, "(block (return 2) (return 3))");
    }

    #[test]
    fn test_one_error_per_bad_statement() {
        let (rendered, errors) = parse_body("{ * 1; 2; ) 3; return; }");
        assert_eq!(errors, 2);
        assert_eq!(rendered, "(block (expr 2) (return))");
    }

    #[test]
    fn test_lexer_error_inside_bad_statement() {
        let arena = Arena::with_capacity(64 * 1024).unwrap();
        let mut parser = Parser::new("{ 1 2 $ ; * ; return 3; }", &arena);
        assert!(parser.match_token(TokenKind::LeftBrace));
        let block = parser.parse_block().unwrap();

        let messages: Vec<&str> = parser
            .diagnostics()
            .iter()
            .map(|diagnostic| diagnostic.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec!["Expected ';' after expression", "Expected expression"]
        );
        assert_eq!(block.to_string(), "(block (return 3))");
        assert!(!parser.panic_mode);
    }

    #[test]
    fn test_block_nesting_limit() {
        let source = format!("{{ {}return 1;{} }}", "{".repeat(500), "}".repeat(500));
        let arena = Arena::with_capacity(1024 * 1024).unwrap();
        let mut parser = Parser::new(&source, &arena);
        assert!(parser.match_token(TokenKind::LeftBrace));
        let _ = parser.parse_block();

        assert_eq!(parser.diagnostics()[0].message, "Block nested too deeply");
        assert_eq!(parser.depth, 0);
    }

    #[test]
    fn test_unterminated_block() {
        let (rendered, errors) = parse_body("{ return 1;");
        assert_eq!(rendered, "<failed>");
        assert_eq!(errors, 1);
    }
}
