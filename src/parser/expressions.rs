//! Expression parsing implementation
//!
//! Expressions are parsed with a Pratt (precedence climbing) parser. Every
//! token kind maps to a [`ParseRule`]: an optional prefix rule (how to start
//! an expression with this token), an optional infix rule (how to continue
//! one), and the binding precedence of the infix use.
//!
//! # Supported Expressions
//!
//! - Integer literals
//! - Grouping: `( expr )`
//! - Unary `-` and `+`
//! - Binary `+ - * /`
//!
//! # Precedence
//!
//! Lowest to highest: `None < Assignment < Term < Factor < Unary < Primary`.
//! A binary operator parses its right operand one level above its own
//! precedence, which makes equal-precedence chains group to the left:
//! `2 - 3 - 4` is `(2 - 3) - 4`. A right-associative operator would parse
//! the right operand at its own level instead.
//!
//! The rule table is a `match` over [`TokenKind`] with no wildcard arm, so
//! adding a token kind forces a decision about its rule.

use crate::parser::ast::NodeRef;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Abort, ParseResult, Parser};

/// Binding power, lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Precedence {
    None,
    Assignment,
    Term,   // + -
    Factor, // * /
    Unary,  // - +
    Primary,
}

impl Precedence {
    /// One level tighter
    fn next(self) -> Self {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary | Precedence::Primary => Precedence::Primary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrefixRule {
    Number,
    Grouping,
    Unary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InfixRule {
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ParseRule {
    pub prefix: Option<PrefixRule>,
    pub infix: Option<InfixRule>,
    pub precedence: Precedence,
}

impl ParseRule {
    const fn new(
        prefix: Option<PrefixRule>,
        infix: Option<InfixRule>,
        precedence: Precedence,
    ) -> Self {
        Self {
            prefix,
            infix,
            precedence,
        }
    }
}

const NO_RULE: ParseRule = ParseRule::new(None, None, Precedence::None);

/// The rule table
pub(crate) fn rule(kind: TokenKind) -> ParseRule {
    use InfixRule::Binary;
    use PrefixRule::{Grouping, Number, Unary};

    match kind {
        TokenKind::LeftParen => ParseRule::new(Some(Grouping), None, Precedence::None),
        TokenKind::Minus => ParseRule::new(Some(Unary), Some(Binary), Precedence::Term),
        TokenKind::Plus => ParseRule::new(Some(Unary), Some(Binary), Precedence::Term),
        TokenKind::Star => ParseRule::new(None, Some(Binary), Precedence::Factor),
        TokenKind::Slash => ParseRule::new(None, Some(Binary), Precedence::Factor),
        TokenKind::Number => ParseRule::new(Some(Number), None, Precedence::None),

        TokenKind::RightParen
        | TokenKind::LeftBrace
        | TokenKind::RightBrace
        | TokenKind::LeftBracket
        | TokenKind::RightBracket
        | TokenKind::Semicolon
        | TokenKind::Equal
        | TokenKind::Identifier
        | TokenKind::Int
        | TokenKind::Return
        | TokenKind::Error
        | TokenKind::Eof => NO_RULE,
    }
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_expression(&mut self) -> ParseResult<'a> {
        self.parse_precedence(Precedence::Assignment)
    }

    /// Parse an expression whose operators all bind at least as tightly as
    /// `min`.
    pub(crate) fn parse_precedence(&mut self, min: Precedence) -> ParseResult<'a> {
        self.nested("Expression nested too deeply", |parser| {
            parser.parse_operators(min)
        })
    }

    fn parse_operators(&mut self, min: Precedence) -> ParseResult<'a> {
        self.advance();

        let Some(prefix) = rule(self.previous.kind).prefix else {
            self.error("Expected expression");
            return Err(Abort::Syntax);
        };

        let mut left = match prefix {
            PrefixRule::Number => self.parse_number()?,
            PrefixRule::Grouping => self.parse_grouping()?,
            PrefixRule::Unary => self.parse_unary()?,
        };

        loop {
            let next = rule(self.current.kind);
            let Some(infix) = next.infix else { break };
            if next.precedence < min {
                break;
            }

            self.advance();
            left = match infix {
                InfixRule::Binary => self.parse_binary(left)?,
            };
        }

        Ok(left)
    }

    /// Integer literal. The value always comes from the literal's text.
    fn parse_number(&mut self) -> ParseResult<'a> {
        let token = self.previous;

        match token.lexeme.parse::<i64>() {
            Ok(value) => Ok(self.ast.number(token, value)?),
            Err(_) => {
                self.error("Integer literal out of range");
                Err(Abort::Syntax)
            }
        }
    }

    /// `( expr )`. No node of its own: the inner expression is returned.
    fn parse_grouping(&mut self) -> ParseResult<'a> {
        let expr = self.parse_expression()?;
        self.expect_rparen("after expression")?;
        Ok(expr)
    }

    /// Prefix `-` / `+`
    fn parse_unary(&mut self) -> ParseResult<'a> {
        let op = self.previous;
        let operand = self.parse_precedence(Precedence::Unary)?;
        Ok(self.ast.unary(op, operand)?)
    }

    /// Infix `+ - * /` with `left` already parsed
    fn parse_binary(&mut self, left: NodeRef<'a>) -> ParseResult<'a> {
        let op = self.previous;
        let right = self.parse_precedence(rule(op.kind).precedence.next())?;
        Ok(self.ast.binary(op, left, right)?)
    }
}
