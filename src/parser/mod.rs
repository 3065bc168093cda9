//! Source parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST), diagnostics and recovery
//! - [`ast`]: AST node definitions, stored in an [`Arena`](crate::memory::Arena)
//!
//! # Supported Language
//!
//! - Declarations: `int name() { ... }`
//! - Statements: `return expr;`, `return;`, `expr;`, nested blocks
//! - Expressions: integer literals, grouping, unary `-`/`+`, binary `+ - * /`
//! - Comments: `//` and `/* */`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent for statements and declarations, Pratt
//! parsing for expressions. No external parser generator dependencies.

pub mod ast;
pub mod constants;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{parse_program, Diagnostic, ErrorSite, ParseError, ParseOutput, Parser};
