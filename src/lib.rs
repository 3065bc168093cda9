//! # Introduction
//!
//! cinc parses a small C-like language into an arena-allocated syntax tree.
//! One pass reports every independent syntax error it can find.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → AST (in Arena)
//! ```
//!
//! 1. [`parser::lexer`]: produces tokens on demand, one at a time.
//! 2. [`parser::parse`]: Pratt parsing for expressions, recursive descent for
//!    statements and declarations, panic-mode error recovery.
//! 3. [`memory`]: the bump [`Arena`] every node and child list lives in. The
//!    tree borrows the arena and cannot outlive it.
//!
//! ## Example
//!
//! ```
//! use cinc::{parse_program, Arena};
//!
//! let arena = Arena::new().unwrap();
//! let program = parse_program("int main() { return (2 + 3) * 5; }", &arena).unwrap();
//! assert_eq!(
//!     program.to_string(),
//!     "(program (function int main (block (return (* (+ 2 3) 5)))))"
//! );
//! ```

pub mod memory;
pub mod parser;

pub use memory::{Arena, ArenaError};
pub use parser::ast::{Node, NodeKind, NodeRef};
pub use parser::{parse_program, Diagnostic, ParseError, ParseOutput, Parser};
