// AST (Abstract Syntax Tree) definitions for the cinc front end
//
// Every node lives in an `Arena` and is referenced as `&'a Node<'a>`. The
// tree is strict: a node is owned by exactly one parent and nothing is
// shared, so there are no cycles. Nodes are immutable once built; the two
// list-carrying kinds (`Block`, `Program`) are filled through a `NodeList`
// before their node is created.

use super::constants::NODE_LIST_INITIAL_CAPACITY;
use super::lexer::Token;
use crate::memory::arena::{Arena, ArenaError};
use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

pub type NodeRef<'a> = &'a Node<'a>;

/// A tree node plus the token that best represents it: the operator for
/// binary/unary nodes, the keyword for `return`, the name for functions.
#[derive(Debug)]
pub struct Node<'a> {
    pub token: Token<'a>,
    pub kind: NodeKind<'a>,
}

#[derive(Debug)]
pub enum NodeKind<'a> {
    // Expressions
    Number(i64),
    /// Not produced by the current grammar
    Identifier,
    Binary {
        left: NodeRef<'a>,
        right: NodeRef<'a>,
    },
    Unary {
        operand: NodeRef<'a>,
    },

    // Statements
    ExprStmt {
        expr: NodeRef<'a>,
    },
    Return {
        expr: Option<NodeRef<'a>>,
    },
    Block {
        stmts: NodeList<'a>,
    },

    // Declarations
    Function {
        name: Token<'a>,
        return_type: Token<'a>,
        body: NodeRef<'a>,
    },
    /// Not produced by the current grammar
    VarDecl {
        var_type: Token<'a>,
        init: Option<NodeRef<'a>>,
    },

    Program {
        decls: NodeList<'a>,
    },
}

impl NodeKind<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Number(_) => "Number",
            NodeKind::Identifier => "Identifier",
            NodeKind::Binary { .. } => "Binary",
            NodeKind::Unary { .. } => "Unary",
            NodeKind::ExprStmt { .. } => "ExprStmt",
            NodeKind::Return { .. } => "Return",
            NodeKind::Block { .. } => "Block",
            NodeKind::Function { .. } => "Function",
            NodeKind::VarDecl { .. } => "VarDecl",
            NodeKind::Program { .. } => "Program",
        }
    }
}

impl<'a> Node<'a> {
    /// Value of a `Number` node
    pub fn as_number(&self) -> Option<i64> {
        match self.kind {
            NodeKind::Number(value) => Some(value),
            _ => None,
        }
    }

    /// Statements of a `Block` or declarations of a `Program`
    pub fn items(&self) -> Option<&NodeList<'a>> {
        match &self.kind {
            NodeKind::Block { stmts } => Some(stmts),
            NodeKind::Program { decls } => Some(decls),
            _ => None,
        }
    }
}

/// Renders the subtree as an s-expression, e.g. `(* (+ 2 3) 5)`.
impl fmt::Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Number(value) => write!(f, "{}", value),
            NodeKind::Identifier => write!(f, "{}", self.token.lexeme),
            NodeKind::Binary { left, right } => {
                write!(f, "({} {} {})", self.token.lexeme, left, right)
            }
            NodeKind::Unary { operand } => write!(f, "({} {})", self.token.lexeme, operand),
            NodeKind::ExprStmt { expr } => write!(f, "(expr {})", expr),
            NodeKind::Return { expr: Some(expr) } => write!(f, "(return {})", expr),
            NodeKind::Return { expr: None } => write!(f, "(return)"),
            NodeKind::Block { stmts } => write_list(f, "block", stmts),
            NodeKind::Function {
                name,
                return_type,
                body,
            } => write!(
                f,
                "(function {} {} {})",
                return_type.lexeme, name.lexeme, body
            ),
            NodeKind::VarDecl {
                var_type,
                init: Some(init),
            } => write!(f, "(var {} {} {})", var_type.lexeme, self.token.lexeme, init),
            NodeKind::VarDecl {
                var_type,
                init: None,
            } => write!(f, "(var {} {})", var_type.lexeme, self.token.lexeme),
            NodeKind::Program { decls } => write_list(f, "program", decls),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, head: &str, list: &NodeList<'_>) -> fmt::Result {
    write!(f, "({}", head)?;
    for node in list.iter() {
        write!(f, " {}", node)?;
    }
    write!(f, ")")
}

/// Growable, arena-backed sequence of child nodes.
///
/// Starts at [`NODE_LIST_INITIAL_CAPACITY`] slots and doubles when full by
/// allocating a fresh slice from the arena and copying the existing entries
/// over. The arena never reclaims the old slice; the space is wasted until
/// the arena itself is cleared or dropped.
pub struct NodeList<'a> {
    slots: &'a mut [Option<NodeRef<'a>>],
    len: usize,
}

impl<'a> NodeList<'a> {
    pub fn new(arena: &'a Arena) -> Result<Self, ArenaError> {
        let slots = arena.alloc_slice_fill_copy(NODE_LIST_INITIAL_CAPACITY, None)?;
        Ok(Self { slots, len: 0 })
    }

    /// Append `node`, growing the backing slice if needed.
    pub fn push(&mut self, arena: &'a Arena, node: NodeRef<'a>) -> Result<(), ArenaError> {
        if self.len == self.slots.len() {
            let capacity = (self.slots.len() * 2).max(NODE_LIST_INITIAL_CAPACITY);
            let grown = arena.alloc_slice_fill_copy(capacity, None)?;
            grown[..self.len].copy_from_slice(&self.slots[..self.len]);
            self.slots = grown;
        }

        self.slots[self.len] = Some(node);
        self.len += 1;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<NodeRef<'a>> {
        self.slots[..self.len].get(index).copied().flatten()
    }

    /// Children in insertion order
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'a>> + '_ {
        self.slots[..self.len].iter().flatten().copied()
    }
}

impl fmt::Debug for NodeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Node constructors. Every one of them allocates from the arena and fails
/// only when the arena is exhausted.
#[derive(Clone, Copy)]
pub struct AstBuilder<'a> {
    arena: &'a Arena,
}

impl<'a> AstBuilder<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self { arena }
    }

    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    fn node(&self, token: Token<'a>, kind: NodeKind<'a>) -> Result<NodeRef<'a>, ArenaError> {
        let node: &'a mut Node<'a> = self.arena.alloc(Node { token, kind })?;
        Ok(node)
    }

    pub fn number(&self, token: Token<'a>, value: i64) -> Result<NodeRef<'a>, ArenaError> {
        self.node(token, NodeKind::Number(value))
    }

    pub fn binary(
        &self,
        op: Token<'a>,
        left: NodeRef<'a>,
        right: NodeRef<'a>,
    ) -> Result<NodeRef<'a>, ArenaError> {
        self.node(op, NodeKind::Binary { left, right })
    }

    pub fn unary(&self, op: Token<'a>, operand: NodeRef<'a>) -> Result<NodeRef<'a>, ArenaError> {
        self.node(op, NodeKind::Unary { operand })
    }

    /// Wraps `expr`, reusing its token.
    pub fn expr_stmt(&self, expr: NodeRef<'a>) -> Result<NodeRef<'a>, ArenaError> {
        self.node(expr.token, NodeKind::ExprStmt { expr })
    }

    pub fn return_stmt(
        &self,
        keyword: Token<'a>,
        expr: Option<NodeRef<'a>>,
    ) -> Result<NodeRef<'a>, ArenaError> {
        self.node(keyword, NodeKind::Return { expr })
    }

    /// An empty list to collect block statements or declarations into
    pub fn list(&self) -> Result<NodeList<'a>, ArenaError> {
        NodeList::new(self.arena)
    }

    pub fn block(&self, brace: Token<'a>, stmts: NodeList<'a>) -> Result<NodeRef<'a>, ArenaError> {
        self.node(brace, NodeKind::Block { stmts })
    }

    pub fn function(
        &self,
        name: Token<'a>,
        return_type: Token<'a>,
        body: NodeRef<'a>,
    ) -> Result<NodeRef<'a>, ArenaError> {
        self.node(
            name,
            NodeKind::Function {
                name,
                return_type,
                body,
            },
        )
    }

    pub fn program(&self, first: Token<'a>, decls: NodeList<'a>) -> Result<NodeRef<'a>, ArenaError> {
        self.node(first, NodeKind::Program { decls })
    }
}
