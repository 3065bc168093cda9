// Constants for the parser

/// Slots a fresh [`NodeList`](super::ast::NodeList) starts with.
/// Lists double from there.
pub const NODE_LIST_INITIAL_CAPACITY: usize = 8;

/// Deepest nesting of groupings, unary operators and blocks the parser
/// follows before reporting an error
pub const MAX_NESTING_DEPTH: usize = 128;
