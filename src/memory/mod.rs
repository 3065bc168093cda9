//! Memory management for the parser
//!
//! - [`arena`]: fixed-capacity bump arena that owns every AST node
//!
//! There is no per-node deallocation. A parse borrows one [`Arena`] for its
//! whole run and all nodes it builds die together when the arena is cleared
//! or dropped.

pub mod arena;

pub use arena::{Arena, ArenaError};
