//! Deterministic, pure logic over block lists.
//!
//! Core modules must be free of I/O side effects. Functions that take a block
//! list document whether they require canonical order; callers normalize once
//! through [`crate::program::ProgramDefinition::order_block_definitions`]
//! instead of every helper re-checking.

pub mod availability;
pub mod block_tree;
pub mod invariants;
pub mod mutation;
pub mod ordering;
pub mod predicate_ordering;
pub mod types;
