//! Program definitions: block ordering, predicate availability and
//! structural edits.
//!
//! A program is an ordered list of blocks (form sections). Some blocks are
//! enumerators and others repeat under them, forming a tree that must be laid
//! out depth-first. Predicates on a block may only read answers collected
//! before the block is shown.
//!
//! - **[`core`]**: Pure, deterministic logic over block lists (ordering,
//!   slices, availability, predicate ordering, mutation). No I/O.
//! - **[`program`]**: The immutable [`program::ProgramDefinition`] value that
//!   normalizes once and delegates to `core`.
//! - **[`io`]**: Program, catalog and config files.
//!
//! Orchestration modules ([`validate`], [`inspect`], [`edit`]) coordinate
//! the program value with I/O to implement CLI commands.

pub mod core;
pub mod edit;
pub mod error;
pub mod exit_codes;
pub mod inspect;
pub mod io;
pub mod logging;
pub mod predicate;
pub mod program;
pub mod question;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
pub mod workspace;
