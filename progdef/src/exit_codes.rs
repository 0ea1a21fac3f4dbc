//! Stable exit codes for progdef CLI commands.

/// Command succeeded.
pub const OK: i32 = 0;
/// Invalid config, catalog or program file, or any other failure.
pub const INVALID: i32 = 1;
/// A referenced block (or enumerator) does not exist in the program.
pub const BLOCK_NOT_FOUND: i32 = 2;
/// `progdef move` would put a predicate before a question it reads.
pub const ILLEGAL_PREDICATE_ORDERING: i32 = 3;
