//! File-backed program, catalog and config access.

pub mod catalog;
pub mod config;
pub mod program_store;
