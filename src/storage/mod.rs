//! SQLite storage layer for kishop.
//!
//! This module provides the relational store behind the REST API:
//! - WAL mode for concurrent reads
//! - A single-row budget table and a position-ordered item table
//! - Transaction discipline for the bulk replace
//!
//! # Submodules
//!
//! - [`schema`] - Database schema definitions
//! - [`sqlite`] - Main SQLite storage implementation

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStorage, StoredItem};
