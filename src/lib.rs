//! kishop - a budget-aware shopping list
//!
//! This crate provides the core functionality for the `kishop` CLI and server.
//!
//! # Architecture
//!
//! - [`totals`] - Pure totals and budget classification
//! - [`list`] - The list state manager
//! - [`persistence`] - Local snapshot and remote HTTP adapters
//! - [`migrate`] - One-time move of local data to the server
//! - [`storage`] - SQLite database layer
//! - [`server`] - REST API over the database
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Paths and settings
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod list;
pub mod migrate;
pub mod model;
pub mod persistence;
pub mod server;
pub mod storage;
pub mod totals;

pub use error::{Error, Result};
