//! # Memoria Shared Library
//!
//! Data layer shared by the API server and the analysis worker.
//!
//! ## Module Organization
//!
//! - `db`: connection pool and embedded migrations
//! - `models`: entities and their queries
//! - `auth`: password hashing
//! - `storage`: upload paths and file writes
//! - `memories`: the image slide feed
//! - `predictions`: suggested reminders

pub mod auth;
pub mod db;
pub mod memories;
pub mod models;
pub mod predictions;
pub mod storage;

/// Current version of the Memoria shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
