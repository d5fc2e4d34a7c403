//! # Memoria API Server Library
//!
//! HTTP layer for Memoria: reminders, events, folders, file and image
//! uploads, plus the memories feed and reminder suggestions.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `forms`: Form and multipart field parsing
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod forms;
pub mod routes;
