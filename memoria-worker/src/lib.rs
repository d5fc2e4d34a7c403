//! # Memoria Worker
//!
//! Image analysis for Memoria: the analyzers that turn an uploaded image into
//! text and tags, the job runner the API spawns per upload, and the recovery
//! loop that re-runs analysis tasks abandoned by a crashed process.
//!
//! ## Modules
//!
//! - `analyzer`: OCR analyzers (tesseract, mock) and tag extraction
//! - `runner`: executes one analysis task in its own transaction
//! - `recovery`: periodic sweep for stale tasks
//! - `config`: worker settings from the environment

pub mod analyzer;
pub mod config;
pub mod recovery;
pub mod runner;
