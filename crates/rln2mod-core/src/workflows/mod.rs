//! # Workflows Module
//!
//! Top-level entry points that tie the engine together.
//!
//! - **Batch Conversion** ([`convert`]) - Discover every particle table in a directory and
//!   convert each one into a model file, collecting a per-file report.

pub mod convert;
