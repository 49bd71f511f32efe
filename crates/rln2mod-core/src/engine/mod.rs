//! # Engine Module
//!
//! The building blocks of a conversion run: locating particle tables, turning their
//! rows into pixel coordinates, and driving the external model converter.
//!
//! - **Configuration** ([`config`]) - Tomogram dimensions, directories and batch policies
//! - **Discovery** ([`discovery`]) - Selecting candidate tables in the working directory
//! - **Extraction** ([`extractor`]) - Centered Angstrom to corner-origin pixel conversion
//! - **Conversion** ([`converter`], [`job`]) - Point list output and model generation per file
//! - **Progress Monitoring** ([`progress`]) - Callbacks for front-ends
//! - **Error Handling** ([`error`]) - Per-file and run-level error types

pub mod config;
pub mod converter;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod job;
pub mod progress;
