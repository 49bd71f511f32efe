//! # Core Module
//!
//! Fundamental data structures and file formats for the conversion pipeline.
//!
//! - **Data Models** ([`models`]) - Particle tables, tomogram dimensions and pixel coordinates
//! - **File I/O** ([`io`]) - The STAR table reader and the intermediate point-list format

pub mod io;
pub mod models;
