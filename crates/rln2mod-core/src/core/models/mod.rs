//! # Core Models Module
//!
//! Data structures shared by the reader, the extractor and the point-list writer.
//!
//! - [`table`] - Column-named particle tables as read from a STAR data block
//! - [`coordinate`] - Tomogram dimensions and corner-origin pixel coordinates

pub mod coordinate;
pub mod table;
