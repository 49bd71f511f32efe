//! Provides input/output for the file formats on either side of the pipeline.
//!
//! The STAR reader turns RELION particle tables into [`ParticleTable`]s, and the
//! point-list format writes the plain-text coordinates that `point2model` consumes.
//!
//! [`ParticleTable`]: crate::core::models::table::ParticleTable

pub mod points;
pub mod star;
pub mod traits;
