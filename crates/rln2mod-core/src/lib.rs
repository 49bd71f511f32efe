//! # rln2mod Core Library
//!
//! Converts particle tables written by RELION tomography pipelines (STAR files) into
//! IMOD point models, by way of a plain-text list of tomogram pixel coordinates.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer layout:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`ParticleTable`,
//!   `PixelCoordinate`, `TomogramDimensions`) and file I/O: the STAR reader and the
//!   point-list format consumed by `point2model`.
//!
//! - **[`engine`]: The Logic Core.** Pipeline configuration, the coordinate extractor,
//!   input discovery, the external converter abstraction and per-file conversion jobs.
//!
//! - **[`workflows`]: The Public API.** The batch conversion driver that ties discovery,
//!   extraction, serialization, conversion and artifact relocation together.

pub mod core;
pub mod engine;
pub mod workflows;
