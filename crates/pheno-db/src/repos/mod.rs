//! Read operations for every join the measurement engine consumes.
//!
//! Each module adds methods to `PhenoDb` via `impl PhenoDb` blocks.

pub mod annotations;
pub mod available;
pub mod catalog;
pub mod contexts;
pub mod locator;
pub mod measurements;
pub mod media;
pub mod metadata;
pub mod qc;
