//! # pheno-core
//!
//! Core types shared across all phenoview crates.
//!
//! This crate provides:
//! - Read-projection entities for measurement contexts, protocol instances,
//!   measured values, metadata groups, QC aggregates, and annotations
//! - The tri-state QC status enum
//! - Identifier constants and list-parsing helpers
//! - Response structs returned by the engine operations
//!
//! Nothing here is persisted. Every value is constructed per request and
//! dropped once the response has been assembled.

pub mod entities;
pub mod enums;
pub mod ids;
pub mod responses;
