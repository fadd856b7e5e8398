//! Read-projection entity structs.
//!
//! Each entity is a row shape returned by the store and carried, unchanged or
//! enriched, into a response.

mod annotation;
mod catalog;
mod context;
mod measurement;
mod procedure;
mod qc;

pub use annotation::{AnnotationDetail, AnnotationRecord, OntologyTerm};
pub use catalog::{Centre, GeneStrain, ParameterData, ProcedureData};
pub use context::MeasurementContext;
pub use measurement::{MeasuredValue, MetadataGroupEntry};
pub use procedure::ProcedureMetadataGroup;
pub use qc::QcState;
