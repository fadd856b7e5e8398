use pheno_core::responses::{
    AnnotationsResponse, AvailableParametersResponse, AvailableProceduresResponse,
    CentresResponse, ExpandResponse, ExportResponse, GeneStrainsResponse, MeasurementsResponse,
    ParametersResponse, ProceduresResponse,
};
use schemars::schema_for;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{SchemaArgs, SchemaType};

/// Handle `phv schema`.
pub fn handle(args: &SchemaArgs, _flags: &GlobalFlags) -> anyhow::Result<()> {
    println!("{}", schema_json(args.type_name)?);
    Ok(())
}

fn schema_json(type_name: SchemaType) -> anyhow::Result<String> {
    let schema = match type_name {
        SchemaType::Measurements => schema_for!(MeasurementsResponse),
        SchemaType::Export => schema_for!(ExportResponse),
        SchemaType::Annotations => schema_for!(AnnotationsResponse),
        SchemaType::GeneStrains => schema_for!(GeneStrainsResponse),
        SchemaType::Procedures => schema_for!(ProceduresResponse),
        SchemaType::Parameters => schema_for!(ParametersResponse),
        SchemaType::Centres => schema_for!(CentresResponse),
        SchemaType::AvailableProcedures => schema_for!(AvailableProceduresResponse),
        SchemaType::AvailableParameters => schema_for!(AvailableParametersResponse),
        SchemaType::Expand => schema_for!(ExpandResponse),
    };
    Ok(serde_json::to_string_pretty(&schema)?)
}
