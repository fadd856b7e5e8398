use clap::{Args, Subcommand, ValueEnum};
use pheno_core::ids::split_id_list;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Measurements, metadata groups and QC status for one context+parameter.
    Query(QueryArgs),
    /// Export genes × parameters.
    Export(ExportArgs),
    /// Export every context significant for the given parameters.
    ExportSignificantGenes(SignificantGenesArgs),
    /// Export every parameter the given genes are significant for.
    ExportSignificantParameters(SignificantParametersArgs),
    /// Significance annotations for a genotype+parameter.
    Annotations(AnnotationsArgs),
    /// List the gene-strain index.
    GeneStrains,
    /// List IMPC procedures.
    Procedures,
    /// List parameters.
    Parameters,
    /// List phenotyping centres.
    Centres,
    /// Procedures with data for a context, or parameters with data for one procedure.
    Available(AvailableArgs),
    /// Procedures with data at a centre.
    CentreProcedures(CentreProceduresArgs),
    /// Expand genotypes and type tokens into parameter keys.
    Expand(ExpandArgs),
    /// Print the JSON schema of a response type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct QueryArgs {
    /// Centre id.
    #[arg(long)]
    pub centre: i64,
    /// Genotype id (0 is the baseline line).
    #[arg(long)]
    pub genotype: i64,
    /// Strain id.
    #[arg(long)]
    pub strain: i64,
    /// Parameter key, e.g. `IMPC_BWT_008_001`.
    #[arg(long)]
    pub parameter: String,
    /// Include matched baseline measurements.
    #[arg(long)]
    pub include_baseline: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ExportArgs {
    /// Comma-separated gene ids.
    #[arg(long)]
    pub genes: String,
    /// Comma-separated parameter keys.
    #[arg(long)]
    pub parameters: String,
    /// Include matched baseline measurements.
    #[arg(long)]
    pub include_baseline: bool,
}

impl ExportArgs {
    pub fn gene_ids(&self) -> Vec<String> {
        split_id_list(&self.genes)
    }

    pub fn parameter_keys(&self) -> Vec<String> {
        split_id_list(&self.parameters)
    }
}

#[derive(Clone, Debug, Args)]
pub struct SignificantGenesArgs {
    /// Comma-separated parameter keys.
    #[arg(long)]
    pub parameters: String,
    /// Significance threshold in [0, 1]; anything else falls back to the default.
    #[arg(long, allow_negative_numbers = true)]
    pub pvalue_threshold: Option<f64>,
    /// Include matched baseline measurements.
    #[arg(long)]
    pub include_baseline: bool,
}

impl SignificantGenesArgs {
    pub fn parameter_keys(&self) -> Vec<String> {
        split_id_list(&self.parameters)
    }
}

#[derive(Clone, Debug, Args)]
pub struct SignificantParametersArgs {
    /// Comma-separated gene ids.
    #[arg(long)]
    pub genes: String,
    /// Significance threshold in [0, 1]; anything else falls back to the default.
    #[arg(long, allow_negative_numbers = true)]
    pub pvalue_threshold: Option<f64>,
    /// Include matched baseline measurements.
    #[arg(long)]
    pub include_baseline: bool,
}

impl SignificantParametersArgs {
    pub fn gene_ids(&self) -> Vec<String> {
        split_id_list(&self.genes)
    }
}

#[derive(Clone, Debug, Args)]
pub struct AnnotationsArgs {
    /// Genotype id.
    #[arg(long)]
    pub genotype: i64,
    /// Parameter key.
    #[arg(long)]
    pub parameter: String,
}

#[derive(Clone, Debug, Args)]
pub struct AvailableArgs {
    /// Centre id.
    #[arg(long)]
    pub centre: i64,
    /// Genotype id.
    #[arg(long)]
    pub genotype: i64,
    /// Strain id.
    #[arg(long)]
    pub strain: i64,
    /// List parameters of this procedure instead of procedures.
    #[arg(long)]
    pub procedure: Option<i64>,
}

#[derive(Clone, Debug, Args)]
pub struct CentreProceduresArgs {
    /// Centre id.
    #[arg(long)]
    pub centre: i64,
}

#[derive(Clone, Debug, Args)]
pub struct ExpandArgs {
    /// Comma-separated genotypes, e.g. `42 - Akt2,43`.
    #[arg(long)]
    pub genotypes: String,
    /// Comma-separated MP terms, parameter keys or procedure type ids.
    #[arg(long)]
    pub types: String,
}

impl ExpandArgs {
    pub fn genotype_labels(&self) -> Vec<String> {
        split_id_list(&self.genotypes)
    }

    pub fn type_tokens(&self) -> Vec<String> {
        split_id_list(&self.types)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    Measurements,
    Export,
    Annotations,
    GeneStrains,
    Procedures,
    Parameters,
    Centres,
    AvailableProcedures,
    AvailableParameters,
    Expand,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Response type to describe.
    #[arg(value_enum)]
    pub type_name: SchemaType,
}
