use pheno_core::responses::ExportResponse;

use crate::cli::root_commands::{ExportArgs, SignificantGenesArgs, SignificantParametersArgs};
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::{output, to_ndjson};

/// Handle `phv export`.
pub async fn handle_bulk(args: &ExportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx
        .service
        .bulk_export(&args.gene_ids(), &args.parameter_keys(), args.include_baseline)
        .await?;
    emit(&response, flags)
}

/// Handle `phv export-significant-genes`.
pub async fn handle_significant_genes(
    args: &SignificantGenesArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let response = ctx
        .service
        .export_by_significant_genes(
            &args.parameter_keys(),
            args.pvalue_threshold,
            args.include_baseline,
        )
        .await?;
    emit(&response, flags)
}

/// Handle `phv export-significant-parameters`.
pub async fn handle_significant_parameters(
    args: &SignificantParametersArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let response = ctx
        .service
        .export_by_significant_parameters(
            &args.gene_ids(),
            args.pvalue_threshold,
            args.include_baseline,
        )
        .await?;
    emit(&response, flags)
}

/// Raw mode streams one pair per line and sends notes to stderr.
fn emit(response: &ExportResponse, flags: &GlobalFlags) -> anyhow::Result<()> {
    match flags.format {
        OutputFormat::Raw => {
            print!("{}", to_ndjson(&response.results)?);
            if !flags.quiet {
                for note in &response.notes {
                    eprintln!("note: {note}");
                }
            }
            Ok(())
        }
        OutputFormat::Json => output(response, flags.format),
    }
}
