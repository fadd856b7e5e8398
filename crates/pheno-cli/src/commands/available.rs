use pheno_core::entities::MeasurementContext;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{AvailableArgs, CentreProceduresArgs};
use crate::context::AppContext;
use crate::output::output;

/// Handle `phv available`.
///
/// With `--procedure` the parameters of that procedure are listed, otherwise
/// the procedures.
pub async fn handle(args: &AvailableArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let context = MeasurementContext::new(args.centre, args.genotype, args.strain);
    match args.procedure {
        Some(procedure_id) => output(
            &ctx.service.available_parameters(&context, procedure_id).await?,
            flags.format,
        ),
        None => output(&ctx.service.available_procedures(&context).await?, flags.format),
    }
}

/// Handle `phv centre-procedures`.
pub async fn handle_centre(
    args: &CentreProceduresArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    output(&ctx.service.centre_procedures(args.centre).await?, flags.format)
}
