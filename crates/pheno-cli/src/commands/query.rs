use pheno_core::entities::MeasurementContext;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::QueryArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `phv query`.
pub async fn handle(args: &QueryArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let context = MeasurementContext::new(args.centre, args.genotype, args.strain);
    let response = ctx
        .service
        .query(&context, &args.parameter, args.include_baseline)
        .await?;
    output(&response, flags.format)
}
