use crate::cli::GlobalFlags;
use crate::cli::root_commands::AnnotationsArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `phv annotations`.
pub async fn handle(
    args: &AnnotationsArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let response = ctx
        .service
        .annotations(args.genotype, &args.parameter)
        .await?;
    output(&response, flags.format)
}
