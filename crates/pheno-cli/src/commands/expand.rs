use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExpandArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `phv expand`.
pub async fn handle(args: &ExpandArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let response = ctx
        .service
        .expand_parameters(&args.genotype_labels(), &args.type_tokens())
        .await?;
    output(&response, flags.format)
}
