use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Handle `phv gene-strains`.
pub async fn handle_gene_strains(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.service.gene_strains().await?, flags.format)
}

/// Handle `phv procedures`.
pub async fn handle_procedures(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.service.procedures().await?, flags.format)
}

/// Handle `phv parameters`.
pub async fn handle_parameters(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.service.parameters().await?, flags.format)
}

/// Handle `phv centres`.
pub async fn handle_centres(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&ctx.service.centres().await?, flags.format)
}
