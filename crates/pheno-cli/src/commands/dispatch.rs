use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Query(args) => commands::query::handle(&args, ctx, flags).await,
        Commands::Export(args) => commands::export::handle_bulk(&args, ctx, flags).await,
        Commands::ExportSignificantGenes(args) => {
            commands::export::handle_significant_genes(&args, ctx, flags).await
        }
        Commands::ExportSignificantParameters(args) => {
            commands::export::handle_significant_parameters(&args, ctx, flags).await
        }
        Commands::Annotations(args) => commands::annotations::handle(&args, ctx, flags).await,
        Commands::GeneStrains => commands::catalog::handle_gene_strains(ctx, flags).await,
        Commands::Procedures => commands::catalog::handle_procedures(ctx, flags).await,
        Commands::Parameters => commands::catalog::handle_parameters(ctx, flags).await,
        Commands::Centres => commands::catalog::handle_centres(ctx, flags).await,
        Commands::Available(args) => commands::available::handle(&args, ctx, flags).await,
        Commands::CentreProcedures(args) => {
            commands::available::handle_centre(&args, ctx, flags).await
        }
        Commands::Expand(args) => commands::expand::handle(&args, ctx, flags).await,
        Commands::Schema(args) => commands::schema::handle(&args, flags),
    }
}
