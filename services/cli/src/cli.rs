use crate::demo::{run_demo, run_schema, run_validate, DemoArgs, SchemaArgs, ValidateArgs};
use crate::infra::build_engine;
use clap::{Parser, Subcommand};
use listing_wizard::config::AppConfig;
use listing_wizard::error::AppError;
use listing_wizard::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "listing-wizard",
    about = "Inspect listing schemas, validate drafts and replay a wizard session",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the field list a category/subcategory renders with
    Schema(SchemaArgs),
    /// Validate a draft listing stored as a JSON object
    Validate(ValidateArgs),
    /// Walk a scripted listing through every wizard step
    Demo(DemoArgs),
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    let engine = build_engine(&config)?;
    match cli.command {
        Command::Schema(args) => run_schema(&engine, args),
        Command::Validate(args) => run_validate(&engine, args),
        Command::Demo(args) => run_demo(engine, args).await,
    }
}
