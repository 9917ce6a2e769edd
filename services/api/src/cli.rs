use crate::demo::{run_demo, run_kpis, run_priorities, DemoArgs, KpisArgs, PrioritiesArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use leadflow::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Leadflow",
    about = "Rank restoration leads by SLA pressure and value, and report pipeline KPIs",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the ranked "work on next" list for a lead CSV export
    Priorities(PrioritiesArgs),
    /// Print pipeline KPIs for a lead CSV export
    Kpis(KpisArgs),
    /// Run the pipeline board against a built-in sample snapshot
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Seed the in-memory lead store from a CSV export
    #[arg(long)]
    pub(crate) seed_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Priorities(args) => run_priorities(args),
        Command::Kpis(args) => run_kpis(args),
        Command::Demo(args) => run_demo(args),
    }
}
