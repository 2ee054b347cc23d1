use crate::demo::{run_demo, run_extract, run_match, DemoArgs, ExtractArgs, MatchArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use venue_match::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Venue Scout",
    about = "Rank campus venues against event requirements and explain the choice",
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
    /// Rank venues for a requirement set and print the shortlist
    Match(MatchArgs),
    /// Extract structured event intent from a free-text query
    Extract(ExtractArgs),
    /// Run an end-to-end CLI demo covering extraction and ranking
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
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Match(args) => run_match(args),
        Command::Extract(args) => run_extract(args),
        Command::Demo(args) => run_demo(args),
    }
}
