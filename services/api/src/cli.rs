use crate::demo::{run_demo, run_schedule_preview, DemoArgs, PreviewArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use lease_ledger::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Lease Ledger Back Office",
    about = "Run the lease ledger service or exercise the payment schedule engine from the command line",
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
    /// Work with payment schedules without persisting anything
    Schedule {
        #[command(subcommand)]
        command: ScheduleCommand,
    },
    /// Run an end-to-end CLI demo covering activation, payment, and reschedule
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ScheduleCommand {
    /// Preview the billing periods a contract would generate
    Preview(PreviewArgs),
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
        Command::Schedule {
            command: ScheduleCommand::Preview(args),
        } => run_schedule_preview(args),
        Command::Demo(args) => run_demo(args),
    }
}
