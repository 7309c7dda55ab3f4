use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod clock;
mod commands;
mod display;
mod input;
mod speech;

#[derive(Parser)]
#[command(
    name = "microday",
    version,
    about = "Meticulously plan your day minute-by-minute",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// Day document, default is 'todo_<yy-mm-dd>.md'
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Step through the day interactively (default)
    Run {
        /// Day document
        file: Option<PathBuf>,
    },
    /// Print the day document
    Show {
        /// Day document
        file: Option<PathBuf>,
        /// Print without colors
        #[arg(long)]
        plain: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("MICRODAY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        None => commands::run::run(cli.file),
        Some(Commands::Run { file }) => commands::run::run(file),
        Some(Commands::Show { file, plain }) => commands::show::run(file, plain),
        Some(Commands::Config { action }) => commands::config::run(action),
        Some(Commands::Completions { shell }) => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
