use clap::{Parser, Subcommand};

mod commands;
mod logging;
mod tui;

#[derive(Parser)]
#[command(name = "thatsit", version, about = "That's It -- a daily curfew for your terminal")]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a cutoff and hold the terminal until the password is typed back
    Run {
        /// Prefill the cutoff time (HH:MM)
        #[arg(long)]
        at: Option<String>,
    },
    /// Resolve a cutoff against the clock and print the resulting state as JSON
    Target {
        /// Cutoff time (HH:MM)
        cutoff: String,
        /// Evaluate at this instant (RFC 3339) instead of the local clock
        #[arg(long)]
        now: Option<String>,
    },
    /// Show how the countdown widget renders a remaining duration
    Preview {
        /// Remaining time in milliseconds
        #[arg(allow_negative_numbers = true)]
        remaining_ms: i64,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    if !matches!(cli.command, Commands::Run { .. }) {
        logging::init_stderr(cli.verbose);
    }
    let result = match cli.command {
        Commands::Run { at } => commands::run::run(at, cli.verbose),
        Commands::Target { cutoff, now } => commands::target::run(&cutoff, now.as_deref()),
        Commands::Preview { remaining_ms } => commands::preview::run(remaining_ms),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
