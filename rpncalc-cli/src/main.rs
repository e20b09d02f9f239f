//! rpncalc - interactive host for the incremental RPN evaluator
//!
//! This is a thin wrapper around rpncalc-core. Plain lines are typed into an
//! in-memory transcript; lines starting with the command prefix run a
//! calculator command against it.

mod repl;

use clap::Parser;
use rpncalc_core::Settings;
use rpncalc_core::settings::DEFAULT_EXTEND_LIMIT;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "rpncalc", version)]
#[command(about = "Keystroke-driven RPN calculator that lives in your text")]
struct Args {
    /// Characters of plain text `extend` may look back through
    #[arg(long, value_name = "N", default_value_t = DEFAULT_EXTEND_LIMIT)]
    extend_limit: usize,

    /// Log level written to stderr (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL", default_value = "warn")]
    log_level: tracing::Level,

    /// Prefix that marks a line as a command
    #[arg(long, value_name = "CHAR", default_value_t = ':')]
    command_prefix: char,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let settings = Settings::default().with_extend_limit(args.extend_limit);
    repl::run_repl(settings, args.command_prefix)
}
