//! eqnlint - Audit LaTeX manuscripts with a language model.

use clap::Parser;
use eqnlint_cli::commands;
use eqnlint_cli::{Cli, Command, Config, Formatter, EXIT_FAILURE};

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

async fn run() -> eqnlint_cli::Result<i32> {
    // .env must be loaded before parsing so `env = ...` flags see it
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let verbose = match &cli.command {
        Command::All(args) => args.audit.verbose,
        cmd => cmd.audit().is_some_and(|(_, args)| args.verbose),
    };
    eqnlint_cli::init_logging(verbose);

    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(color_enabled);

    if let Some((kind, args)) = cli.command.audit() {
        return commands::execute_audit(kind, args, &config, &formatter).await;
    }

    match &cli.command {
        Command::All(args) => commands::execute_all(args, &config, &formatter).await,
        _ => commands::execute_list(&formatter),
    }
}
