// src/main.rs

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::Session;

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Commands::Completions { shell } = cli.command {
        return commands::cmd_completions(shell);
    }

    let session = Session::load(cli.config.as_deref(), cli.json)?;

    match cli.command {
        Commands::List => commands::cmd_list(&session),
        Commands::Info { name } => commands::cmd_info(&session, &name),
        Commands::Resolve { spec } => commands::cmd_resolve(&session, &spec),
        Commands::Args { spec, prefix } => commands::cmd_args(&session, &spec, prefix.as_deref()),
        Commands::Fetch { spec } => commands::cmd_fetch(&session, &spec),
        Commands::Verify { spec, file } => commands::cmd_verify(&session, &spec, &file),
        Commands::Validate { files } => commands::cmd_validate(&session, &files),
        Commands::InstallPlan {
            spec,
            prefix,
            source,
            execute,
        } => commands::cmd_install_plan(&session, &spec, &prefix, source.as_deref(), execute),
        Commands::Completions { .. } => Ok(()),
    }
}
