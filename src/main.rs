//
//  bitbucket-provider
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use bitbucket_provider::cli::{Cli, Commands};
use bitbucket_provider::exit_codes;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::for_error(&e));
        }
    }
}

/// Initialize logging from `BBP_LOG`, defaulting to warnings on stderr
fn init_logging() {
    let filter = EnvFilter::try_from_env("BBP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Validate(cmd) => cmd.run(&cli.global).await,
        Commands::Plan(cmd) => cmd.run(&cli.global).await,
        Commands::Apply(cmd) => cmd.run(&cli.global).await,
        Commands::Destroy(cmd) => cmd.run(&cli.global).await,
        Commands::Import(cmd) => cmd.run(&cli.global).await,
        Commands::Refresh(cmd) => cmd.run(&cli.global).await,
        Commands::State(cmd) => cmd.run(&cli.global).await,
        Commands::Schema(cmd) => cmd.run(&cli.global).await,
        Commands::Auth(cmd) => cmd.run(&cli.global).await,
        Commands::Version => {
            println!("bbp version {}", bitbucket_provider::VERSION);
            Ok(())
        }
    }
}
