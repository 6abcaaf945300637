// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Warden - stateless bearer-token authentication service.
//!
//! Main binary entry point.

use clap::Parser;

use warden_bin::cli::{Cli, Commands, RunArgs};
use warden_bin::{commands, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    let command = cli
        .command
        .clone()
        .unwrap_or(Commands::Run(RunArgs::default()));

    let result = match command {
        Commands::Run(args) => commands::run(&cli, args).await,
        Commands::Validate => commands::validate(&cli).await,
        Commands::Version => commands::version().await,
        Commands::GenSecret => commands::gen_secret().await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
