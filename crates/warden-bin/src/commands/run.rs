// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use tracing::info;
use warden_api::{ApiServer, AppConfig, AppState};

use crate::cli::{Cli, RunArgs};
use crate::error::BinResult;
use crate::shutdown::shutdown_signal;

/// Executes the `run` command to start the service.
pub async fn run(cli: &Cli, args: RunArgs) -> BinResult<()> {
    info!("starting Warden v{}", warden_api::VERSION);

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(port) = args.port {
        config.port = port;
    }

    let state = AppState::builder().config(config).build()?;
    let server = ApiServer::new(state);

    server.run_with_shutdown(shutdown_signal()).await?;

    info!("Warden shutdown complete");
    Ok(())
}
