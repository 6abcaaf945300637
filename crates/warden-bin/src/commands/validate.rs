// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use warden_api::AppConfig;

use crate::cli::Cli;
use crate::error::BinResult;

/// Loads and validates the configuration without starting the server.
pub async fn validate(cli: &Cli) -> BinResult<()> {
    let config = AppConfig::load(&cli.config)?;

    println!("configuration OK");
    println!("  listen address: {}", config.socket_addr());
    println!("  token issuer:   {}", config.auth.issuer);
    println!("  token audience: {}", config.auth.audience);
    println!("  token validity: {}ms", config.auth.validity_ms);

    Ok(())
}
