// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::error::BinResult;

/// Prints version information.
pub async fn version() -> BinResult<()> {
    println!("warden {}", warden_api::VERSION);
    Ok(())
}
