// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `gen-secret` command.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::BinResult;

/// Generates a base64-encoded 256-bit signing secret on stdout.
pub async fn gen_secret() -> BinResult<()> {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    println!("{}", BASE64.encode(bytes));
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_secret_is_long_enough() {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        let encoded = BASE64.encode(bytes);
        assert_eq!(BASE64.decode(&encoded).unwrap().len(), 32);
    }
}
