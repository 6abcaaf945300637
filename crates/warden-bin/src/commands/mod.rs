// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Command implementations.

mod gen_secret;
mod run;
mod validate;
mod version;

pub use gen_secret::gen_secret;
pub use run::run;
pub use validate::validate;
pub use version::version;
