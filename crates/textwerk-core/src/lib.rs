// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Textwerk — Core types and error definitions shared across all crates.

pub mod error;
pub mod types;

pub use error::{Result, TextwerkError};
pub use types::*;
