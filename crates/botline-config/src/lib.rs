// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration for the Botline dispatch engine.
//!
//! TOML files merged across the XDG hierarchy with `BOTLINE_*`
//! environment variable overrides, extracted into typed model structs.

pub mod loader;
pub mod model;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::BotlineConfig;
