// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Auto-reply rule matching for the Botline dispatch engine.
//!
//! This crate provides [`first_match`], the pure rule evaluation used by
//! the dispatch pipeline, and [`order_rules`], the deterministic ordering
//! applied before evaluation. No I/O, no state, trivially unit-testable.

pub mod matcher;

pub use matcher::{first_match, order_rules};
