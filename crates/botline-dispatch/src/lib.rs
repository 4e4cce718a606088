// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dispatch engine: webhook update routing and broadcast fan-out.
//!
//! [`Dispatcher`] takes one normalized update at a time through
//! ingestion, contact upkeep, and reply resolution (rule engine first,
//! AI engine as fallback). [`broadcast`] fans a manual message out to a
//! recipient list sequentially with pacing.

pub mod broadcast;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testutil;

pub use broadcast::{BroadcastReport, broadcast};
pub use pipeline::{DispatchOutcome, Dispatcher, ReplyGenerator};
