// SPDX-FileCopyrightText: 2026 Botline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook HTTP gateway for inbound provider deliveries.
//!
//! Exposes `POST /webhook/{channel}` with optional secret-token
//! verification and an unauthenticated `GET /health`. The endpoint
//! acknowledges with 200 even when dispatch fails so the provider does
//! not retry poison payloads forever.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, router, start_server};
