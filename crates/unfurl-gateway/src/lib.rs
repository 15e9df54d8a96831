//! HTTP surface for the unfurl service.
//!
//! Exposes the create endpoint (`POST /resolve`), the visit endpoint
//! (`GET /{short_id}`, redirect or preview), the descriptor endpoint
//! (`GET /info/{short_id}`), and a health check.

pub mod app;
pub mod cli;
pub mod error;
pub mod handlers;
pub mod model;
pub mod render;
pub mod state;
pub mod visit;
