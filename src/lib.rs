//! price-pulse: real-time crypto price dashboard
//!
//! This library provides the core components for:
//! - Streaming prices from the CoinCap WebSocket feed
//! - A fixed per-asset price model (current, high/low, history, delta)
//! - Text and chart-domain rendering of one selected asset
//! - Structured logging and Prometheus metrics

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod feed;
pub mod registry;
pub mod render;
pub mod telemetry;
pub mod ws;
