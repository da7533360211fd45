//! Shared utilities for chartbot
//!
//! This crate provides common functionality used across the chartbot workspace,
//! including logging setup and environment lookup helpers.

pub mod config;
pub mod logging;

pub use config::{EnvSource, ProcessEnv};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
