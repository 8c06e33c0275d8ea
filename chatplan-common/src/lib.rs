//! # chatplan Common Library
//!
//! Shared code for the chatplan service:
//! - Error types
//! - TOML configuration loading and compiled defaults
//! - Tracing subscriber setup

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
