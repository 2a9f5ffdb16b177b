//! BMA Configuration Module
//!
//! Every tunable constant of the analytics engines lives in a TOML-backed
//! [`BmaConfig`]. Defaults equal the doctrinal values the engines were
//! designed around, so running without a file gives the reference behaviour.
//!
//! ## Loading Order
//!
//! 1. `BMA_CONFIG` environment variable (path to TOML file)
//! 2. `bma_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! ```ignore
//! let cfg = BmaConfig::load();
//! let service = BmaService::new(stores, weather, cfg);
//! ```
//!
//! Engines take their section by value, so there is no process-wide
//! config instance.

mod bma_config;
pub mod defaults;
pub mod validation;

pub use bma_config::*;
