//! forgetbench library: exposes internal modules for integration tests.

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod providers;
pub mod runner;
