pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod render;
pub mod report;
pub mod stats;
