//! Config Module
//!
//! Centralized configuration for the race layout and the scene's look.

pub mod race_config;
pub mod visual_config;

pub use race_config::RaceConfig;
pub use visual_config::VisualConfig;
