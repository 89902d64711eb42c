//! Game Module
//!
//! The marble race itself: reading the Corewar log, advancing contenders on
//! a tick cadence, and mirroring the race into drawable scene state.

pub mod config;
pub mod log_reader;
pub mod particle_presets;
pub mod race;
pub mod scene;
pub mod types;
pub mod ui;

pub use config::{RaceConfig, VisualConfig};
pub use log_reader::{LogEvent, LogFileError, LogReader, parse_line};
pub use particle_presets::{
    LoadedPreset, ParticlePreset, PresetError, PresetSource, load_first_preset, load_winner_preset,
};
pub use race::{Contender, ContenderId, RaceDiff, RaceDriver, RaceState, TickCadence};
pub use scene::{MarbleInstance, RaceScene, WinnerEffect};
pub use types::{Mesh, generate_floor, generate_sphere};
