//! Particle Presets
//!
//! JSON-described particle effects, looked up through an ordered list of
//! candidate files. A missing or broken preset is never fatal: the loader
//! moves on to the next candidate and, if none works, the caller simply
//! renders without an effect.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory (relative to the asset root) holding particle presets.
pub const PARTICLE_DIR: &str = "particles";

/// Preset files tried for the winner flourish, in order.
pub const WINNER_PRESET_CHAIN: [&str; 3] = ["sparkles.json", "sparkle.json", "firework.json"];

/// Parameters of a particle effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticlePreset {
    /// Continuous emission rate (particles per second)
    pub spawn_rate: f32,
    /// Particles emitted at once when the effect starts
    #[serde(default)]
    pub burst_count: u32,
    /// Lifetime range in seconds
    pub lifetime: [f32; 2],
    /// Initial speed range in units per second
    pub speed: [f32; 2],
    /// Fraction of the initial velocity forced upward (0 = isotropic, 1 = straight up)
    #[serde(default)]
    pub upward_bias: f32,
    /// Downward acceleration in units per second squared
    #[serde(default)]
    pub gravity: f32,
    /// Billboard size range in world units
    pub size: [f32; 2],
    /// Start and end color (RGB, HDR allowed); particles pick a mix of the two
    pub colors: [[f32; 3]; 2],
    /// Radius around the emitter where particles appear
    #[serde(default)]
    pub spawn_radius: f32,
}

impl Default for ParticlePreset {
    fn default() -> Self {
        Self {
            spawn_rate: 60.0,
            burst_count: 80,
            lifetime: [0.8, 1.6],
            speed: [3.0, 7.0],
            upward_bias: 0.6,
            gravity: 4.0,
            size: [0.15, 0.35],
            colors: [[3.0, 2.6, 0.8], [2.0, 1.2, 0.2]],
            spawn_radius: 1.0,
        }
    }
}

impl ParticlePreset {
    /// Clamp nonsensical values (inverted ranges, negative rates) into shape.
    pub fn sanitized(mut self) -> Self {
        fn order(range: &mut [f32; 2], floor: f32) {
            range[0] = range[0].max(floor);
            range[1] = range[1].max(range[0]);
        }
        self.spawn_rate = self.spawn_rate.max(0.0);
        self.upward_bias = self.upward_bias.clamp(0.0, 1.0);
        self.spawn_radius = self.spawn_radius.max(0.0);
        order(&mut self.lifetime, 0.01);
        order(&mut self.speed, 0.0);
        order(&mut self.size, 0.001);
        self
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors that can occur while reading one preset file.
#[derive(Debug)]
pub enum PresetError {
    /// Standard I/O error (usually: file missing).
    IoError(std::io::Error),
    /// The file is not a valid preset.
    JsonError(serde_json::Error),
}

impl std::fmt::Display for PresetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresetError::IoError(e) => write!(f, "IO error: {e}"),
            PresetError::JsonError(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for PresetError {}

impl From<std::io::Error> for PresetError {
    fn from(e: std::io::Error) -> Self {
        PresetError::IoError(e)
    }
}

impl From<serde_json::Error> for PresetError {
    fn from(e: serde_json::Error) -> Self {
        PresetError::JsonError(e)
    }
}

// ============================================================================
// LOADING
// ============================================================================

/// Read a single preset file.
pub fn load_preset(path: &Path) -> Result<ParticlePreset, PresetError> {
    let text = std::fs::read_to_string(path)?;
    let preset: ParticlePreset = serde_json::from_str(&text)?;
    Ok(preset.sanitized())
}

/// A preset together with the file it came from.
#[derive(Clone, Debug)]
pub struct LoadedPreset {
    pub path: PathBuf,
    pub preset: ParticlePreset,
}

/// Try each candidate under `dir` in order and return the first that loads.
///
/// Failures are logged at debug level. When every candidate fails a single
/// warning is logged and `None` is returned.
pub fn load_first_preset(dir: &Path, names: &[&str]) -> Option<LoadedPreset> {
    for name in names {
        let path = dir.join(name);
        match load_preset(&path) {
            Ok(preset) => {
                log::debug!("Loaded particle preset {}", path.display());
                return Some(LoadedPreset { path, preset });
            }
            Err(e) => log::debug!("Skipping particle preset {}: {e}", path.display()),
        }
    }
    log::warn!("No particle preset found; marble is simply painted gold.");
    None
}

/// Load the winner flourish from `<asset_root>/particles/`.
pub fn load_winner_preset(asset_root: &Path) -> Option<LoadedPreset> {
    load_first_preset(&asset_root.join(PARTICLE_DIR), &WINNER_PRESET_CHAIN)
}

/// Where the winner flourish comes from.
///
/// `Deferred` walks the fallback chain the first time the effect is needed,
/// so a replay that never crowns anyone never touches the preset files.
#[derive(Clone, Debug)]
pub enum PresetSource {
    /// Resolved (or known to be absent)
    Ready(Option<ParticlePreset>),
    /// Asset root to search with [`load_winner_preset`] on first use
    Deferred(PathBuf),
}

impl PresetSource {
    /// Resolve the preset, loading it at most once.
    pub fn resolve(&mut self) -> Option<&ParticlePreset> {
        if let PresetSource::Deferred(root) = self {
            let preset = load_winner_preset(root).map(|loaded| {
                log::info!("Winner effect: {}", loaded.path.display());
                loaded.preset
            });
            *self = PresetSource::Ready(preset);
        }
        match self {
            PresetSource::Ready(preset) => preset.as_ref(),
            PresetSource::Deferred(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, PresetSource::Ready(_))
    }
}

impl From<Option<ParticlePreset>> for PresetSource {
    fn from(preset: Option<ParticlePreset>) -> Self {
        PresetSource::Ready(preset)
    }
}
