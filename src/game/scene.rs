//! Race Scene
//!
//! Turns the driver's diffs and per-frame contender distances into things
//! the renderer can draw: one marble instance per contender, the floor, the
//! winner's gold tint and sparkle request, and floating name labels.

use glam::{Mat4, Vec3};

use crate::game::config::{RaceConfig, VisualConfig};
use crate::game::particle_presets::{ParticlePreset, PresetSource};
use crate::game::race::{Contender, ContenderId, RaceDiff};
use crate::game::ui::text::draw_label;
use crate::render::{LabelMesh, MeshInstance};

/// Drawable state of one contender.
#[derive(Clone, Debug, PartialEq)]
pub struct MarbleInstance {
    pub name: String,
    pub position: Vec3,
    pub tint: [f32; 4],
    pub is_winner: bool,
}

/// Request to start the winner's particle effect.
#[derive(Clone, Debug, PartialEq)]
pub struct WinnerEffect {
    pub position: Vec3,
    pub preset: ParticlePreset,
}

/// Marble centre after rolling `travelled` units from the start of `lane`.
fn rolled_position(layout: &RaceConfig, lane: usize, travelled: f32) -> Vec3 {
    Vec3::new(
        layout.lane_x(lane),
        layout.marble_rest_height,
        layout.start_z - travelled,
    )
}

/// Scene-side mirror of the race.
pub struct RaceScene {
    layout: RaceConfig,
    winner_color: [f32; 4],
    label_color: [f32; 4],
    label_scale: f32,
    marbles: Vec<MarbleInstance>,
    winner_preset: PresetSource,
    pending_effect: Option<WinnerEffect>,
}

impl RaceScene {
    /// `winner_preset` is the effect played on the winner. A deferred source
    /// is only resolved when somebody is crowned.
    pub fn new(
        layout: &RaceConfig,
        visual: &VisualConfig,
        winner_preset: impl Into<PresetSource>,
    ) -> Self {
        Self {
            layout: layout.clone(),
            winner_color: visual.winner_color,
            label_color: visual.label_color,
            label_scale: visual.label_scale,
            marbles: Vec::new(),
            winner_preset: winner_preset.into(),
            pending_effect: None,
        }
    }

    pub fn marbles(&self) -> &[MarbleInstance] {
        &self.marbles
    }

    pub fn marble(&self, id: ContenderId) -> Option<&MarbleInstance> {
        self.marbles.get(id)
    }

    /// Starting position of a marble in `lane`.
    pub fn start_position(&self, lane: usize) -> Vec3 {
        rolled_position(&self.layout, lane, 0.0)
    }

    /// React to one driver diff.
    pub fn apply(&mut self, diff: &RaceDiff) {
        match diff {
            RaceDiff::Joined { id, name, lane } => {
                debug_assert_eq!(*id, self.marbles.len());
                log::debug!("{name} joins in lane {lane}");
                self.marbles.push(MarbleInstance {
                    name: name.clone(),
                    position: self.start_position(*lane),
                    tint: self.layout.marble_color,
                    is_winner: false,
                });
            }
            RaceDiff::Advanced { .. } => {}
            RaceDiff::Crowned { id, .. } => self.crown(*id),
            RaceDiff::Finished => log::info!("End of log reached"),
        }
    }

    fn crown(&mut self, id: ContenderId) {
        let Some(marble) = self.marbles.get_mut(id) else {
            log::warn!("Crowned unknown contender #{id}");
            return;
        };
        marble.tint = self.winner_color;
        marble.is_winner = true;
        log::info!("🏆 {} won!", marble.name);

        if let Some(preset) = self.winner_preset.resolve() {
            self.pending_effect = Some(WinnerEffect {
                position: marble.position,
                preset: preset.clone(),
            });
        }
    }

    /// Move every marble to match the driver's travelled distances.
    ///
    /// Marbles roll from `start_z` toward -Z.
    pub fn sync(&mut self, contenders: &[Contender]) {
        let layout = &self.layout;
        for (marble, contender) in self.marbles.iter_mut().zip(contenders) {
            marble.position = rolled_position(layout, contender.lane, contender.travelled);
        }
    }

    /// Take the winner effect request, at most once.
    pub fn take_winner_effect(&mut self) -> Option<WinnerEffect> {
        self.pending_effect.take()
    }

    /// GPU instances for the marble sphere mesh (unit radius).
    pub fn marble_instances(&self) -> Vec<MeshInstance> {
        self.marbles
            .iter()
            .map(|m| MeshInstance {
                offset: m.position.to_array(),
                scale: self.layout.marble_radius,
                tint: m.tint,
            })
            .collect()
    }

    /// The single floor instance (floor mesh is built at full size).
    pub fn floor_instance(&self) -> MeshInstance {
        MeshInstance::at(Vec3::new(0.0, 0.0, self.layout.start_z), self.layout.floor_color)
    }

    /// Append a name label above each visible marble.
    pub fn build_labels(&self, mesh: &mut LabelMesh, view_proj: Mat4, width: f32, height: f32) {
        let lift = Vec3::Y * (self.layout.marble_radius + self.layout.label_lift);
        for marble in &self.marbles {
            let color = if marble.is_winner {
                self.winner_color
            } else {
                self.label_color
            };
            draw_label(
                mesh,
                &marble.name,
                marble.position + lift,
                view_proj,
                self.label_scale,
                color,
                width,
                height,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(preset: Option<ParticlePreset>) -> RaceScene {
        RaceScene::new(&RaceConfig::default(), &VisualConfig::default(), preset)
    }

    fn joined(id: ContenderId, name: &str, lane: usize) -> RaceDiff {
        RaceDiff::Joined {
            id,
            name: name.to_string(),
            lane,
        }
    }

    #[test]
    fn test_joined_places_marble_at_lane_start() {
        let mut scene = scene(None);
        scene.apply(&joined(0, "alice", 0));
        scene.apply(&joined(1, "bob", 1));

        let alice = scene.marble(0).unwrap();
        assert_eq!(alice.position, Vec3::new(-15.0, 1.5, 0.0));
        assert_eq!(alice.tint, RaceConfig::default().marble_color);
        assert_eq!(scene.marble(1).unwrap().position.x, -5.0);
    }

    #[test]
    fn test_sync_rolls_toward_negative_z() {
        let mut scene = scene(None);
        scene.apply(&joined(0, "alice", 2));
        let mut contender = Contender::new("alice".to_string(), 2);
        contender.travelled = 6.0;
        scene.sync(std::slice::from_ref(&contender));
        assert_eq!(scene.marble(0).unwrap().position, Vec3::new(5.0, 1.5, -6.0));
    }

    #[test]
    fn test_crowned_paints_gold_and_requests_effect() {
        let mut scene = scene(Some(ParticlePreset::default()));
        scene.apply(&joined(0, "alice", 0));
        scene.apply(&RaceDiff::Crowned { id: 0, lane: 0 });

        let effect = scene.take_winner_effect().unwrap();
        assert!(scene.take_winner_effect().is_none());

        let alice = scene.marble(0).unwrap();
        assert!(alice.is_winner);
        assert_eq!(alice.tint, VisualConfig::default().winner_color);
        assert_eq!(effect.position, alice.position);
    }

    #[test]
    fn test_crowned_without_preset_still_gold() {
        let mut scene = scene(None);
        scene.apply(&joined(0, "alice", 0));
        scene.apply(&RaceDiff::Crowned { id: 0, lane: 0 });
        assert_eq!(scene.marble(0).unwrap().tint, [1.0, 0.84, 0.0, 1.0]);
        assert!(scene.take_winner_effect().is_none());
    }

    #[test]
    fn test_crowned_unknown_id_ignored() {
        let mut scene = scene(Some(ParticlePreset::default()));
        scene.apply(&RaceDiff::Crowned { id: 3, lane: 0 });
        assert!(scene.marbles().is_empty());
        assert!(scene.take_winner_effect().is_none());
    }

    #[test]
    fn test_marble_instances_mirror_marbles() {
        let mut scene = scene(None);
        scene.apply(&joined(0, "a", 0));
        scene.apply(&joined(1, "b", 3));
        let instances = scene.marble_instances();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[1].offset, [15.0, 1.5, 0.0]);
        assert_eq!(instances[1].scale, 1.0);
    }

    #[test]
    fn test_labels_drawn_for_visible_marbles() {
        let mut scene = scene(None);
        scene.apply(&joined(0, "alice", 0));
        let camera = crate::camera::FPSCameraController::looking_at(Vec3::new(0.0, 35.0, 60.0), Vec3::ZERO);
        let mut mesh = LabelMesh::new();
        scene.build_labels(&mut mesh, camera.view_projection(1.5), 1200.0, 800.0);
        assert!(!mesh.is_empty());

        // Camera looking away: label hidden
        let away = crate::camera::FPSCameraController::looking_at(
            Vec3::new(0.0, 35.0, 60.0),
            Vec3::new(0.0, 35.0, 200.0),
        );
        let mut hidden = LabelMesh::new();
        scene.build_labels(&mut hidden, away.view_projection(1.5), 1200.0, 800.0);
        assert!(hidden.is_empty());
    }

    #[test]
    fn test_sync_moves_each_marble_from_its_own_lane() {
        let mut scene = scene(None);
        scene.apply(&joined(0, "a", 0));
        scene.apply(&joined(1, "b", 1));

        let mut a = Contender::new("a".to_string(), 0);
        let mut b = Contender::new("b".to_string(), 1);
        a.travelled = 2.0;
        b.travelled = 3.5;
        scene.sync(&[a.clone(), b.clone()]);
        a.travelled = 4.0;
        scene.sync(&[a, b]);

        assert_eq!(scene.marble(0).unwrap().position, Vec3::new(-15.0, 1.5, -4.0));
        assert_eq!(scene.marble(1).unwrap().position, Vec3::new(-5.0, 1.5, -3.5));
    }

    #[test]
    fn test_deferred_preset_untouched_without_winner() {
        let root = std::env::temp_dir().join("corewar_marbles_scene_no_winner");
        let mut scene = RaceScene::new(
            &RaceConfig::default(),
            &VisualConfig::default(),
            PresetSource::Deferred(root),
        );
        scene.apply(&joined(0, "alice", 0));
        scene.apply(&RaceDiff::Finished);
        assert!(!scene.winner_preset.is_resolved());
    }

    #[test]
    fn test_deferred_preset_loaded_on_crown() {
        let root = std::env::temp_dir().join("corewar_marbles_scene_crown");
        let dir = root.join(crate::game::particle_presets::PARTICLE_DIR);
        let _ = std::fs::remove_dir_all(&root);
        std::fs::create_dir_all(&dir).unwrap();
        let json = serde_json::to_string(&ParticlePreset::default()).unwrap();
        std::fs::write(dir.join("sparkles.json"), json).unwrap();

        let mut scene = RaceScene::new(
            &RaceConfig::default(),
            &VisualConfig::default(),
            PresetSource::Deferred(root),
        );
        scene.apply(&joined(0, "alice", 0));
        scene.apply(&RaceDiff::Crowned { id: 0, lane: 0 });

        assert!(scene.winner_preset.is_resolved());
        assert_eq!(scene.take_winner_effect().unwrap().preset, ParticlePreset::default());
    }
}
