//! Race Configuration
//!
//! Track layout and replay timing for the marble race.

/// Track layout and replay timing.
///
/// `Default` returns the values the replay was tuned with: one log line
/// every 0.4 s, 4 units of travel per event, four lanes 10 units apart.
#[derive(Clone, Debug)]
pub struct RaceConfig {
    /// Seconds between two consumed log lines at startup
    pub tick_seconds: f32,
    /// Lower bound for the tick interval (fastest replay)
    pub min_tick_seconds: f32,
    /// Upper bound for the tick interval (slowest replay)
    pub max_tick_seconds: f32,
    /// Distance a contender's target grows per alive/won event
    pub step_distance: f32,
    /// X coordinate of each lane, assigned round-robin by first appearance
    pub lanes_x: Vec<f32>,
    /// Z coordinate of the start line (marbles roll toward -Z)
    pub start_z: f32,
    /// Marble radius in world units
    pub marble_radius: f32,
    /// Height of the marble center above the floor
    pub marble_rest_height: f32,
    /// Height of the name label above the marble center
    pub label_lift: f32,
    /// Half extent of the square floor
    pub floor_half_extent: f32,
    /// Floor color (RGBA)
    pub floor_color: [f32; 4],
    /// Marble color before anyone has won (RGBA)
    pub marble_color: [f32; 4],
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 0.4,
            min_tick_seconds: 0.05,
            max_tick_seconds: 2.0,
            step_distance: 4.0,
            lanes_x: vec![-15.0, -5.0, 5.0, 15.0],
            start_z: 0.0,
            marble_radius: 1.0,
            marble_rest_height: 1.5,
            label_lift: 1.8,
            floor_half_extent: 1000.0,
            floor_color: [0.5, 0.5, 0.5, 1.0],
            marble_color: [0.3, 0.55, 0.95, 1.0],
        }
    }
}

impl RaceConfig {
    /// X coordinate of a lane index, wrapping over the configured lanes.
    pub fn lane_x(&self, lane: usize) -> f32 {
        if self.lanes_x.is_empty() {
            return 0.0;
        }
        self.lanes_x[lane % self.lanes_x.len()]
    }

    /// Number of distinct lanes (never zero).
    pub fn lane_count(&self) -> usize {
        self.lanes_x.len().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RaceConfig::default();
        assert_eq!(config.tick_seconds, 0.4);
        assert_eq!(config.step_distance, 4.0);
        assert_eq!(config.min_tick_seconds, 0.05);
        assert_eq!(config.max_tick_seconds, 2.0);
        assert_eq!(config.lane_count(), 4);
    }

    #[test]
    fn test_lane_x_wraps() {
        let config = RaceConfig::default();
        assert_eq!(config.lane_x(0), -15.0);
        assert_eq!(config.lane_x(3), 15.0);
        assert_eq!(config.lane_x(4), -15.0);
        assert_eq!(config.lane_x(6), 5.0);
    }

    #[test]
    fn test_no_lanes_falls_back_to_center() {
        let config = RaceConfig {
            lanes_x: Vec::new(),
            ..Default::default()
        };
        assert_eq!(config.lane_x(2), 0.0);
        assert_eq!(config.lane_count(), 1);
    }
}
