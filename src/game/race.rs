//! Race Driver
//!
//! Replays a Corewar log as a marble race. The driver consumes one log line
//! per tick and emits [`RaceDiff`]s describing what changed; once per frame it
//! slides every contender's travelled distance toward its target.
//!
//! Nothing here touches the window or the GPU. The scene adapter in
//! [`crate::game::scene`] turns the diffs into marbles, colors and particles.

use std::collections::HashMap;

use crate::game::config::RaceConfig;
use crate::game::log_reader::{LogEvent, LogReader, parse_line};

/// Index of a contender in order of first appearance.
pub type ContenderId = usize;

/// One competitor mentioned in the log.
#[derive(Debug, Clone, PartialEq)]
pub struct Contender {
    /// Name as written between the parentheses of the log line
    pub name: String,
    /// Lane index, assigned round-robin on first appearance
    pub lane: usize,
    /// Distance visually covered so far (trails `target`)
    pub travelled: f32,
    /// Distance owed by all events processed so far
    pub target: f32,
    /// Set once by a win event; frozen afterwards
    pub is_winner: bool,
}

impl Contender {
    pub fn new(name: String, lane: usize) -> Self {
        Self {
            name,
            lane,
            travelled: 0.0,
            target: 0.0,
            is_winner: false,
        }
    }

    /// Distance still to cover before the marble catches up.
    #[inline]
    pub fn lag(&self) -> f32 {
        self.target - self.travelled
    }
}

/// Playback state of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaceState {
    Running,
    Finished,
}

/// A state change produced by one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum RaceDiff {
    /// A new contender entered the race
    Joined {
        id: ContenderId,
        name: String,
        lane: usize,
    },
    /// A contender's target distance grew
    Advanced {
        id: ContenderId,
        lane: usize,
        target: f32,
    },
    /// A contender won; playback stops
    Crowned { id: ContenderId, lane: usize },
    /// No more lines will be consumed
    Finished,
}

// ============================================================================
// TICK CADENCE
// ============================================================================

/// Bounded tick interval, halved or doubled at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickCadence {
    seconds: f32,
    min: f32,
    max: f32,
}

impl TickCadence {
    /// Create a cadence; the starting value is clamped into `[min, max]`.
    pub fn new(seconds: f32, min: f32, max: f32) -> Self {
        Self {
            seconds: seconds.clamp(min, max),
            min,
            max,
        }
    }

    /// Current seconds per log line.
    #[inline]
    pub fn seconds(&self) -> f32 {
        self.seconds
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.min, self.max)
    }

    /// Halve the interval (replay twice as fast), clamped to the minimum.
    pub fn faster(&mut self) -> f32 {
        self.seconds = (self.seconds / 2.0).max(self.min);
        self.seconds
    }

    /// Double the interval (replay half as fast), clamped to the maximum.
    pub fn slower(&mut self) -> f32 {
        self.seconds = (self.seconds * 2.0).min(self.max);
        self.seconds
    }
}

// ============================================================================
// DRIVER
// ============================================================================

/// Owns the contenders and the log cursor, and advances both over time.
pub struct RaceDriver {
    reader: LogReader,
    contenders: Vec<Contender>,
    by_name: HashMap<String, ContenderId>,
    next_lane: usize,
    lane_count: usize,
    step_distance: f32,
    cadence: TickCadence,
    /// Seconds until the next scheduled tick
    until_tick: f32,
    state: RaceState,
}

impl RaceDriver {
    /// Create a driver over a log. The first tick fires one interval after start.
    pub fn new(reader: LogReader, config: &RaceConfig) -> Self {
        let cadence = TickCadence::new(
            config.tick_seconds,
            config.min_tick_seconds,
            config.max_tick_seconds,
        );
        Self {
            reader,
            contenders: Vec::new(),
            by_name: HashMap::new(),
            next_lane: 0,
            lane_count: config.lane_count(),
            step_distance: config.step_distance,
            until_tick: cadence.seconds(),
            cadence,
            state: RaceState::Running,
        }
    }

    pub fn state(&self) -> RaceState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state == RaceState::Finished
    }

    /// Contenders in order of first appearance.
    pub fn contenders(&self) -> &[Contender] {
        &self.contenders
    }

    /// Look up a contender by its log name.
    pub fn find(&self, name: &str) -> Option<&Contender> {
        self.by_name.get(name).map(|&id| &self.contenders[id])
    }

    /// The winning contender, once one exists.
    pub fn winner(&self) -> Option<&Contender> {
        self.contenders.iter().find(|c| c.is_winner)
    }

    pub fn cadence(&self) -> &TickCadence {
        &self.cadence
    }

    pub fn cadence_mut(&mut self) -> &mut TickCadence {
        &mut self.cadence
    }

    /// Interpolation speed in distance units per second.
    #[inline]
    pub fn speed(&self) -> f32 {
        self.step_distance / self.cadence.seconds()
    }

    /// Number of log lines consumed so far.
    pub fn lines_consumed(&self) -> usize {
        self.reader.consumed()
    }

    pub fn lines_remaining(&self) -> usize {
        self.reader.remaining()
    }

    /// Advance the clock by `dt` seconds: run at most one due tick, then
    /// interpolate every marble. Returns the diffs of the tick, if any fired.
    pub fn update(&mut self, dt: f32) -> Vec<RaceDiff> {
        let mut diffs = Vec::new();

        if self.state == RaceState::Running {
            self.until_tick -= dt;
            if self.until_tick <= 0.0 {
                diffs = self.tick();
                // Rescheduled with whatever cadence is current now
                self.until_tick = self.cadence.seconds();
            }
        }

        self.interpolate(dt);
        diffs
    }

    /// Consume exactly one log line. No-op once finished.
    pub fn tick(&mut self) -> Vec<RaceDiff> {
        if self.state == RaceState::Finished {
            return Vec::new();
        }

        let event = match self.reader.next_line() {
            Some(line) => parse_line(line),
            None => {
                self.state = RaceState::Finished;
                return vec![RaceDiff::Finished];
            }
        };

        let Some(event) = event else {
            return Vec::new();
        };

        let mut diffs = Vec::with_capacity(3);
        let id = self.ensure_contender(event.name(), &mut diffs);
        let contender = &mut self.contenders[id];
        contender.target += self.step_distance;
        diffs.push(RaceDiff::Advanced {
            id,
            lane: contender.lane,
            target: contender.target,
        });

        if let LogEvent::Won(_) = event {
            contender.is_winner = true;
            diffs.push(RaceDiff::Crowned {
                id,
                lane: contender.lane,
            });
            diffs.push(RaceDiff::Finished);
            self.state = RaceState::Finished;
        }

        diffs
    }

    /// Slide each non-winner toward its target at the current speed.
    pub fn interpolate(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let step = self.speed() * dt;
        for contender in self.contenders.iter_mut() {
            if contender.is_winner || contender.travelled >= contender.target {
                continue;
            }
            contender.travelled += step.min(contender.lag());
        }
    }

    fn ensure_contender(&mut self, name: &str, diffs: &mut Vec<RaceDiff>) -> ContenderId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }

        let id = self.contenders.len();
        let lane = self.next_lane % self.lane_count;
        self.next_lane += 1;

        self.contenders.push(Contender::new(name.to_string(), lane));
        self.by_name.insert(name.to_string(), id);
        diffs.push(RaceDiff::Joined {
            id,
            name: name.to_string(),
            lane,
        });
        id
    }
}
