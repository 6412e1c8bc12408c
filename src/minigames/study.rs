//! Study session timing minigame.
//!
//! An indicator sweeps back and forth across a bar; the player confirms
//! while it crosses the green band. Five rounds, majority wins, and the
//! grade bonus also folds in whatever study boost the player is carrying
//! at the moment the outcome is read.

use bevy::prelude::*;

// ─── Tuning constants ─────────────────────────────────────────────────────────

pub const TOTAL_ROUNDS: u32 = 5;
pub const ROUNDS_TO_PASS: u32 = 3;
pub const INDICATOR_SPEED: f32 = 0.8;
pub const GREEN_ZONE_START: f32 = 0.4;
pub const GREEN_ZONE_END: f32 = 0.6;
pub const ROUND_COOLDOWN: f32 = 0.5;
pub const GRADE_PER_SUCCESS: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StudyPhase {
    #[default]
    Moving,
    Cooldown,
    Complete,
}

#[derive(Resource, Debug, Clone)]
pub struct StudySimulation {
    phase: StudyPhase,
    round: u32,
    successes: u32,
    indicator: f32,
    moving_right: bool,
    cooldown: f32,
    /// Result of the most recent confirm, for the renderer.
    pub last_round_hit: Option<bool>,
}

impl Default for StudySimulation {
    fn default() -> Self {
        Self {
            phase: StudyPhase::Moving,
            round: 0,
            successes: 0,
            indicator: 0.0,
            moving_right: true,
            cooldown: 0.0,
            last_round_hit: None,
        }
    }
}

impl StudySimulation {
    pub fn reset(&mut self) {
        *self = StudySimulation::default();
    }

    pub fn advance(&mut self, dt: f32) {
        match self.phase {
            StudyPhase::Complete => {}
            StudyPhase::Cooldown => {
                self.cooldown -= dt;
                if self.cooldown <= 0.0 {
                    self.round += 1;
                    self.last_round_hit = None;
                    if self.round >= TOTAL_ROUNDS {
                        self.phase = StudyPhase::Complete;
                    } else {
                        self.phase = StudyPhase::Moving;
                    }
                }
            }
            StudyPhase::Moving => {
                // Bounce between the ends of the bar.
                if self.moving_right {
                    self.indicator += INDICATOR_SPEED * dt;
                    if self.indicator >= 1.0 {
                        self.indicator = 1.0;
                        self.moving_right = false;
                    }
                } else {
                    self.indicator -= INDICATOR_SPEED * dt;
                    if self.indicator <= 0.0 {
                        self.indicator = 0.0;
                        self.moving_right = true;
                    }
                }
            }
        }
    }

    /// Scores the current indicator position. Hit or miss, the round ends
    /// and the indicator resets for the next one.
    pub fn confirm(&mut self) {
        if self.phase != StudyPhase::Moving {
            return;
        }
        let hit = self.indicator >= GREEN_ZONE_START && self.indicator <= GREEN_ZONE_END;
        if hit {
            self.successes += 1;
        }
        self.last_round_hit = Some(hit);
        self.indicator = 0.0;
        self.moving_right = true;
        self.cooldown = ROUND_COOLDOWN;
        self.phase = StudyPhase::Cooldown;
    }

    pub fn phase(&self) -> StudyPhase {
        self.phase
    }

    pub fn is_complete(&self) -> bool {
        self.phase == StudyPhase::Complete
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn successes(&self) -> u32 {
        self.successes
    }

    pub fn indicator(&self) -> f32 {
        self.indicator
    }

    pub fn is_success(&self) -> bool {
        self.is_complete() && self.successes >= ROUNDS_TO_PASS
    }

    /// Numeric outcome. The boost is supplied by the caller at query time
    /// (read from game state then, never cached earlier).
    pub fn grade_bonus(&self, study_boost: i32) -> i32 {
        if self.is_complete() {
            self.successes as i32 * GRADE_PER_SUCCESS + study_boost
        } else {
            0
        }
    }
}
