//! Lock-picking simulation.
//!
//! One pin at a time: slide the pick along the track until the pin sits
//! inside its sweet spot, then set it. Setting every pin opens the lock.
//! Finishing fast earns a time-bonus multiplier that the job scene uses
//! to stretch the exploration window.

use bevy::prelude::*;
use rand::Rng;

use crate::shared::GameRng;

// ─── Tuning constants ─────────────────────────────────────────────────────────

/// Track units per pixel of pointer movement.
pub const PICK_SENSITIVITY: f32 = 0.003;
/// Sweet-spot half-width before difficulty shrinks it.
pub const BASE_TOLERANCE: f32 = 0.08;
/// Difficulty can never shrink the sweet spot below this.
pub const MIN_TOLERANCE: f32 = 0.02;
/// Extra half-width granted by the advanced lockpick tool.
pub const UPGRADE_TOLERANCE_BONUS: f32 = 0.03;

// ─── Pin ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct LockPin {
    /// Pick position along the track, 0.0 to 1.0.
    pub position: f32,
    /// Sweet-spot center, 0.1 to 0.9.
    pub target: f32,
    pub tolerance: f32,
    pub locked: bool,
}

impl LockPin {
    fn new(rng: &mut GameRng, tolerance: f32) -> Self {
        Self {
            position: rng.0.gen::<f32>(),
            target: 0.1 + rng.0.gen::<f32>() * 0.8,
            tolerance,
            locked: false,
        }
    }

    pub fn move_by(&mut self, delta: f32) {
        self.position = (self.position + delta).clamp(0.0, 1.0);
    }

    pub fn in_sweet_spot(&self) -> bool {
        (self.position - self.target).abs() <= self.tolerance
    }

    pub fn distance_from_target(&self) -> f32 {
        (self.position - self.target).abs()
    }

    /// Feedback strength for the renderer: 0 inside the sweet spot,
    /// rising with distance.
    pub fn shake_intensity(&self) -> f32 {
        let distance = self.distance_from_target();
        if distance <= self.tolerance {
            0.0
        } else if distance <= self.tolerance * 3.0 {
            0.3
        } else if distance <= self.tolerance * 6.0 {
            0.6
        } else {
            1.0
        }
    }
}

// ─── Simulation ──────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone, Default)]
pub struct LockPickSimulation {
    pins: Vec<LockPin>,
    current_pin: usize,
    elapsed: f32,
    complete: bool,
}

impl LockPickSimulation {
    /// Arms the simulation for a lock of the given difficulty. Pin count
    /// grows and the sweet spot shrinks with difficulty; an equipped
    /// upgrade widens every sweet spot.
    pub fn setup(&mut self, difficulty: i32, has_upgrade: bool, rng: &mut GameRng) {
        let pin_count = (3 + difficulty).clamp(3, 7) as usize;
        let mut tolerance = (BASE_TOLERANCE - difficulty as f32 * 0.01).max(MIN_TOLERANCE);
        if has_upgrade {
            tolerance += UPGRADE_TOLERANCE_BONUS;
        }

        self.pins = (0..pin_count).map(|_| LockPin::new(rng, tolerance)).collect();
        self.current_pin = 0;
        self.elapsed = 0.0;
        self.complete = false;
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.complete {
            self.elapsed += dt;
        }
    }

    /// Directional input only ever reaches the first unset pin.
    pub fn move_pick(&mut self, delta: f32) {
        if self.complete {
            return;
        }
        if let Some(pin) = self.pins.get_mut(self.current_pin) {
            if !pin.locked {
                pin.move_by(delta);
            }
        }
    }

    /// Attempts to set the current pin. Succeeds only inside the sweet
    /// spot; a miss leaves the pin and the pin index unchanged.
    pub fn try_lock(&mut self) -> bool {
        if self.complete {
            return false;
        }
        let Some(pin) = self.pins.get_mut(self.current_pin) else {
            return false;
        };
        if pin.locked || !pin.in_sweet_spot() {
            return false;
        }
        pin.locked = true;
        self.current_pin += 1;
        if self.current_pin >= self.pins.len() {
            self.complete = true;
        }
        true
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn pins(&self) -> &[LockPin] {
        &self.pins
    }

    pub fn current_pin_index(&self) -> usize {
        self.current_pin
    }

    pub fn locked_pins(&self) -> usize {
        self.pins.iter().filter(|p| p.locked).count()
    }

    /// Sole externally consumed outcome: a multiplier on the follow-on
    /// exploration time, keyed to how fast the lock fell.
    pub fn bonus_time_multiplier(&self) -> f32 {
        if self.elapsed < 10.0 {
            2.0
        } else if self.elapsed < 20.0 {
            1.5
        } else if self.elapsed < 30.0 {
            1.2
        } else {
            1.0
        }
    }
}
