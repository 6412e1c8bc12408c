//! Touch-scene minigame: staged zone interaction.
//!
//! Three stages, each activating a subset of fixed zones. An active zone
//! fills while the pointer is held inside it and drains otherwise, always
//! clamped to [0, 1]. When every active zone is full the stage advances;
//! clearing the last stage completes the scene.

use bevy::prelude::*;

use crate::shared::{SCREEN_HEIGHT, SCREEN_WIDTH};

// ─── Tuning constants ─────────────────────────────────────────────────────────

pub const TOTAL_STAGES: usize = 3;
/// Progress lost per second while a zone is not being touched.
pub const DECAY_RATE: f32 = 0.1;

/// Zone indices activated per stage.
const STAGE_ZONES: [&[usize]; TOTAL_STAGES] = [&[0, 1, 6], &[2, 3, 4], &[2, 3, 4, 5]];

// ─── Zone ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct TouchZone {
    pub region: Rect,
    pub name: &'static str,
    /// Progress gained per second while held-and-hovered.
    pub fill_rate: f32,
    pub progress: f32,
    pub active: bool,
}

impl TouchZone {
    fn new(region: Rect, name: &'static str, fill_rate: f32) -> Self {
        Self {
            region,
            name,
            fill_rate,
            progress: 0.0,
            active: false,
        }
    }

    fn update(&mut self, dt: f32, pointer: Option<Vec2>, held: bool) {
        if !self.active {
            return;
        }
        let touching = held && pointer.is_some_and(|p| self.region.contains(p));
        if touching {
            self.progress += self.fill_rate * dt;
        } else if !self.is_full() {
            // Decay only claws back partial progress; a filled zone stays
            // filled, otherwise a stage with slow zones can never be held
            // full all at once.
            self.progress -= DECAY_RATE * dt;
        }
        self.progress = self.progress.clamp(0.0, 1.0);
    }

    pub fn is_full(&self) -> bool {
        self.progress >= 1.0
    }
}

// ─── Simulation ──────────────────────────────────────────────────────────────

#[derive(Resource, Debug, Clone)]
pub struct TouchSimulation {
    zones: Vec<TouchZone>,
    stage: usize,
    complete: bool,
    overall: f32,
}

impl Default for TouchSimulation {
    fn default() -> Self {
        let cx = SCREEN_WIDTH / 2.0;
        let cy = SCREEN_HEIGHT / 2.0;
        let zone = |x: f32, y: f32, w: f32, h: f32| Rect::new(cx + x, cy + y, cx + x + w, cy + y + h);

        let zones = vec![
            TouchZone::new(zone(-150.0, -150.0, 100.0, 100.0), "Left Shoulder", 0.2),
            TouchZone::new(zone(50.0, -150.0, 100.0, 100.0), "Right Shoulder", 0.2),
            TouchZone::new(zone(-100.0, -30.0, 80.0, 80.0), "Left Side", 0.25),
            TouchZone::new(zone(20.0, -30.0, 80.0, 80.0), "Right Side", 0.25),
            TouchZone::new(zone(-80.0, 80.0, 70.0, 90.0), "Waist", 0.3),
            TouchZone::new(zone(-120.0, 180.0, 60.0, 100.0), "Left Leg", 0.15),
            TouchZone::new(zone(60.0, 180.0, 60.0, 100.0), "Right Leg", 0.15),
        ];

        let mut sim = Self {
            zones,
            stage: 0,
            complete: false,
            overall: 0.0,
        };
        sim.activate_stage_zones();
        sim
    }
}

impl TouchSimulation {
    pub fn reset(&mut self) {
        *self = TouchSimulation::default();
    }

    fn activate_stage_zones(&mut self) {
        for zone in &mut self.zones {
            zone.active = false;
            zone.progress = 0.0;
        }
        if let Some(indices) = STAGE_ZONES.get(self.stage) {
            for &i in *indices {
                self.zones[i].active = true;
            }
        }
    }

    pub fn advance(&mut self, dt: f32, pointer: Option<Vec2>, held: bool) {
        if self.complete {
            return;
        }

        for zone in &mut self.zones {
            zone.update(dt, pointer, held);
        }

        let active: Vec<&TouchZone> = self.zones.iter().filter(|z| z.active).collect();
        if !active.is_empty() && active.iter().all(|z| z.is_full()) {
            self.stage += 1;
            if self.stage >= TOTAL_STAGES {
                self.complete = true;
                self.overall = 1.0;
                return;
            }
            self.activate_stage_zones();
        }

        let stage_progress = {
            let active: Vec<&TouchZone> = self.zones.iter().filter(|z| z.active).collect();
            if active.is_empty() {
                0.0
            } else {
                active.iter().map(|z| z.progress).sum::<f32>() / active.len() as f32
            }
        };
        self.overall = (self.stage as f32 + stage_progress) / TOTAL_STAGES as f32;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn stage(&self) -> usize {
        self.stage
    }

    pub fn overall_progress(&self) -> f32 {
        self.overall
    }

    pub fn zones(&self) -> &[TouchZone] {
        &self.zones
    }
}
