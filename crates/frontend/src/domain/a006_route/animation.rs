//! Progressive route reveal.
//!
//! A route of `N` points is revealed over `steps + 1` frames. At step `s` the
//! progress `s / steps` is mapped onto the polyline: every vertex already
//! passed is kept and one interpolated point marks the tip.

use contracts::shared::LngLat;

pub const DEFAULT_STEPS: u32 = 100;

/// Per-axis linear interpolation
pub fn lerp(from: LngLat, to: LngLat, t: f64) -> LngLat {
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
    ]
}

/// Visible part of `coordinates` at `step` of `steps`
pub fn partial_route(coordinates: &[LngLat], step: u32, steps: u32) -> Vec<LngLat> {
    if coordinates.len() < 2 || steps == 0 {
        return coordinates.to_vec();
    }
    let last = coordinates.len() - 1;
    let position = f64::from(step.min(steps)) / f64::from(steps) * last as f64;
    let segment = position.floor() as usize;
    if segment >= last {
        return coordinates.to_vec();
    }

    let mut visible = coordinates[..=segment].to_vec();
    let fraction = position - segment as f64;
    visible.push(lerp(coordinates[segment], coordinates[segment + 1], fraction));
    visible
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationPhase {
    Idle,
    Animating,
    Cancelled,
    Complete,
}

/// What the caller should do with one animation frame
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// Draw these points and schedule another frame
    Frame(Vec<LngLat>),
    /// Draw these points; the animation is over
    Last(Vec<LngLat>),
    /// The frame belongs to an animation that was cancelled or replaced
    Stale,
}

/// Frame-by-frame state machine.
///
/// Every `start` and `cancel` bumps the generation, so a callback scheduled
/// for an older animation gets [`Tick::Stale`] instead of drawing.
#[derive(Debug, Clone)]
pub struct RouteAnimator {
    coordinates: Vec<LngLat>,
    steps: u32,
    step: u32,
    generation: u64,
    phase: AnimationPhase,
}

impl RouteAnimator {
    pub fn new(steps: u32) -> Self {
        Self {
            coordinates: Vec::new(),
            steps,
            step: 0,
            generation: 0,
            phase: AnimationPhase::Idle,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Begin animating `coordinates`; returns the generation to tick with
    pub fn start(&mut self, coordinates: Vec<LngLat>) -> u64 {
        self.generation += 1;
        self.coordinates = coordinates;
        self.step = 0;
        self.phase = AnimationPhase::Animating;
        self.generation
    }

    pub fn tick(&mut self, generation: u64) -> Tick {
        if generation != self.generation || self.phase != AnimationPhase::Animating {
            return Tick::Stale;
        }
        let frame = partial_route(&self.coordinates, self.step, self.steps);
        self.step += 1;
        if self.step > self.steps {
            self.phase = AnimationPhase::Complete;
            Tick::Last(frame)
        } else {
            Tick::Frame(frame)
        }
    }

    /// Skip to the whole route. `None` when `generation` is not the running animation.
    pub fn finish(&mut self, generation: u64) -> Option<Vec<LngLat>> {
        if generation != self.generation || self.phase != AnimationPhase::Animating {
            return None;
        }
        self.step = self.steps + 1;
        self.phase = AnimationPhase::Complete;
        Some(self.coordinates.clone())
    }

    /// Returns true when a running animation was stopped
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        if self.phase == AnimationPhase::Animating {
            self.phase = AnimationPhase::Cancelled;
            true
        } else {
            false
        }
    }
}

impl Default for RouteAnimator {
    fn default() -> Self {
        Self::new(DEFAULT_STEPS)
    }
}
