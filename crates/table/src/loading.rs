//! Readiness tracking.
//!
//! Every asynchronous load the scene waits on is tracked by [`LoadBarrier`].
//! Once scheduling is finished and every tracked load has settled (loaded or
//! failed), the barrier fires exactly once and [`ConfiguratorPhase`] moves
//! from `Loading` to `Ready`.

use bevy::prelude::*;

/// Top-level phase of the configurator.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConfiguratorPhase {
    /// Assets are still in flight; the loading overlay is shown.
    #[default]
    Loading,
    /// Materials are built and the table exists.
    Ready,
}

/// Join-all-settled barrier over independent loads.
#[derive(Resource, Debug, Default)]
pub struct LoadBarrier {
    tracked: usize,
    settled: usize,
    scheduling_finished: bool,
    fired: bool,
}

impl LoadBarrier {
    /// Registers one more load to wait for.
    pub fn track(&mut self) {
        self.tracked += 1;
    }

    /// Marks one tracked load as settled, successful or not.
    pub fn settle(&mut self) {
        if self.settled < self.tracked {
            self.settled += 1;
        }
    }

    /// No more loads will be tracked after this call.
    pub fn finish_scheduling(&mut self) {
        self.scheduling_finished = true;
    }

    pub fn tracked(&self) -> usize {
        self.tracked
    }

    pub fn settled(&self) -> usize {
        self.settled
    }

    /// Fraction of tracked loads that have settled, 1.0 when nothing is tracked.
    pub fn progress(&self) -> f32 {
        if self.tracked == 0 {
            1.0
        } else {
            self.settled as f32 / self.tracked as f32
        }
    }

    pub fn is_settled(&self) -> bool {
        self.scheduling_finished && self.settled == self.tracked
    }

    /// Returns `true` the first time the barrier is observed settled and
    /// `false` on every later call.
    pub fn take_completion(&mut self) -> bool {
        if self.fired || !self.is_settled() {
            return false;
        }
        self.fired = true;
        true
    }
}

/// Moves to `Ready` once the barrier fires.
pub fn advance_when_settled(
    mut barrier: ResMut<LoadBarrier>,
    mut next_phase: ResMut<NextState<ConfiguratorPhase>>,
) {
    if barrier.take_completion() {
        info!(
            "All {} tracked loads settled, configurator ready",
            barrier.tracked()
        );
        next_phase.set(ConfiguratorPhase::Ready);
    }
}
