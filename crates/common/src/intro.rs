//! The start-up animation played before the controls are handed to the user:
//! outline the grid, flash every cell on and off, seed a random population
//! and run one generation.

use std::time::Duration;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum IntroStep {
    DrawGrid,
    FillAll,
    ClearAll,
    Populate,
    Advance,
}

static SCHEDULE: [(u64, IntroStep); 5] = [
    (500, IntroStep::DrawGrid),
    (500, IntroStep::FillAll),
    (500, IntroStep::ClearAll),
    (750, IntroStep::Populate),
    (0, IntroStep::Advance),
];

static IMMEDIATE: [IntroStep; 2] = [IntroStep::DrawGrid, IntroStep::Populate];

/// Steps in order, each paired with the delay to wait before applying it.
pub fn schedule() -> impl Iterator<Item = (Duration, IntroStep)> {
    SCHEDULE
        .iter()
        .map(|&(delay, step)| (Duration::from_millis(delay), step))
}

/// The same grid preparation without the pauses, for drivers that skip the
/// animation.
pub fn immediate() -> impl Iterator<Item = IntroStep> {
    IMMEDIATE.iter().copied()
}
