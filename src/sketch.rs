// src/sketch.rs - Contract for programs running on the simulated board
use crate::arduino::Arduino;

/// A board program: `setup` runs once, `step` runs on every main-loop tick.
///
/// Both receive the board handle; long-running work inside `step` should
/// call [`Arduino::delay`] so input and rendering keep being serviced.
pub trait Sketch {
    fn setup(&mut self, hw: &mut Arduino);
    fn step(&mut self, hw: &mut Arduino);
}

/// Plain function pair as a sketch, for small programs and tests
pub struct FnSketch<S, L>
where
    S: FnMut(&mut Arduino),
    L: FnMut(&mut Arduino),
{
    setup: S,
    step: L,
}

impl<S, L> FnSketch<S, L>
where
    S: FnMut(&mut Arduino),
    L: FnMut(&mut Arduino),
{
    pub fn new(setup: S, step: L) -> Self {
        Self { setup, step }
    }
}

impl<S, L> Sketch for FnSketch<S, L>
where
    S: FnMut(&mut Arduino),
    L: FnMut(&mut Arduino),
{
    fn setup(&mut self, hw: &mut Arduino) {
        (self.setup)(hw)
    }

    fn step(&mut self, hw: &mut Arduino) {
        (self.step)(hw)
    }
}
