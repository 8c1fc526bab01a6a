//! Bundled sketches runnable from the command line.

pub mod catch_ball;
pub mod lcd_hello;
pub mod vending;

use crate::error::SimResult;
use crate::scheduler::Simulation;
use crate::sketch::Sketch;

/// Wires peripherals onto a fresh simulation and returns the program
pub type DemoBuilder = fn(&mut Simulation) -> SimResult<Box<dyn Sketch>>;

pub struct Demo {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    builder: DemoBuilder,
}

impl Demo {
    pub fn build(&self, sim: &mut Simulation) -> SimResult<Box<dyn Sketch>> {
        tracing::info!("Wiring demo '{}'", self.name);
        (self.builder)(sim)
    }
}

pub static DEMOS: &[Demo] = &[
    Demo {
        name: "catch-ball",
        title: "Catch the bouncing LED ball",
        description: "reaction game: four LEDs, four buttons, difficulty knob",
        builder: catch_ball::build,
    },
    Demo {
        name: "vending",
        title: "Vending machine",
        description: "three buttons select and dispense products shown on an LCD",
        builder: vending::build,
    },
    Demo {
        name: "lcd-hello",
        title: "LCD example",
        description: "prints a greeting on a 16x3 character LCD",
        builder: lcd_hello::build,
    },
];

pub fn find(name: &str) -> Option<&'static Demo> {
    DEMOS.iter().find(|d| d.name == name)
}

/// Rising-edge detector for a digital input
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Edge {
    last: bool,
}

impl Edge {
    /// True only on the first sample after the level went high
    pub(crate) fn rose(&mut self, level: bool) -> bool {
        let rose = level && !self.last;
        self.last = level;
        rose
    }
}
