//! Simulated microcontroller board.
//!
//! Sketches written against the familiar pin/timing/serial API run on a
//! virtual board whose peripherals (LEDs, pushbuttons, potentiometers and a
//! bus-attached character LCD) are drawn on a host canvas and operated with
//! the mouse.
//!
//! ```no_run
//! use sketchboard::arduino::{Arduino, HIGH, LOW};
//! use sketchboard::config::Config;
//! use sketchboard::geometry::Rgba;
//! use sketchboard::platform::HeadlessPlatform;
//! use sketchboard::sketch::FnSketch;
//! use sketchboard::Simulation;
//!
//! let mut sim = Simulation::new(Config::default(), Box::new(HeadlessPlatform::new()))?;
//! sim.connect_led(13, 100, 100, Rgba(0x300000ff), Rgba(0xff0000ff))?;
//! let mut blink = FnSketch::new(
//!     |_hw: &mut Arduino| {},
//!     |hw: &mut Arduino| {
//!         hw.digital_write(13, HIGH);
//!         hw.delay(500);
//!         hw.digital_write(13, LOW);
//!         hw.delay(500);
//!     },
//! );
//! sim.run(&mut blink);
//! # Ok::<(), sketchboard::SimError>(())
//! ```

pub mod arduino;
pub mod assets;
pub mod board;
pub mod bus;
pub mod config;
pub mod demos;
pub mod error;
pub mod geometry;
pub mod input;
pub mod peripheral;
pub mod platform;
pub mod scheduler;
pub mod sketch;

pub use error::{SimError, SimResult};
pub use scheduler::{RunSummary, SimState, Simulation, StopReason};
pub use sketch::Sketch;
