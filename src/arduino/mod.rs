//! Board API as seen by sketch code.
//!
//! [`Arduino`] borrows the running [`Simulation`] for the duration of one
//! `setup` or `step` call and translates the familiar pin, timing, random
//! and serial functions into board and scheduler calls.
//!
//! Wiring mistakes (reading a pin nothing is connected to, for instance)
//! are unrecoverable in a sketch: they are logged and then panic with the
//! fault message.

pub mod liquid_crystal;
pub mod math;
pub mod serial;
pub mod wire;

pub use liquid_crystal::LiquidCrystalI2c;
pub use math::*;
pub use serial::Serial;
pub use wire::Wire;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::error::SimError;
use crate::scheduler::Simulation;

pub use crate::peripheral::{HIGH, LOW};

pub const INPUT: u8 = 0x0;
pub const OUTPUT: u8 = 0x1;
pub const INPUT_PULLUP: u8 = 0x2;

pub const A0: u8 = 14;
pub const A1: u8 = 15;
pub const A2: u8 = 16;
pub const A3: u8 = 17;
pub const A4: u8 = 18;
pub const A5: u8 = 19;

/// Handle passed to [`Sketch`](crate::sketch::Sketch) callbacks
pub struct Arduino<'a> {
    sim: &'a mut Simulation,
}

fn fatal(err: SimError) -> ! {
    tracing::error!("sketch fault: {}", err);
    panic!("{err}");
}

impl<'a> Arduino<'a> {
    pub fn new(sim: &'a mut Simulation) -> Self {
        Self { sim }
    }

    pub fn pin_mode(&mut self, pin: u8, mode: u8) {
        tracing::trace!("pin_mode({}, {})", pin, mode);
    }

    pub fn digital_read(&mut self, pin: u8) -> u8 {
        self.sim.board.digital_read(pin).unwrap_or_else(|e| fatal(e))
    }

    pub fn digital_write(&mut self, pin: u8, value: u8) {
        self.sim
            .board
            .digital_write(pin, value)
            .unwrap_or_else(|e| fatal(e))
    }

    /// 10-bit reading, 0..=1023
    pub fn analog_read(&mut self, pin: u8) -> u16 {
        self.sim.board.analog_read(pin).unwrap_or_else(|e| fatal(e))
    }

    /// PWM duty cycle, 0..=255
    pub fn analog_write(&mut self, pin: u8, value: u8) {
        self.sim
            .board
            .analog_write(pin, value)
            .unwrap_or_else(|e| fatal(e))
    }

    /// Milliseconds since start, wrapping like the board's 32-bit counter
    pub fn millis(&self) -> u32 {
        self.sim.uptime_ms() as u32
    }

    /// Block for `ms` while input and rendering keep being serviced
    pub fn delay(&mut self, ms: u32) {
        self.sim.wait(ms as u64);
    }

    /// Uniform value in `0..max`
    pub fn random(&mut self, max: i64) -> i64 {
        self.random_range(0, max)
    }

    /// Uniform value in `min..max`; `min` when the range is empty
    pub fn random_range(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.sim.rng.random_range(min..max)
    }

    pub fn random_seed(&mut self, seed: u64) {
        tracing::debug!("RNG reseeded with {}", seed);
        self.sim.rng = StdRng::seed_from_u64(seed);
    }

    pub fn serial(&mut self) -> Serial<'_> {
        Serial::new(self.sim)
    }

    pub fn wire(&mut self) -> Wire<'_> {
        Wire::new(&mut self.sim.board)
    }

    /// Current simulation, for inspection from sketch code
    pub fn simulation(&self) -> &Simulation {
        self.sim
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, TerminationPolicy};
    use crate::geometry::Rgba;
    use crate::platform::HeadlessPlatform;

    fn sim(seed: u64) -> Simulation {
        let mut config = Config::default();
        config.scheduler.termination = TerminationPolicy::Halt;
        config.random.seed = Some(seed);
        Simulation::new(config, Box::new(HeadlessPlatform::new())).unwrap()
    }

    #[test]
    fn test_random_bounds() {
        let mut sim = sim(1);
        let mut hw = Arduino::new(&mut sim);
        for _ in 0..200 {
            let v = hw.random_range(3, 6);
            assert!((3..6).contains(&v));
        }
        assert_eq!(hw.random_range(5, 5), 5);
        assert_eq!(hw.random_range(9, 2), 9);
        assert_eq!(hw.random(0), 0);
    }

    #[test]
    fn test_random_seed_is_reproducible() {
        let mut sim = sim(1);
        let mut hw = Arduino::new(&mut sim);
        hw.random_seed(99);
        let a: Vec<i64> = (0..8).map(|_| hw.random(1000)).collect();
        hw.random_seed(99);
        let b: Vec<i64> = (0..8).map(|_| hw.random(1000)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_pin_io_routes_to_peripherals() {
        let mut sim = sim(1);
        sim.connect_led(9, 0, 0, Rgba::BLACK, Rgba::WHITE).unwrap();
        sim.connect_potentiometer(A0, 40, 0).unwrap();
        let mut hw = Arduino::new(&mut sim);
        hw.pin_mode(9, OUTPUT);
        hw.analog_write(9, 128);
        assert_eq!(hw.analog_read(A0), 0);
        assert_eq!(hw.digital_read(9), LOW);
        assert_eq!(
            sim.snapshot()[0],
            crate::peripheral::PeripheralState::Led { brightness: 128 }
        );
    }

    #[test]
    #[should_panic(expected = "pin 5 is not connected")]
    fn test_unassigned_pin_panics() {
        let mut sim = sim(1);
        Arduino::new(&mut sim).digital_read(5);
    }

    #[test]
    fn test_millis_follows_delay() {
        let mut sim = sim(1);
        let mut hw = Arduino::new(&mut sim);
        hw.delay(250);
        hw.delay(250);
        assert_eq!(hw.millis(), 500);
    }
}
