use std::fmt::Display;

use crate::scheduler::Simulation;

/// Serial monitor. Lines end up in the simulation's serial log and on the host.
pub struct Serial<'a> {
    sim: &'a mut Simulation,
}

impl<'a> Serial<'a> {
    pub(crate) fn new(sim: &'a mut Simulation) -> Self {
        Self { sim }
    }

    /// Baud rate has no effect on the simulated port
    pub fn begin(&mut self, baud: u32) {
        tracing::debug!("serial port opened at {} baud", baud);
    }

    pub fn println(&mut self, value: impl Display) {
        self.sim.serial_line(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use crate::arduino::Arduino;
    use crate::config::Config;
    use crate::platform::HeadlessPlatform;
    use crate::scheduler::Simulation;

    #[test]
    fn test_println_records_lines() {
        let mut sim = Simulation::new(Config::default(), Box::new(HeadlessPlatform::new())).unwrap();
        let mut hw = Arduino::new(&mut sim);
        hw.serial().begin(9600);
        hw.serial().println("ready");
        hw.serial().println(42);
        assert_eq!(sim.serial_log(), ["ready".to_string(), "42".to_string()]);
    }
}
