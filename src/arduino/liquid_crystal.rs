// src/arduino/liquid_crystal.rs - Client driver for the bus-attached character LCD
use super::Arduino;
use crate::peripheral::lcd::command;

/// Driver for a character LCD behind a two-wire backpack.
///
/// Every operation is sent as one bus transmission made of `(command, data)`
/// byte pairs.
#[derive(Debug, Clone)]
pub struct LiquidCrystalI2c {
    address: u8,
    cols: u8,
    rows: u8,
}

impl LiquidCrystalI2c {
    pub fn new(address: u8, cols: u8, rows: u8) -> Self {
        Self {
            address,
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    fn send(&self, hw: &mut Arduino, pairs: impl IntoIterator<Item = (u8, u8)>) {
        let mut wire = hw.wire();
        wire.begin_transmission(self.address);
        for (cmd, data) in pairs {
            wire.write(cmd);
            wire.write(data);
        }
        wire.end_transmission();
    }

    /// Clear the display and home the cursor
    pub fn init(&self, hw: &mut Arduino) {
        self.send(hw, [(command::CLEAR, 0), (command::SET_ADDRESS, 0)]);
    }

    pub fn backlight(&self, hw: &mut Arduino) {
        self.send(hw, [(command::BACKLIGHT, 1)]);
    }

    pub fn no_backlight(&self, hw: &mut Arduino) {
        self.send(hw, [(command::BACKLIGHT, 0)]);
    }

    /// Blank every cell; the cursor stays where it was
    pub fn clear(&self, hw: &mut Arduino) {
        self.send(hw, [(command::CLEAR, 0)]);
    }

    pub fn home(&self, hw: &mut Arduino) {
        self.set_cursor(hw, 0, 0);
    }

    pub fn set_cursor(&self, hw: &mut Arduino, col: u8, row: u8) {
        let col = col.min(self.cols - 1) as u16;
        let row = row.min(self.rows - 1) as u16;
        let address = (row * self.cols as u16 + col).min(u8::MAX as u16) as u8;
        self.send(hw, [(command::SET_ADDRESS, address)]);
    }

    pub fn print(&self, hw: &mut Arduino, text: impl AsRef<str>) {
        let bytes = text.as_ref().bytes().map(|b| (command::WRITE_CHAR, b));
        self.send(hw, bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arduino::{A4, A5};
    use crate::config::Config;
    use crate::peripheral::PeripheralState;
    use crate::platform::HeadlessPlatform;
    use crate::scheduler::Simulation;

    #[test]
    fn test_print_at_cursor() {
        let mut sim = Simulation::new(Config::default(), Box::new(HeadlessPlatform::new())).unwrap();
        sim.connect_lcd(0x27, A4, A5, 16, 2, 200, 200).unwrap();
        let lcd = LiquidCrystalI2c::new(0x27, 16, 2);

        let mut hw = Arduino::new(&mut sim);
        lcd.init(&mut hw);
        lcd.backlight(&mut hw);
        lcd.set_cursor(&mut hw, 4, 1);
        lcd.print(&mut hw, "fox");

        match &sim.snapshot()[0] {
            PeripheralState::Lcd { backlight, address, lines } => {
                assert!(*backlight);
                assert_eq!(*address, 0x27);
                assert_eq!(lines[0].trim(), "");
                assert_eq!(lines[1], "    fox         ");
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn test_cursor_is_clamped_to_display() {
        let mut sim = Simulation::new(Config::default(), Box::new(HeadlessPlatform::new())).unwrap();
        sim.connect_lcd(0x27, A4, A5, 8, 2, 0, 0).unwrap();
        let lcd = LiquidCrystalI2c::new(0x27, 8, 2);
        let mut hw = Arduino::new(&mut sim);
        lcd.set_cursor(&mut hw, 20, 5);
        lcd.print(&mut hw, "!");
        match &sim.snapshot()[0] {
            PeripheralState::Lcd { lines, .. } => assert_eq!(lines[1], "       !"),
            other => panic!("unexpected state {other:?}"),
        }
    }
}
