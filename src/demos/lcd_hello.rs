use crate::arduino::{A4, A5, Arduino, LiquidCrystalI2c};
use crate::error::SimResult;
use crate::scheduler::Simulation;
use crate::sketch::Sketch;

const LCD_ADDRESS: u8 = 0x27;

pub struct LcdHello {
    lcd: LiquidCrystalI2c,
}

impl Default for LcdHello {
    fn default() -> Self {
        Self {
            lcd: LiquidCrystalI2c::new(LCD_ADDRESS, 16, 3),
        }
    }
}

impl Sketch for LcdHello {
    fn setup(&mut self, hw: &mut Arduino) {
        self.lcd.init(hw);
        self.lcd.backlight(hw);
        self.lcd.set_cursor(hw, 0, 1);
        self.lcd.print(hw, "Arduino");
    }

    fn step(&mut self, _hw: &mut Arduino) {}
}

pub fn build(sim: &mut Simulation) -> SimResult<Box<dyn Sketch>> {
    sim.connect_lcd(LCD_ADDRESS, A4, A5, 16, 3, 200, 200)?;
    Ok(Box::new(LcdHello::default()))
}
