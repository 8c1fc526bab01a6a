use super::{Peripheral, PeripheralState, HIT_BOX, LOW};
use crate::assets::{AssetSet, SheetId};
use crate::geometry::{Point, Rect};
use crate::platform::Canvas;

/// Full-scale reading of the 10-bit ADC
pub const ANALOG_MAX: u16 = 1023;
/// Change per wheel notch
pub const SCROLL_STEP: u16 = 64;

/// Rotary analog input turned with the pointer wheel
#[derive(Debug, Clone)]
pub struct Potentiometer {
    pos: Point,
    value: u16,
}

impl Potentiometer {
    pub fn new(pos: Point) -> Self {
        Self { pos, value: 0 }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    /// Sheet frame for the current knob angle
    fn frame(&self) -> usize {
        (self.value / 128) as usize
    }
}

impl Peripheral for Potentiometer {
    fn kind(&self) -> &'static str {
        "potentiometer"
    }

    fn digital_read(&self, _pin: u8) -> u8 {
        LOW
    }

    fn digital_write(&mut self, _pin: u8, _value: u8) {}

    fn analog_read(&self, _pin: u8) -> u16 {
        self.value
    }

    fn analog_write(&mut self, _pin: u8, _value: u8) {}

    fn pointer_click(&mut self, _pos: Point, _pressed: bool) {}

    fn pointer_scroll(&mut self, pos: Point, up: bool) {
        if !self.bounds().contains(pos) {
            return;
        }
        self.value = if up {
            self.value.saturating_add(SCROLL_STEP).min(ANALOG_MAX)
        } else {
            self.value.saturating_sub(SCROLL_STEP)
        };
    }

    fn render(&self, canvas: &mut dyn Canvas, assets: &AssetSet) {
        let sheet = assets.sheet(SheetId::Potentiometer);
        canvas.draw_sheet(sheet, sheet.frame_rect(self.frame()), self.bounds());
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.pos, HIT_BOX, HIT_BOX)
    }

    fn snapshot(&self) -> PeripheralState {
        PeripheralState::Potentiometer { value: self.value }
    }
}
