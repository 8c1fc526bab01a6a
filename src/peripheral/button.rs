use super::{Peripheral, PeripheralState, HIGH, HIT_BOX, LOW};
use crate::assets::{AssetSet, SheetId};
use crate::geometry::{Point, Rect};
use crate::platform::Canvas;

/// Momentary pushbutton operated with the left pointer button
#[derive(Debug, Clone)]
pub struct Button {
    pos: Point,
    pressed: bool,
}

impl Button {
    pub fn new(pos: Point) -> Self {
        Self { pos, pressed: false }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}

impl Peripheral for Button {
    fn kind(&self) -> &'static str {
        "button"
    }

    fn digital_read(&self, _pin: u8) -> u8 {
        if self.pressed { HIGH } else { LOW }
    }

    fn digital_write(&mut self, _pin: u8, _value: u8) {}

    fn analog_read(&self, _pin: u8) -> u16 {
        0
    }

    fn analog_write(&mut self, _pin: u8, _value: u8) {}

    fn pointer_click(&mut self, pos: Point, pressed: bool) {
        // a release outside the box still clears the press
        self.pressed = self.bounds().contains(pos) && pressed;
    }

    fn pointer_scroll(&mut self, _pos: Point, _up: bool) {}

    fn render(&self, canvas: &mut dyn Canvas, assets: &AssetSet) {
        let sheet = assets.sheet(SheetId::Button);
        canvas.draw_sheet(sheet, sheet.frame_rect(self.pressed as usize), self.bounds());
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.pos, HIT_BOX, HIT_BOX)
    }

    fn snapshot(&self) -> PeripheralState {
        PeripheralState::Button {
            pressed: self.pressed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_press_inside_box() {
        let mut button = Button::new(Point::new(100.0, 100.0));
        button.pointer_click(Point::new(110.0, 120.0), true);
        assert_eq!(button.digital_read(8), HIGH);
        button.pointer_click(Point::new(110.0, 120.0), false);
        assert_eq!(button.digital_read(8), LOW);
    }

    #[test]
    fn test_press_outside_box_is_ignored() {
        let mut button = Button::new(Point::new(100.0, 100.0));
        button.pointer_click(Point::new(50.0, 50.0), true);
        assert!(!button.is_pressed());
    }

    #[test]
    fn test_release_outside_box_clears_press() {
        let mut button = Button::new(Point::new(100.0, 100.0));
        button.pointer_click(Point::new(116.0, 116.0), true);
        assert!(button.is_pressed());
        button.pointer_click(Point::new(400.0, 10.0), false);
        assert_eq!(button.digital_read(8), LOW);
    }

    #[test]
    fn test_writes_do_not_change_reads() {
        let mut button = Button::new(Point::new(0.0, 0.0));
        button.digital_write(8, HIGH);
        button.analog_write(8, 200);
        assert_eq!(button.digital_read(8), LOW);
        assert_eq!(button.analog_read(8), 0);
    }
}
