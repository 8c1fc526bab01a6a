use super::{Peripheral, PeripheralState, LOW};
use crate::assets::AssetSet;
use crate::geometry::{Point, Rect, Rgba};
use crate::platform::Canvas;

const RADIUS: f32 = 16.0;

/// Single LED with a linear brightness between two colours
#[derive(Debug, Clone)]
pub struct Led {
    pos: Point,
    color_min: Rgba,
    color_max: Rgba,
    brightness: u8,
}

impl Led {
    pub fn new(pos: Point, color_min: Rgba, color_max: Rgba) -> Self {
        Self {
            pos,
            color_min,
            color_max,
            brightness: 0,
        }
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Colour the LED is currently drawn with
    pub fn color(&self) -> Rgba {
        self.color_min
            .lerp(self.color_max, self.brightness as f32 / 255.0)
    }
}

impl Peripheral for Led {
    fn kind(&self) -> &'static str {
        "led"
    }

    fn digital_read(&self, _pin: u8) -> u8 {
        LOW
    }

    fn digital_write(&mut self, _pin: u8, value: u8) {
        self.brightness = if value != LOW { u8::MAX } else { 0 };
    }

    fn analog_read(&self, _pin: u8) -> u16 {
        0
    }

    fn analog_write(&mut self, _pin: u8, value: u8) {
        self.brightness = value;
    }

    fn pointer_click(&mut self, _pos: Point, _pressed: bool) {}

    fn pointer_scroll(&mut self, _pos: Point, _up: bool) {}

    fn render(&self, canvas: &mut dyn Canvas, _assets: &AssetSet) {
        canvas.fill_circle(self.pos.offset(RADIUS, RADIUS), RADIUS, self.color());
    }

    fn bounds(&self) -> Rect {
        Rect::new(self.pos, 2.0 * RADIUS, 2.0 * RADIUS)
    }

    fn snapshot(&self) -> PeripheralState {
        PeripheralState::Led {
            brightness: self.brightness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::peripheral::HIGH;

    fn led() -> Led {
        Led::new(Point::new(10.0, 10.0), Rgba(0x200000ff), Rgba(0xff0000ff))
    }

    #[test]
    fn test_analog_write_is_linear() {
        let mut led = led();
        led.analog_write(3, 128);
        assert_eq!(led.brightness(), 128);
        led.analog_write(3, 1);
        assert_eq!(led.brightness(), 1);
    }

    #[test]
    fn test_digital_write_overrides_analog() {
        let mut led = led();
        led.analog_write(3, 40);
        led.digital_write(3, HIGH);
        assert_eq!(led.brightness(), 255);
        led.digital_write(3, LOW);
        assert_eq!(led.brightness(), 0);
        // any non-zero level counts as on
        led.digital_write(3, 7);
        assert_eq!(led.brightness(), 255);
    }

    #[test]
    fn test_reads_are_neutral() {
        let mut led = led();
        led.digital_write(3, HIGH);
        assert_eq!(led.digital_read(3), LOW);
        assert_eq!(led.analog_read(3), 0);
    }

    #[test]
    fn test_color_follows_brightness() {
        let mut led = led();
        assert_eq!(led.color(), Rgba(0x200000ff));
        led.digital_write(3, HIGH);
        assert_eq!(led.color(), Rgba(0xff0000ff));
    }
}
