//! Simulated peripherals.
//!
//! Every device implements the same capability set so the board can route a
//! pin-level call to whichever peripheral owns the pin:
//! - digital read/write
//! - analog read/write
//! - pointer click/scroll (each device hit-tests its own bounds)
//! - render
//!
//! Operations a device does not support are no-ops that return 0 / LOW,
//! the same way driving an unsupported pin mode on a real board is harmless.

pub mod button;
pub mod lcd;
pub mod led;
pub mod potentiometer;

pub use button::Button;
pub use lcd::Lcd;
pub use led::Led;
pub use potentiometer::Potentiometer;

use serde::{Deserialize, Serialize};

use crate::assets::AssetSet;
use crate::geometry::{Point, Rect};
use crate::platform::Canvas;

/// Logic high
pub const HIGH: u8 = 0x1;
/// Logic low
pub const LOW: u8 = 0x0;

/// Edge length of the square hit box used by buttons and potentiometers
pub const HIT_BOX: f32 = 32.0;

/// Observable state of a peripheral
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PeripheralState {
    Led { brightness: u8 },
    Button { pressed: bool },
    Potentiometer { value: u16 },
    Lcd { backlight: bool, address: u8, lines: Vec<String> },
}

/// Capability set shared by all simulated devices
pub trait Peripheral {
    /// Short device kind, used in logs
    fn kind(&self) -> &'static str;

    fn digital_read(&self, pin: u8) -> u8;
    fn digital_write(&mut self, pin: u8, value: u8);
    fn analog_read(&self, pin: u8) -> u16;
    fn analog_write(&mut self, pin: u8, value: u8);

    /// Left pointer button changed state at `pos`
    fn pointer_click(&mut self, pos: Point, pressed: bool);
    /// Wheel moved while the pointer was at `pos`
    fn pointer_scroll(&mut self, pos: Point, up: bool);

    fn render(&self, canvas: &mut dyn Canvas, assets: &AssetSet);

    /// Area the device occupies in the view
    fn bounds(&self) -> Rect;

    fn snapshot(&self) -> PeripheralState;

    /// A bus master started a transmission addressed to this device
    fn bus_begin(&mut self) {}

    /// One byte arrived over the bus
    fn bus_write(&mut self, _byte: u8) {}
}
