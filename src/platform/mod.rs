//! Host platform seam.
//!
//! The simulation core never talks to a window system directly. A
//! [`Platform`] hands out raw input events, a monotonic millisecond tick
//! counter, a way to sleep, and a [`Canvas`] to draw peripherals on.

pub mod headless;
#[cfg(feature = "window")]
pub mod window;

pub use headless::{DrawCall, HeadlessPlatform};
#[cfg(feature = "window")]
pub use window::WindowPlatform;

use crate::assets::{Sheet, SourceRect};
use crate::geometry::{Point, Rect, Rgba};

/// Pointer button as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Raw input event queued by the host platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Window closed / interrupt requested
    Quit,
    MouseMotion { x: i32, y: i32 },
    MouseButton { button: MouseButton, x: i32, y: i32, pressed: bool },
    /// Vertical wheel delta; positive is away from the user
    MouseWheel { dy: i32 },
    Key { pressed: bool },
}

/// Drawing capability consumed by peripheral rendering
pub trait Canvas {
    fn clear(&mut self, color: Rgba);
    /// Copy `src` out of `sheet` into `dst`
    fn draw_sheet(&mut self, sheet: &Sheet, src: SourceRect, dst: Rect);
    /// Same as `draw_sheet` with every pixel scaled by `tint` (0..=255 per channel)
    fn draw_sheet_tinted(&mut self, sheet: &Sheet, src: SourceRect, dst: Rect, tint: Rgba) {
        let _ = tint;
        self.draw_sheet(sheet, src, dst);
    }
    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba);
    fn present(&mut self);
}

/// Host services the scheduler depends on
pub trait Platform {
    /// Sample host input into the queue; called once at the start of each drain
    fn begin_poll(&mut self) {}
    /// Next queued input event, if any
    fn poll_event(&mut self) -> Option<HostEvent>;
    /// Monotonic milliseconds since the platform started
    fn ticks_ms(&self) -> u64;
    fn sleep_ms(&mut self, ms: u64);
    fn canvas(&mut self) -> &mut dyn Canvas;
    /// A line written by the sketch's serial monitor
    fn serial_line(&mut self, line: &str);
    /// Release host resources; called once at teardown
    fn shutdown(&mut self) {}
}
