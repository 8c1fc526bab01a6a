// src/platform/window.rs - Desktop window back-end (minifb)
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};

use super::{Canvas, HostEvent, MouseButton, Platform};
use crate::assets::{Sheet, SourceRect};
use crate::config::WindowConfig;
use crate::error::{SimError, SimResult};
use crate::geometry::{Point, Rect, Rgba};

/// Fill used for sheets loaded without pixel data
const PLACEHOLDER: u32 = 0x808080;

/// Software framebuffer presented through a minifb window
pub struct WindowCanvas {
    window: Window,
    buffer: Vec<u32>,
    width: usize,
    height: usize,
}

impl WindowCanvas {
    fn put(&mut self, x: i32, y: i32, rgb: u32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        self.buffer[y as usize * self.width + x as usize] = rgb;
    }

    fn blend(&mut self, x: i32, y: i32, argb: u32, tint: Option<Rgba>) {
        let alpha = argb >> 24;
        if alpha == 0 {
            return;
        }
        let (mut r, mut g, mut b) = ((argb >> 16) & 0xff, (argb >> 8) & 0xff, argb & 0xff);
        if let Some(tint) = tint {
            let (tr, tg, tb, _) = tint.components();
            r = r * tr as u32 / 255;
            g = g * tg as u32 / 255;
            b = b * tb as u32 / 255;
        }
        self.put(x, y, r << 16 | g << 8 | b);
    }

    fn blit(&mut self, sheet: &Sheet, src: SourceRect, dst: Rect, tint: Option<Rgba>) {
        let (dw, dh) = (dst.width.max(1.0) as u32, dst.height.max(1.0) as u32);
        let (ox, oy) = (dst.pos.x as i32, dst.pos.y as i32);
        for dy in 0..dh {
            for dx in 0..dw {
                let sx = src.x + dx * src.w / dw;
                let sy = src.y + dy * src.h / dh;
                match sheet.pixel(sx, sy) {
                    Some(argb) => self.blend(ox + dx as i32, oy + dy as i32, argb, tint),
                    None if sheet.pixels.is_none() => {
                        self.put(ox + dx as i32, oy + dy as i32, PLACEHOLDER)
                    }
                    None => {}
                }
            }
        }
    }
}

impl Canvas for WindowCanvas {
    fn clear(&mut self, color: Rgba) {
        self.buffer.fill(color.to_rgb());
    }

    fn draw_sheet(&mut self, sheet: &Sheet, src: SourceRect, dst: Rect) {
        self.blit(sheet, src, dst, None);
    }

    fn draw_sheet_tinted(&mut self, sheet: &Sheet, src: SourceRect, dst: Rect, tint: Rgba) {
        self.blit(sheet, src, dst, Some(tint));
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        let r = radius.ceil() as i32;
        let (cx, cy) = (center.x as i32, center.y as i32);
        let r2 = radius * radius;
        for y in -r..=r {
            for x in -r..=r {
                if (x * x + y * y) as f32 <= r2 {
                    self.put(cx + x, cy + y, color.to_rgb());
                }
            }
        }
    }

    fn present(&mut self) {
        if let Err(e) = self
            .window
            .update_with_buffer(&self.buffer, self.width, self.height)
        {
            tracing::error!("Failed to present frame: {}", e);
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct MouseState {
    pos: (i32, i32),
    left: bool,
    middle: bool,
    right: bool,
}

/// Desktop back-end: mouse state is sampled from the window and diffed into
/// host events; closing the window or pressing Escape requests quit.
pub struct WindowPlatform {
    canvas: WindowCanvas,
    title: String,
    started: Instant,
    events: VecDeque<HostEvent>,
    mouse: MouseState,
    quit_sent: bool,
}

impl WindowPlatform {
    pub fn new(config: &WindowConfig) -> SimResult<Self> {
        let (width, height) = (config.width as usize, config.height as usize);
        let window = Window::new(&config.title, width, height, WindowOptions::default())
            .map_err(|e| SimError::Platform(format!("Failed to create window: {e}")))?;
        tracing::info!("Opened {}x{} window '{}'", width, height, config.title);
        Ok(Self {
            canvas: WindowCanvas {
                window,
                buffer: vec![0; width * height],
                width,
                height,
            },
            title: config.title.clone(),
            started: Instant::now(),
            events: VecDeque::new(),
            mouse: MouseState::default(),
            quit_sent: false,
        })
    }

    /// Sample window state and queue whatever changed since the last sample
    fn pump(&mut self) {
        let window = &self.canvas.window;
        if !self.quit_sent && (!window.is_open() || window.is_key_down(Key::Escape)) {
            self.quit_sent = true;
            self.events.push_back(HostEvent::Quit);
            return;
        }

        if let Some((x, y)) = window.get_mouse_pos(MouseMode::Clamp) {
            let pos = (x as i32, y as i32);
            if pos != self.mouse.pos {
                self.mouse.pos = pos;
                self.events.push_back(HostEvent::MouseMotion { x: pos.0, y: pos.1 });
            }
        }

        let (x, y) = self.mouse.pos;
        let buttons = [
            (MouseButton::Left, minifb::MouseButton::Left),
            (MouseButton::Middle, minifb::MouseButton::Middle),
            (MouseButton::Right, minifb::MouseButton::Right),
        ];
        for (button, native) in buttons {
            let down = window.get_mouse_down(native);
            let last = match button {
                MouseButton::Left => &mut self.mouse.left,
                MouseButton::Middle => &mut self.mouse.middle,
                MouseButton::Right => &mut self.mouse.right,
            };
            if down != *last {
                *last = down;
                self.events.push_back(HostEvent::MouseButton { button, x, y, pressed: down });
            }
        }

        if let Some((_, dy)) = window.get_scroll_wheel() {
            if dy != 0.0 {
                self.events.push_back(HostEvent::MouseWheel { dy: dy.signum() as i32 });
            }
        }

        for _ in window.get_keys_pressed(KeyRepeat::No) {
            self.events.push_back(HostEvent::Key { pressed: true });
        }
    }
}

impl Platform for WindowPlatform {
    // minifb only resets scroll and pressed keys in `update`, so sampling
    // more than once per drain would repeat the same wheel/key events
    fn begin_poll(&mut self) {
        self.pump();
    }

    fn poll_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }

    fn ticks_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn sleep_ms(&mut self, ms: u64) {
        std::thread::sleep(Duration::from_millis(ms));
        // keep the window responsive through long delays
        self.canvas.window.update();
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.canvas
    }

    fn serial_line(&mut self, line: &str) {
        println!("{line}");
        let title = format!("{} | {}", self.title, line);
        self.canvas.window.set_title(&title);
    }

    fn shutdown(&mut self) {
        tracing::info!("Closing window '{}'", self.title);
    }
}
