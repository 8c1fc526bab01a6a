// src/platform/headless.rs - Deterministic platform for tests and batch runs
use std::collections::VecDeque;

use super::{Canvas, HostEvent, Platform};
use crate::assets::{Sheet, SheetId, SourceRect};
use crate::geometry::{Point, Rect, Rgba};

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear(Rgba),
    Sheet { sheet: SheetId, src: SourceRect, dst: Rect, tint: Option<Rgba> },
    Circle { center: Point, radius: f32, color: Rgba },
}

/// Canvas that records draw calls instead of rasterizing them
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    current: Vec<DrawCall>,
    last_frame: Vec<DrawCall>,
    frames: u64,
}

impl RecordingCanvas {
    /// Number of frames presented so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draw calls of the most recently presented frame
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self, color: Rgba) {
        self.current.clear();
        self.current.push(DrawCall::Clear(color));
    }

    fn draw_sheet(&mut self, sheet: &Sheet, src: SourceRect, dst: Rect) {
        self.current.push(DrawCall::Sheet { sheet: sheet.id, src, dst, tint: None });
    }

    fn draw_sheet_tinted(&mut self, sheet: &Sheet, src: SourceRect, dst: Rect, tint: Rgba) {
        self.current.push(DrawCall::Sheet { sheet: sheet.id, src, dst, tint: Some(tint) });
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba) {
        self.current.push(DrawCall::Circle { center, radius, color });
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.current);
        self.frames += 1;
    }
}

/// Platform with a virtual clock and a scripted input queue.
///
/// Time only moves when the simulation sleeps, so runs are reproducible.
/// Scripted events become visible once the clock reaches their due time.
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    now_ms: u64,
    script: VecDeque<(u64, HostEvent)>,
    canvas: RecordingCanvas,
    serial: Vec<String>,
    echo_serial: bool,
    shut_down: bool,
}

impl HeadlessPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print serial monitor lines to stdout as well as capturing them
    pub fn with_serial_echo(mut self, echo: bool) -> Self {
        self.echo_serial = echo;
        self
    }

    /// Queue an event that is available immediately
    pub fn push_event(&mut self, event: HostEvent) {
        let now = self.now_ms;
        self.schedule_event(now, event);
    }

    /// Queue an event that becomes available at `at_ms`
    pub fn schedule_event(&mut self, at_ms: u64, event: HostEvent) {
        // keep the script ordered by due time, FIFO among equal times
        let idx = self.script.partition_point(|(due, _)| *due <= at_ms);
        self.script.insert(idx, (at_ms, event));
    }

    pub fn pending_events(&self) -> usize {
        self.script.len()
    }

    pub fn recording(&self) -> &RecordingCanvas {
        &self.canvas
    }

    pub fn serial_lines(&self) -> &[String] {
        &self.serial
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Platform for HeadlessPlatform {
    fn poll_event(&mut self) -> Option<HostEvent> {
        match self.script.front() {
            Some((due, _)) if *due <= self.now_ms => self.script.pop_front().map(|(_, ev)| ev),
            _ => None,
        }
    }

    fn ticks_ms(&self) -> u64 {
        self.now_ms
    }

    fn sleep_ms(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    fn canvas(&mut self) -> &mut dyn Canvas {
        &mut self.canvas
    }

    fn serial_line(&mut self, line: &str) {
        if self.echo_serial {
            println!("{line}");
        }
        self.serial.push(line.to_string());
    }

    fn shutdown(&mut self) {
        self.shut_down = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_events_respect_due_time() {
        let mut platform = HeadlessPlatform::new();
        platform.schedule_event(100, HostEvent::MouseWheel { dy: 1 });
        platform.push_event(HostEvent::MouseMotion { x: 1, y: 2 });
        assert_eq!(platform.poll_event(), Some(HostEvent::MouseMotion { x: 1, y: 2 }));
        assert_eq!(platform.poll_event(), None);
        platform.sleep_ms(100);
        assert_eq!(platform.poll_event(), Some(HostEvent::MouseWheel { dy: 1 }));
        assert_eq!(platform.pending_events(), 0);
    }

    #[test]
    fn test_equal_due_times_are_fifo() {
        let mut platform = HeadlessPlatform::new();
        platform.schedule_event(5, HostEvent::MouseWheel { dy: 1 });
        platform.schedule_event(5, HostEvent::MouseWheel { dy: -1 });
        platform.sleep_ms(5);
        assert_eq!(platform.poll_event(), Some(HostEvent::MouseWheel { dy: 1 }));
        assert_eq!(platform.poll_event(), Some(HostEvent::MouseWheel { dy: -1 }));
    }

    #[test]
    fn test_recording_canvas_keeps_last_frame() {
        let mut platform = HeadlessPlatform::new();
        let canvas = platform.canvas();
        canvas.clear(Rgba::BLACK);
        canvas.fill_circle(Point::new(1.0, 1.0), 16.0, Rgba::WHITE);
        canvas.present();
        assert_eq!(platform.recording().frames(), 1);
        assert_eq!(platform.recording().last_frame().len(), 2);
    }
}
