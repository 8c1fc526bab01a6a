// src/input.rs - Host input routing
use crate::board::Board;
use crate::geometry::Point;
use crate::platform::{HostEvent, MouseButton, Platform};

/// Result of draining the host queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFlow {
    Continue,
    Quit,
}

/// Turns raw host events into peripheral pointer calls.
///
/// Clicks carry their own position; wheel events use the last position
/// seen in a motion event.
#[derive(Debug, Default, Clone)]
pub struct InputRouter {
    pointer: Point,
}

impl InputRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Apply a single event to the board
    pub fn dispatch(&mut self, event: HostEvent, board: &mut Board) -> InputFlow {
        match event {
            HostEvent::Quit => return InputFlow::Quit,
            HostEvent::MouseMotion { x, y } => self.pointer = Point::from((x, y)),
            HostEvent::MouseButton {
                button: MouseButton::Left,
                x,
                y,
                pressed,
            } => {
                tracing::trace!("click at ({}, {}) pressed={}", x, y, pressed);
                board.broadcast_click(Point::from((x, y)), pressed);
            }
            HostEvent::MouseWheel { dy } if dy != 0 => {
                tracing::trace!("scroll dy={} at {:?}", dy, self.pointer);
                board.broadcast_scroll(self.pointer, dy > 0);
            }
            HostEvent::MouseButton { .. } | HostEvent::MouseWheel { .. } | HostEvent::Key { .. } => {}
        }
        InputFlow::Continue
    }

    /// Drain every queued event. Stops at the first quit request.
    pub fn drain(&mut self, platform: &mut dyn Platform, board: &mut Board) -> InputFlow {
        platform.begin_poll();
        while let Some(event) = platform.poll_event() {
            if self.dispatch(event, board) == InputFlow::Quit {
                tracing::info!("quit requested");
                return InputFlow::Quit;
            }
        }
        InputFlow::Continue
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::peripheral::{Button, PeripheralState, Potentiometer};
    use crate::platform::{Canvas, HeadlessPlatform};

    /// Host whose wheel stays "held" between frames, the way a window
    /// system reports scroll state until its next update
    struct HeldWheel {
        queue: VecDeque<HostEvent>,
        samples: u32,
        headless: HeadlessPlatform,
    }

    impl Platform for HeldWheel {
        fn begin_poll(&mut self) {
            self.samples += 1;
            self.queue.push_back(HostEvent::MouseWheel { dy: 1 });
        }

        fn poll_event(&mut self) -> Option<HostEvent> {
            self.queue.pop_front()
        }

        fn ticks_ms(&self) -> u64 {
            self.headless.ticks_ms()
        }

        fn sleep_ms(&mut self, ms: u64) {
            self.headless.sleep_ms(ms);
        }

        fn canvas(&mut self) -> &mut dyn Canvas {
            self.headless.canvas()
        }

        fn serial_line(&mut self, _line: &str) {}
    }

    fn board() -> Board {
        let mut board = Board::new();
        board
            .connect(Box::new(Button::new(Point::new(100.0, 100.0))), &[2])
            .unwrap();
        board
            .connect(Box::new(Potentiometer::new(Point::new(200.0, 100.0))), &[14])
            .unwrap();
        board
    }

    fn left(x: i32, y: i32, pressed: bool) -> HostEvent {
        HostEvent::MouseButton { button: MouseButton::Left, x, y, pressed }
    }

    #[test]
    fn test_click_reaches_button() {
        let mut board = board();
        let mut router = InputRouter::new();
        router.dispatch(left(110, 110, true), &mut board);
        assert_eq!(board.snapshot()[0], PeripheralState::Button { pressed: true });
        router.dispatch(left(500, 500, false), &mut board);
        assert_eq!(board.snapshot()[0], PeripheralState::Button { pressed: false });
    }

    #[test]
    fn test_non_left_buttons_ignored() {
        let mut board = board();
        let mut router = InputRouter::new();
        let ev = HostEvent::MouseButton { button: MouseButton::Right, x: 110, y: 110, pressed: true };
        router.dispatch(ev, &mut board);
        assert_eq!(board.snapshot()[0], PeripheralState::Button { pressed: false });
    }

    #[test]
    fn test_wheel_uses_last_pointer_position() {
        let mut board = board();
        let mut router = InputRouter::new();
        router.dispatch(HostEvent::MouseWheel { dy: 1 }, &mut board);
        assert_eq!(board.snapshot()[1], PeripheralState::Potentiometer { value: 0 });

        router.dispatch(HostEvent::MouseMotion { x: 210, y: 110 }, &mut board);
        router.dispatch(HostEvent::MouseWheel { dy: 1 }, &mut board);
        router.dispatch(HostEvent::MouseWheel { dy: 2 }, &mut board);
        assert_eq!(board.snapshot()[1], PeripheralState::Potentiometer { value: 128 });
        router.dispatch(HostEvent::MouseWheel { dy: -1 }, &mut board);
        assert_eq!(board.snapshot()[1], PeripheralState::Potentiometer { value: 64 });
    }

    #[test]
    fn test_click_does_not_move_wheel_pointer() {
        let mut board = board();
        let mut router = InputRouter::new();
        router.dispatch(HostEvent::MouseMotion { x: 210, y: 110 }, &mut board);
        router.dispatch(left(110, 110, true), &mut board);
        router.dispatch(left(110, 110, false), &mut board);
        assert_eq!(router.pointer(), Point::new(210.0, 110.0));

        router.dispatch(HostEvent::MouseWheel { dy: 1 }, &mut board);
        assert_eq!(board.snapshot()[1], PeripheralState::Potentiometer { value: 64 });
    }

    #[test]
    fn test_drain_samples_host_once() {
        let mut board = board();
        let mut router = InputRouter::new();
        router.dispatch(HostEvent::MouseMotion { x: 210, y: 110 }, &mut board);
        let mut platform = HeldWheel { queue: VecDeque::new(), samples: 0, headless: HeadlessPlatform::new() };

        assert_eq!(router.drain(&mut platform, &mut board), InputFlow::Continue);
        assert_eq!(router.drain(&mut platform, &mut board), InputFlow::Continue);

        assert_eq!(platform.samples, 2);
        assert_eq!(board.snapshot()[1], PeripheralState::Potentiometer { value: 128 });
    }

    #[test]
    fn test_drain_stops_at_quit() {
        let mut board = board();
        let mut router = InputRouter::new();
        let mut platform = HeadlessPlatform::new();
        platform.push_event(HostEvent::Key { pressed: true });
        platform.push_event(HostEvent::Quit);
        platform.push_event(HostEvent::MouseMotion { x: 1, y: 1 });
        assert_eq!(router.drain(&mut platform, &mut board), InputFlow::Quit);
        assert_eq!(platform.pending_events(), 1);
    }
}
