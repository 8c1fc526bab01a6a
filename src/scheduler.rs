//! Frame/time scheduler.
//!
//! [`Simulation`] is the context object for one simulated board. It owns
//! the board, the host platform, the loaded sheets, the RNG and the serial
//! log, and drives the main loop:
//!
//! 1. `setup` runs once, then the board is sealed
//! 2. every tick drains host input, runs one `step`, renders and sleeps
//!    the rest of the tick
//!
//! [`Simulation::wait`] is the cooperative suspension point used by the
//! sketch-facing `delay`. It drains input and renders one frame with the
//! same routines the main loop uses, sleeps, then drains input again so
//! whatever arrived during the sleep is visible once it returns.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::arduino::Arduino;
use crate::assets::AssetSet;
use crate::board::Board;
use crate::config::{Config, TerminationPolicy};
use crate::error::SimResult;
use crate::geometry::{Point, Rgba};
use crate::input::{InputFlow, InputRouter};
use crate::peripheral::{Button, Lcd, Led, PeripheralState, Potentiometer};
use crate::platform::Platform;
use crate::sketch::Sketch;

/// Background colour of the simulated view
pub const BACKGROUND: Rgba = Rgba(0x3c3c3cff);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimState {
    Setup,
    Running,
    Terminated,
}

/// Why the main loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    Quit,
    TickLimit,
    TimeLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub stop: StopReason,
    pub ticks: u64,
    pub frames: u64,
    pub elapsed_ms: u64,
}

pub struct Simulation {
    pub(crate) board: Board,
    router: InputRouter,
    pub(crate) platform: Box<dyn Platform>,
    assets: AssetSet,
    config: Config,
    pub(crate) rng: StdRng,
    serial_log: Vec<String>,
    state: SimState,
    epoch_ms: u64,
    ticks: u64,
    frames: u64,
}

impl Simulation {
    /// Build a simulation, loading sheets from the configured asset directory
    pub fn new(config: Config, platform: Box<dyn Platform>) -> SimResult<Self> {
        config.validate()?;
        let assets = AssetSet::from_config(config.assets.dir.as_ref())?;
        Ok(Self::with_assets(config, platform, assets))
    }

    pub fn with_assets(config: Config, platform: Box<dyn Platform>, assets: AssetSet) -> Self {
        let rng = match config.random.seed {
            Some(seed) => {
                tracing::debug!("RNG seeded with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        let epoch_ms = platform.ticks_ms();
        tracing::info!("Simulation '{}' initialized", config.window.title);
        Self {
            board: Board::new(),
            router: InputRouter::new(),
            platform,
            assets,
            config,
            rng,
            serial_log: Vec::new(),
            state: SimState::Setup,
            epoch_ms,
            ticks: 0,
            frames: 0,
        }
    }

    pub fn connect_led(&mut self, pin: u8, x: i32, y: i32, color_min: Rgba, color_max: Rgba) -> SimResult<usize> {
        let led = Led::new(Point::from((x, y)), color_min, color_max);
        self.board.connect(Box::new(led), &[pin])
    }

    pub fn connect_button(&mut self, pin: u8, x: i32, y: i32) -> SimResult<usize> {
        self.board.connect(Box::new(Button::new(Point::from((x, y)))), &[pin])
    }

    pub fn connect_potentiometer(&mut self, pin: u8, x: i32, y: i32) -> SimResult<usize> {
        self.board
            .connect(Box::new(Potentiometer::new(Point::from((x, y)))), &[pin])
    }

    /// Connect a character LCD on the two bus pins and register it at `address`
    #[allow(clippy::too_many_arguments)]
    pub fn connect_lcd(
        &mut self,
        address: u8,
        sda: u8,
        scl: u8,
        cols: u8,
        rows: u8,
        x: i32,
        y: i32,
    ) -> SimResult<usize> {
        let lcd = Lcd::new(Point::from((x, y)), address, cols, rows);
        let slot = self.board.connect(Box::new(lcd), &[sda, scl])?;
        self.board.register_bus_device(address, slot);
        Ok(slot)
    }

    /// Run `sketch` until quit or a configured run limit.
    ///
    /// `setup` is only ever invoked once per simulation, even if `run` is
    /// called again after a limit stopped the loop.
    pub fn run(&mut self, sketch: &mut dyn Sketch) -> RunSummary {
        if self.state == SimState::Setup {
            tracing::info!("Running sketch setup");
            sketch.setup(&mut Arduino::new(self));
            self.board.seal();
            if self.state == SimState::Setup {
                self.state = SimState::Running;
            }
        }

        let limits = (self.config.scheduler.max_ticks, self.config.scheduler.max_runtime_ms);
        let tick_ms = self.config.scheduler.tick_ms;
        let started_ticks = self.ticks;
        let stop = loop {
            if self.state == SimState::Terminated {
                break StopReason::Quit;
            }
            if limits.0 > 0 && self.ticks - started_ticks >= limits.0 {
                break StopReason::TickLimit;
            }
            if limits.1 > 0 && self.uptime_ms() >= limits.1 {
                break StopReason::TimeLimit;
            }

            let tick_start = self.platform.ticks_ms();
            self.poll_input();
            if self.state == SimState::Terminated {
                break StopReason::Quit;
            }
            sketch.step(&mut Arduino::new(self));
            self.ticks += 1;
            self.render_frame();

            let spent = self.platform.ticks_ms().saturating_sub(tick_start);
            if spent < tick_ms && self.state != SimState::Terminated {
                self.platform.sleep_ms(tick_ms - spent);
            }
        };

        let summary = RunSummary {
            stop,
            ticks: self.ticks,
            frames: self.frames,
            elapsed_ms: self.uptime_ms(),
        };
        tracing::info!(
            "Main loop stopped ({:?}) after {} ticks, {} ms",
            summary.stop,
            summary.ticks,
            summary.elapsed_ms
        );
        summary
    }

    /// Dispatch every queued host event to the board
    pub fn poll_input(&mut self) {
        if self.state == SimState::Terminated {
            return;
        }
        if self.router.drain(self.platform.as_mut(), &mut self.board) == InputFlow::Quit {
            self.terminate();
        }
    }

    /// Draw the board and present one frame
    pub fn render_frame(&mut self) {
        if self.state == SimState::Terminated {
            return;
        }
        let canvas = self.platform.canvas();
        canvas.clear(BACKGROUND);
        self.board.render(canvas, &self.assets);
        canvas.present();
        self.frames += 1;
    }

    /// Drain input, render one frame, sleep whatever is left of `ms`, then
    /// drain input again. Returns immediately once the simulation has
    /// terminated.
    pub fn wait(&mut self, ms: u64) {
        if self.state == SimState::Terminated {
            return;
        }
        let start = self.platform.ticks_ms();
        self.poll_input();
        self.render_frame();
        if self.state == SimState::Terminated {
            return;
        }
        let spent = self.platform.ticks_ms().saturating_sub(start);
        if spent < ms {
            self.platform.sleep_ms(ms - spent);
        }
        self.poll_input();
    }

    fn terminate(&mut self) {
        match self.config.scheduler.termination {
            TerminationPolicy::Exit => {
                tracing::info!("Shutting down after {} ticks", self.ticks);
                self.platform.shutdown();
                std::process::exit(0);
            }
            TerminationPolicy::Halt => {
                tracing::info!("Simulation halted after {} ticks", self.ticks);
                self.state = SimState::Terminated;
            }
        }
    }

    /// Record a serial monitor line and hand it to the host
    pub(crate) fn serial_line(&mut self, line: String) {
        tracing::info!(target: "serial", "{}", line);
        self.platform.serial_line(&line);
        self.serial_log.push(line);
    }

    /// Milliseconds since the simulation was created
    pub fn uptime_ms(&self) -> u64 {
        self.platform.ticks_ms().saturating_sub(self.epoch_ms)
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn serial_log(&self) -> &[String] {
        &self.serial_log
    }

    pub fn snapshot(&self) -> Vec<PeripheralState> {
        self.board.snapshot()
    }

    /// Tear down the host platform without ending the process
    pub fn shutdown(mut self) {
        self.platform.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::arduino::HIGH;
    use crate::assets::{Sheet, SourceRect};
    use crate::geometry::Rect;
    use crate::platform::{Canvas, HeadlessPlatform, HostEvent, MouseButton};
    use crate::sketch::FnSketch;

    type Frames = Rc<RefCell<Vec<Vec<Rgba>>>>;

    /// Virtual clock plus a canvas that keeps the circle colours of every presented frame
    struct CircleLog {
        now_ms: u64,
        drawing: Vec<Rgba>,
        presented: Frames,
    }

    impl Canvas for CircleLog {
        fn clear(&mut self, _color: Rgba) {
            self.drawing.clear();
        }

        fn draw_sheet(&mut self, _sheet: &Sheet, _src: SourceRect, _dst: Rect) {}

        fn fill_circle(&mut self, _center: Point, _radius: f32, color: Rgba) {
            self.drawing.push(color);
        }

        fn present(&mut self) {
            self.presented.borrow_mut().push(std::mem::take(&mut self.drawing));
        }
    }

    impl Platform for CircleLog {
        fn poll_event(&mut self) -> Option<HostEvent> {
            None
        }

        fn ticks_ms(&self) -> u64 {
            self.now_ms
        }

        fn sleep_ms(&mut self, ms: u64) {
            self.now_ms += ms;
        }

        fn canvas(&mut self) -> &mut dyn Canvas {
            self
        }

        fn serial_line(&mut self, _line: &str) {}
    }

    fn halting_config() -> Config {
        let mut config = Config::default();
        config.scheduler.termination = TerminationPolicy::Halt;
        config.random.seed = Some(7);
        config
    }

    #[test]
    fn test_tick_limit_stops_loop() {
        let mut config = halting_config();
        config.scheduler.max_ticks = 5;
        let mut sim = Simulation::new(config, Box::new(HeadlessPlatform::new())).unwrap();
        let mut sketch = FnSketch::new(|_| {}, |_| {});
        let summary = sim.run(&mut sketch);
        assert_eq!(summary.stop, StopReason::TickLimit);
        assert_eq!(summary.ticks, 5);
        assert_eq!(summary.frames, 5);
        assert_eq!(summary.elapsed_ms, 5 * 16);
    }

    #[test]
    fn test_time_limit_stops_loop() {
        let mut config = halting_config();
        config.scheduler.max_runtime_ms = 1000;
        let mut sim = Simulation::new(config, Box::new(HeadlessPlatform::new())).unwrap();
        let mut sketch = FnSketch::new(|_| {}, |hw| hw.delay(300));
        let summary = sim.run(&mut sketch);
        assert_eq!(summary.stop, StopReason::TimeLimit);
        assert_eq!(summary.ticks, 4);
    }

    #[test]
    fn test_wait_renders_once_and_sleeps() {
        let mut sim = Simulation::new(halting_config(), Box::new(HeadlessPlatform::new())).unwrap();
        sim.wait(500);
        assert_eq!(sim.frames(), 1);
        assert_eq!(sim.uptime_ms(), 500);
    }

    #[test]
    fn test_quit_halts_and_waits_return_immediately() {
        let mut platform = HeadlessPlatform::new();
        platform.schedule_event(100, HostEvent::Quit);
        let mut sim = Simulation::new(halting_config(), Box::new(platform)).unwrap();
        sim.wait(100);
        sim.wait(10);
        assert_eq!(sim.state(), SimState::Terminated);
        let before = sim.uptime_ms();
        sim.wait(1000);
        assert_eq!(sim.uptime_ms(), before);
    }

    #[test]
    fn test_frame_shows_the_step_that_just_ran() {
        let presented = Frames::default();
        let platform = CircleLog { now_ms: 0, drawing: Vec::new(), presented: presented.clone() };
        let mut config = halting_config();
        config.scheduler.max_ticks = 1;
        let mut sim = Simulation::new(config, Box::new(platform)).unwrap();
        sim.connect_led(3, 0, 0, Rgba::BLACK, Rgba::WHITE).unwrap();

        let summary = sim.run(&mut FnSketch::new(|_| {}, |hw| hw.digital_write(3, HIGH)));

        assert_eq!(summary.frames, 1);
        assert_eq!(*presented.borrow(), vec![vec![Rgba::WHITE]]);
    }

    #[test]
    fn test_input_arriving_during_wait_is_dispatched_before_return() {
        let mut platform = HeadlessPlatform::new();
        let click = HostEvent::MouseButton { button: MouseButton::Left, x: 5, y: 5, pressed: true };
        platform.schedule_event(200, click);
        let mut sim = Simulation::new(halting_config(), Box::new(platform)).unwrap();
        sim.connect_button(2, 0, 0).unwrap();

        sim.wait(500);

        assert_eq!(sim.snapshot()[0], PeripheralState::Button { pressed: true });
        assert_eq!(sim.frames(), 1);
        assert_eq!(sim.uptime_ms(), 500);
    }

    #[test]
    fn test_connect_after_setup_is_rejected() {
        let mut config = halting_config();
        config.scheduler.max_ticks = 1;
        let mut sim = Simulation::new(config, Box::new(HeadlessPlatform::new())).unwrap();
        sim.connect_button(2, 0, 0).unwrap();
        sim.run(&mut FnSketch::new(|_| {}, |_| {}));
        assert!(sim.connect_button(3, 40, 0).is_err());
    }
}
