// src/demos/catch_ball.rs - "Catch the bouncing LED ball" reaction game
//
// A light bounces across four LEDs; when it stops, press the button under
// it before the reaction window closes. Each catch speeds the game up by a
// percentage picked with the potentiometer.
use crate::arduino::{A0, Arduino, HIGH, INPUT, LOW, OUTPUT, constrain, map};
use crate::error::SimResult;
use crate::geometry::Rgba;
use crate::scheduler::Simulation;
use crate::sketch::Sketch;

const RED_LED: u8 = 9;
const LEDS: [u8; 4] = [3, 4, 5, 6];
const BUTTONS: [u8; 4] = [2, 7, 8, 10];
const POT: u8 = A0;

const DIFFICULTIES: [u32; 8] = [10, 12, 15, 18, 21, 24, 27, 30];
const FADE_AMOUNT: i32 = 10;
const SLEEP_AFTER_MS: u32 = 10_000;
const FRAME_DELAY_MS: u32 = 16;

const GREEN_OFF: Rgba = Rgba(0x0a3a0aff);
const GREEN_ON: Rgba = Rgba(0x20ff20ff);
const RED_OFF: Rgba = Rgba(0x3a0a0aff);
const RED_ON: Rgba = Rgba(0xff2020ff);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,
    Sleep,
    Bouncing,
    Stopped,
}

#[derive(Debug)]
pub struct CatchBall {
    state: State,
    state_started: u32,
    difficulty: usize,
    score: u32,
    pos: usize,
    dir: isize,
    bouncing_time: u32,
    reaction_time: u32,
    blink_time: u32,
    blink_started: u32,
    light: i32,
    light_dir: i32,
}

impl Default for CatchBall {
    fn default() -> Self {
        Self {
            state: State::Start,
            state_started: 0,
            difficulty: 0,
            score: 0,
            pos: 0,
            dir: 1,
            bouncing_time: 0,
            reaction_time: 0,
            blink_time: 0,
            blink_started: 0,
            light: 0,
            light_dir: 1,
        }
    }
}

fn percent(value: u32, by: u32) -> u32 {
    value * by / 100
}

fn pressed(hw: &mut Arduino, button: usize) -> bool {
    hw.digital_read(BUTTONS[button]) == HIGH
}

fn turn_leds_off(hw: &mut Arduino) {
    hw.analog_write(RED_LED, 0);
    for pin in LEDS {
        hw.digital_write(pin, LOW);
    }
}

impl CatchBall {
    pub fn state(&self) -> State {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    fn elapsed(&self, hw: &Arduino) -> u32 {
        hw.millis().wrapping_sub(self.state_started)
    }

    fn new_game(&mut self, hw: &mut Arduino) {
        let reading = hw.analog_read(POT) as i64;
        self.difficulty = constrain(map(reading, 0, 1023, 0, 7), 0, 7) as usize;
        self.score = 0;
        self.pos = 0;
        self.dir = 1;
        self.bouncing_time = hw.random_range(4000, 4501) as u32;
        self.reaction_time = 2000;
        self.blink_time = 150;
        hw.serial()
            .println(format!("Difficulty for this game is: {}", self.difficulty + 1));
        hw.serial().println("Go!");
    }

    fn update_score(&mut self, hw: &mut Arduino) {
        self.score += 1;
        hw.serial().println(format!("New point! Score: {}", self.score));
        let by = DIFFICULTIES[self.difficulty];
        self.bouncing_time -= percent(self.bouncing_time, by);
        self.reaction_time -= percent(self.reaction_time, by);
        self.blink_time -= percent(self.blink_time, by);
    }

    fn end_game(&mut self, hw: &mut Arduino) {
        hw.serial()
            .println(format!("Game Over. Final Score: {}", self.score));
        turn_leds_off(hw);
    }

    fn enter(&mut self, hw: &Arduino, state: State) {
        tracing::debug!("catch-ball: {:?} -> {:?}", self.state, state);
        self.state = state;
        self.state_started = hw.millis();
    }

    fn enter_start(&mut self, hw: &mut Arduino, greet: bool) {
        self.enter(hw, State::Start);
        self.light = 0;
        self.light_dir = 1;
        turn_leds_off(hw);
        if greet {
            hw.serial().println(
                "Welcome to the Catch the Bouncing Led Ball game. Press key T1 to start.",
            );
        }
    }

    fn enter_sleep(&mut self, hw: &mut Arduino) {
        self.enter(hw, State::Sleep);
        turn_leds_off(hw);
        hw.serial().println("entering deep sleep...");
    }

    fn enter_bouncing(&mut self, hw: &mut Arduino) {
        self.enter(hw, State::Bouncing);
        self.blink_started = hw.millis();
        hw.analog_write(RED_LED, 0);
    }

    fn state_start(&mut self, hw: &mut Arduino) {
        self.light += FADE_AMOUNT * self.light_dir;
        if self.light <= 0 || self.light >= 255 {
            self.light_dir = -self.light_dir;
        }
        hw.analog_write(RED_LED, constrain(self.light, 0, 255) as u8);
        if self.elapsed(hw) >= SLEEP_AFTER_MS {
            self.enter_sleep(hw);
        } else if pressed(hw, 0) {
            self.new_game(hw);
            self.enter_bouncing(hw);
        }
    }

    fn state_sleep(&mut self, hw: &mut Arduino) {
        if pressed(hw, 0) {
            self.new_game(hw);
            self.enter_bouncing(hw);
        } else if (1..4).any(|b| pressed(hw, b)) {
            self.enter_start(hw, false);
        }
    }

    fn state_bouncing(&mut self, hw: &mut Arduino) {
        if hw.millis().wrapping_sub(self.blink_started) >= self.blink_time {
            self.blink_started = hw.millis();
            hw.digital_write(LEDS[self.pos], LOW);
            self.pos = self.pos.saturating_add_signed(self.dir);
            self.dir = match self.pos {
                3 => -1,
                0 => 1,
                _ => self.dir,
            };
            hw.digital_write(LEDS[self.pos], HIGH);
        }
        if self.elapsed(hw) >= self.bouncing_time {
            self.enter(hw, State::Stopped);
        }
    }

    fn state_stopped(&mut self, hw: &mut Arduino) {
        if let Some(button) = (0..4).find(|&b| pressed(hw, b)) {
            if button == self.pos {
                self.update_score(hw);
                self.enter_bouncing(hw);
            } else {
                self.end_game(hw);
                self.enter_start(hw, true);
            }
        } else if self.elapsed(hw) >= self.reaction_time {
            self.end_game(hw);
            self.enter_start(hw, true);
        }
    }
}

impl Sketch for CatchBall {
    fn setup(&mut self, hw: &mut Arduino) {
        hw.serial().begin(9600);
        hw.pin_mode(RED_LED, OUTPUT);
        for pin in LEDS {
            hw.pin_mode(pin, OUTPUT);
        }
        for pin in BUTTONS {
            hw.pin_mode(pin, INPUT);
        }
        self.enter_start(hw, true);
    }

    fn step(&mut self, hw: &mut Arduino) {
        match self.state {
            State::Start => self.state_start(hw),
            State::Sleep => self.state_sleep(hw),
            State::Bouncing => self.state_bouncing(hw),
            State::Stopped => self.state_stopped(hw),
        }
        hw.delay(FRAME_DELAY_MS);
    }
}

pub fn build(sim: &mut Simulation) -> SimResult<Box<dyn Sketch>> {
    for (i, pin) in LEDS.into_iter().enumerate() {
        sim.connect_led(pin, 400 + 64 * i as i32, 300, GREEN_OFF, GREEN_ON)?;
    }
    sim.connect_led(RED_LED, 100, 100, RED_OFF, RED_ON)?;
    for (i, pin) in BUTTONS.into_iter().enumerate() {
        sim.connect_button(pin, 400 + 64 * i as i32, 400)?;
    }
    sim.connect_potentiometer(POT, 100, 200)?;
    Ok(Box::new(CatchBall::default()))
}
