// src/demos/vending.rs - Drink vending machine with an LCD front panel
use super::Edge;
use crate::arduino::{A0, A4, A5, Arduino, HIGH, INPUT, LiquidCrystalI2c, map};
use crate::error::SimResult;
use crate::scheduler::Simulation;
use crate::sketch::Sketch;

const BUTTON_UP: u8 = 8;
const BUTTON_DOWN: u8 = 9;
const BUTTON_MAKE: u8 = 10;
const SUGAR_POT: u8 = A0;
const LCD_ADDRESS: u8 = 0x27;

const PRODUCTS: [&str; 3] = ["Coffee", "Chocolate", "Tea"];
const MAX_STOCK: u32 = 10;
const MAX_SUGAR: i64 = 5;

const WELCOME_MS: u32 = 1000;
const MAKING_MS: u32 = 10_000;
const TAKE_TIMEOUT_MS: u32 = 5_000;
const IDLE_MS: u32 = 60_000;
const SELECTION_SHOWN_MS: u32 = 5_000;
const STEP_DELAY_MS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Welcome,
    Ready,
    Making,
    ProductReady,
    Assistance,
    Sleep,
}

#[derive(Debug)]
pub struct Vending {
    lcd: LiquidCrystalI2c,
    state: State,
    state_started: u32,
    stock: [u32; 3],
    selected: usize,
    selection_shown_at: Option<u32>,
    last_activity: u32,
    up: Edge,
    down: Edge,
    make: Edge,
    /// Text currently on the panel, to avoid redrawing every step
    shown: String,
}

impl Default for Vending {
    fn default() -> Self {
        Self {
            lcd: LiquidCrystalI2c::new(LCD_ADDRESS, 16, 2),
            state: State::Welcome,
            state_started: 0,
            stock: [MAX_STOCK; 3],
            selected: 0,
            selection_shown_at: None,
            last_activity: 0,
            up: Edge::default(),
            down: Edge::default(),
            make: Edge::default(),
            shown: String::new(),
        }
    }
}

impl Vending {
    pub fn state(&self) -> State {
        self.state
    }

    pub fn stock(&self) -> [u32; 3] {
        self.stock
    }

    pub fn selected(&self) -> &'static str {
        PRODUCTS[self.selected]
    }

    fn elapsed(&self, hw: &Arduino) -> u32 {
        hw.millis().wrapping_sub(self.state_started)
    }

    fn enter(&mut self, hw: &mut Arduino, state: State) {
        tracing::debug!("vending: {:?} -> {:?}", self.state, state);
        self.state = state;
        self.state_started = hw.millis();
        self.last_activity = self.state_started;
        match state {
            State::Sleep => {
                self.lcd.no_backlight(hw);
                self.show(hw, "");
            }
            State::Assistance => {
                hw.serial().println("Assistance required: machine is empty");
                self.show(hw, "Assistance");
            }
            _ => {}
        }
    }

    /// Clear the panel and print `text` on the first row, indented
    fn show(&mut self, hw: &mut Arduino, text: &str) {
        if self.shown == text {
            return;
        }
        self.lcd.clear(hw);
        self.lcd.set_cursor(hw, 4, 0);
        self.lcd.print(hw, text);
        self.shown = text.to_string();
    }

    fn show_rows(&mut self, hw: &mut Arduino, top: &str, bottom: &str) {
        let joined = format!("{top}\n{bottom}");
        if self.shown == joined {
            return;
        }
        self.lcd.clear(hw);
        self.lcd.set_cursor(hw, 0, 0);
        self.lcd.print(hw, top);
        self.lcd.set_cursor(hw, 0, 1);
        self.lcd.print(hw, bottom);
        self.shown = joined;
    }

    fn sugar(&self, hw: &mut Arduino) -> i64 {
        map(hw.analog_read(SUGAR_POT) as i64, 0, 1023, 0, MAX_SUGAR)
    }

    fn buttons(&mut self, hw: &mut Arduino) -> (bool, bool, bool) {
        let up = self.up.rose(hw.digital_read(BUTTON_UP) == HIGH);
        let down = self.down.rose(hw.digital_read(BUTTON_DOWN) == HIGH);
        let make = self.make.rose(hw.digital_read(BUTTON_MAKE) == HIGH);
        if up || down || make {
            self.last_activity = hw.millis();
        }
        (up, down, make)
    }

    fn welcome(&mut self, hw: &mut Arduino) {
        self.show(hw, "Welcome");
        if self.elapsed(hw) > WELCOME_MS {
            self.enter(hw, State::Ready);
        }
    }

    fn ready(&mut self, hw: &mut Arduino) {
        if self.stock.iter().all(|&s| s == 0) {
            self.enter(hw, State::Assistance);
            return;
        }

        let (up, down, make) = self.buttons(hw);
        if up || down {
            let n = PRODUCTS.len();
            self.selected = if up { (self.selected + 1) % n } else { (self.selected + n - 1) % n };
            self.selection_shown_at = Some(hw.millis());
            hw.serial().println(format!("Selected {}", self.selected()));
        }

        if make {
            if self.stock[self.selected] == 0 {
                hw.serial().println(format!("{} sold out", self.selected()));
                self.show(hw, "Sold out");
                self.selection_shown_at = Some(hw.millis());
            } else {
                let sugar = self.sugar(hw);
                hw.serial()
                    .println(format!("Making {} with sugar {}", self.selected(), sugar));
                self.enter(hw, State::Making);
                return;
            }
        }

        match self.selection_shown_at {
            Some(at) if hw.millis().wrapping_sub(at) < SELECTION_SHOWN_MS => {
                if self.shown != "Sold out" {
                    let sugar = format!("Sugar {}", self.sugar(hw));
                    self.show_rows(hw, &format!("Selected {}", self.selected()), &sugar);
                }
            }
            _ => {
                self.selection_shown_at = None;
                self.show(hw, "Ready");
            }
        }

        if hw.millis().wrapping_sub(self.last_activity) > IDLE_MS {
            self.enter(hw, State::Sleep);
        }
    }

    fn making(&mut self, hw: &mut Arduino) {
        let elapsed = self.elapsed(hw);
        let progress = (elapsed.min(MAKING_MS) * 100 / MAKING_MS) as usize;
        let bar = "#".repeat(progress * 16 / 100);
        self.show_rows(hw, &format!("Making {}", self.selected()), &bar);
        if elapsed >= MAKING_MS {
            self.stock[self.selected] -= 1;
            hw.serial().println(format!("{} ready", self.selected()));
            self.enter(hw, State::ProductReady);
        }
    }

    fn product_ready(&mut self, hw: &mut Arduino) {
        self.show_rows(hw, &format!("Take your {}", self.selected()), "");
        let (_, _, make) = self.buttons(hw);
        if make || self.elapsed(hw) >= TAKE_TIMEOUT_MS {
            self.selection_shown_at = None;
            self.enter(hw, State::Ready);
        }
    }

    fn assistance(&mut self, hw: &mut Arduino) {
        // hold up + down together to restock
        let up = hw.digital_read(BUTTON_UP) == HIGH;
        let down = hw.digital_read(BUTTON_DOWN) == HIGH;
        if up && down {
            self.stock = [MAX_STOCK; 3];
            hw.serial().println("Restocked");
            self.enter(hw, State::Ready);
        }
    }

    fn sleep(&mut self, hw: &mut Arduino) {
        let (up, down, make) = self.buttons(hw);
        if up || down || make {
            self.lcd.backlight(hw);
            self.shown.clear();
            self.enter(hw, State::Ready);
        }
    }
}

impl Sketch for Vending {
    fn setup(&mut self, hw: &mut Arduino) {
        for pin in [BUTTON_UP, BUTTON_DOWN, BUTTON_MAKE] {
            hw.pin_mode(pin, INPUT);
        }
        hw.serial().begin(9600);
        self.lcd.init(hw);
        self.lcd.backlight(hw);
        self.enter(hw, State::Welcome);
    }

    fn step(&mut self, hw: &mut Arduino) {
        match self.state {
            State::Welcome => self.welcome(hw),
            State::Ready => self.ready(hw),
            State::Making => self.making(hw),
            State::ProductReady => self.product_ready(hw),
            State::Assistance => self.assistance(hw),
            State::Sleep => self.sleep(hw),
        }
        hw.delay(STEP_DELAY_MS);
    }
}

fn wire_panel(sim: &mut Simulation) -> SimResult<()> {
    sim.connect_button(BUTTON_UP, 100, 100)?;
    sim.connect_button(BUTTON_DOWN, 100, 200)?;
    sim.connect_button(BUTTON_MAKE, 150, 150)?;
    sim.connect_potentiometer(SUGAR_POT, 100, 300)?;
    sim.connect_lcd(LCD_ADDRESS, A4, A5, 16, 2, 200, 200)?;
    Ok(())
}

pub fn build(sim: &mut Simulation) -> SimResult<Box<dyn Sketch>> {
    wire_panel(sim)?;
    Ok(Box::new(Vending::default()))
}
