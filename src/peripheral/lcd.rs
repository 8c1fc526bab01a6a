// src/peripheral/lcd.rs - Character LCD driven over the two-wire bus
use super::{Peripheral, PeripheralState, LOW};
use crate::assets::{AssetSet, FRAME_SIZE, SheetId};
use crate::geometry::{Point, Rect, Rgba};
use crate::platform::Canvas;

const CELL: f32 = FRAME_SIZE as f32;
/// Tint applied to glyphs while the backlight is off
const UNLIT_TINT: Rgba = Rgba(0x5a5a5aff);

/// Command bytes of the two-byte display protocol
pub mod command {
    pub const WRITE_CHAR: u8 = 0;
    pub const BACKLIGHT: u8 = 1;
    pub const CLEAR: u8 = 2;
    pub const SET_ADDRESS: u8 = 3;
}

/// Border sheet frames
const CORNER_TOP_LEFT: usize = 0;
const CORNER_TOP_RIGHT: usize = 1;
const CORNER_BOTTOM_LEFT: usize = 2;
const CORNER_BOTTOM_RIGHT: usize = 3;
const EDGE_TOP: usize = 4;
const EDGE_BOTTOM: usize = 5;
const EDGE_LEFT: usize = 6;
const EDGE_RIGHT: usize = 7;

#[derive(Debug, Clone)]
pub struct Lcd {
    pos: Point,
    cols: u8,
    rows: u8,
    bus_address: u8,
    cells: Vec<u8>,
    cursor: usize,
    backlight: bool,
    pending: [u8; 2],
    pending_len: usize,
}

impl Lcd {
    pub fn new(pos: Point, bus_address: u8, cols: u8, rows: u8) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            pos,
            cols,
            rows,
            bus_address,
            cells: vec![b' '; cols as usize * rows as usize],
            cursor: 0,
            backlight: false,
            pending: [0; 2],
            pending_len: 0,
        }
    }

    pub fn bus_address(&self) -> u8 {
        self.bus_address
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Current write address (cell index)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cell(&self, index: usize) -> Option<u8> {
        self.cells.get(index).copied()
    }

    /// Buffer contents, one string per row
    pub fn lines(&self) -> Vec<String> {
        self.cells
            .chunks(self.cols as usize)
            .map(|row| row.iter().map(|&b| b as char).collect())
            .collect()
    }

    fn dispatch(&mut self, cmd: u8, data: u8) {
        match cmd {
            command::WRITE_CHAR => {
                if let Some(cell) = self.cells.get_mut(self.cursor) {
                    *cell = data;
                }
                self.cursor = self.cursor.saturating_add(1);
            }
            command::BACKLIGHT => self.backlight = data != 0,
            command::CLEAR => self.cells.fill(b' '),
            command::SET_ADDRESS => {
                let cols = self.cols as usize;
                let row = (data as usize / cols).min(self.rows as usize - 1);
                self.cursor = row * cols + data as usize % cols;
            }
            other => {
                tracing::debug!("LCD 0x{:02x}: ignoring unknown command {}", self.bus_address, other);
            }
        }
    }

    fn cell_rect(&self, col: usize, row: usize) -> Rect {
        Rect::new(
            self.pos.offset(col as f32 * CELL, row as f32 * CELL),
            CELL,
            CELL,
        )
    }
}

impl Peripheral for Lcd {
    fn kind(&self) -> &'static str {
        "lcd"
    }

    fn digital_read(&self, _pin: u8) -> u8 {
        LOW
    }

    fn digital_write(&mut self, _pin: u8, _value: u8) {}

    fn analog_read(&self, _pin: u8) -> u16 {
        0
    }

    fn analog_write(&mut self, _pin: u8, _value: u8) {}

    fn pointer_click(&mut self, _pos: Point, _pressed: bool) {}

    fn pointer_scroll(&mut self, _pos: Point, _up: bool) {}

    fn render(&self, canvas: &mut dyn Canvas, assets: &AssetSet) {
        let border = assets.sheet(SheetId::LcdBorder);
        let (cols, rows) = (self.cols as usize, self.rows as usize);
        let (right, bottom) = (cols + 1, rows + 1);

        let mut frame = |col, row, index| {
            canvas.draw_sheet(border, border.frame_rect(index), self.cell_rect(col, row));
        };
        frame(0, 0, CORNER_TOP_LEFT);
        frame(right, 0, CORNER_TOP_RIGHT);
        frame(0, bottom, CORNER_BOTTOM_LEFT);
        frame(right, bottom, CORNER_BOTTOM_RIGHT);
        for col in 1..=cols {
            frame(col, 0, EDGE_TOP);
            frame(col, bottom, EDGE_BOTTOM);
        }
        for row in 1..=rows {
            frame(0, row, EDGE_LEFT);
            frame(right, row, EDGE_RIGHT);
        }

        let font = assets.sheet(SheetId::Font);
        for (i, &code) in self.cells.iter().enumerate() {
            let dst = self.cell_rect(i % cols + 1, i / cols + 1);
            let src = font.glyph_rect(code);
            if self.backlight {
                canvas.draw_sheet(font, src, dst);
            } else {
                canvas.draw_sheet_tinted(font, src, dst, UNLIT_TINT);
            }
        }
    }

    fn bounds(&self) -> Rect {
        Rect::new(
            self.pos,
            (self.cols as f32 + 2.0) * CELL,
            (self.rows as f32 + 2.0) * CELL,
        )
    }

    fn snapshot(&self) -> PeripheralState {
        PeripheralState::Lcd {
            backlight: self.backlight,
            address: self.bus_address,
            lines: self.lines(),
        }
    }

    fn bus_begin(&mut self) {
        self.pending_len = 0;
    }

    fn bus_write(&mut self, byte: u8) {
        self.pending[self.pending_len] = byte;
        self.pending_len += 1;
        if self.pending_len == self.pending.len() {
            self.pending_len = 0;
            let [cmd, data] = self.pending;
            self.dispatch(cmd, data);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{DrawCall, HeadlessPlatform, Platform};

    fn lcd() -> Lcd {
        Lcd::new(Point::new(0.0, 0.0), 0x27, 16, 2)
    }

    fn send(lcd: &mut Lcd, bytes: &[u8]) {
        for &b in bytes {
            lcd.bus_write(b);
        }
    }

    #[test]
    fn test_buffer_starts_blank() {
        let lcd = lcd();
        assert_eq!(lcd.lines(), vec![" ".repeat(16), " ".repeat(16)]);
        assert!(!lcd.backlight());
    }

    #[test]
    fn test_set_address_then_write() {
        let mut lcd = lcd();
        send(&mut lcd, &[3, 5, 0, b'A']);
        assert_eq!(lcd.cell(5), Some(b'A'));
        assert_eq!(lcd.cursor(), 6);
    }

    #[test]
    fn test_clear_keeps_address() {
        let mut lcd = lcd();
        send(&mut lcd, &[3, 18, 0, b'x', 2, 0]);
        assert_eq!(lcd.cursor(), 19);
        assert!(lcd.lines().iter().all(|l| l.trim().is_empty()));
    }

    #[test]
    fn test_backlight_toggle() {
        let mut lcd = lcd();
        send(&mut lcd, &[1, 1]);
        assert!(lcd.backlight());
        send(&mut lcd, &[1, 0]);
        assert!(!lcd.backlight());
    }

    #[test]
    fn test_set_address_clamps_row_and_keeps_column() {
        let mut lcd = lcd();
        // row 4 of a 2-row display, column 3
        send(&mut lcd, &[3, 4 * 16 + 3]);
        assert_eq!(lcd.cursor(), 16 + 3);
    }

    #[test]
    fn test_writes_past_end_are_discarded() {
        let mut lcd = lcd();
        send(&mut lcd, &[3, 31, 0, b'z', 0, b'q']);
        assert_eq!(lcd.cell(31), Some(b'z'));
        assert_eq!(lcd.cursor(), 33);
        assert_eq!(lcd.lines()[1].chars().last(), Some('z'));
    }

    #[test]
    fn test_unknown_command_is_ignored() {
        let mut lcd = lcd();
        send(&mut lcd, &[9, 9, 0, b'k']);
        assert_eq!(lcd.cell(0), Some(b'k'));
    }

    #[test]
    fn test_bus_begin_drops_half_command() {
        let mut lcd = lcd();
        lcd.bus_write(3);
        lcd.bus_begin();
        send(&mut lcd, &[0, b'B']);
        assert_eq!(lcd.cell(0), Some(b'B'));
    }

    #[test]
    fn test_render_draws_border_and_glyphs() {
        let mut lcd = lcd();
        send(&mut lcd, &[1, 1, 0, b'A']);
        let assets = AssetSet::builtin();
        let mut platform = HeadlessPlatform::new();
        lcd.render(platform.canvas(), &assets);
        platform.canvas().present();

        let calls = platform.recording().last_frame();
        // 4 corners + 2*16 horizontal + 2*2 vertical edges + 32 glyphs
        assert_eq!(calls.len(), 4 + 32 + 4 + 32);
        let first_glyph = calls
            .iter()
            .find(|c| matches!(c, DrawCall::Sheet { sheet: SheetId::Font, .. }));
        match first_glyph {
            Some(DrawCall::Sheet { src, dst, tint, .. }) => {
                assert_eq!((src.x, src.y), (32, 4 * 32));
                assert_eq!((dst.pos.x, dst.pos.y), (32.0, 32.0));
                assert_eq!(*tint, None);
            }
            other => panic!("unexpected draw call {other:?}"),
        }
    }
}
