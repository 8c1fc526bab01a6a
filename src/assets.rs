//! Bitmap sheets used to draw the peripherals.
//!
//! Four sheets are loaded once at startup: the button (2 frames), the
//! potentiometer (8 frames), the LCD border pieces (8 frames) and the font
//! (16 glyphs per row). Every frame and glyph is 32x32 pixels.
//!
//! Sheets are uncompressed BMP files (24 or 32 bits per pixel). When a sheet
//! directory is configured every sheet must be present; without one the
//! built-in geometry is used and back-ends draw placeholders.

use std::path::{Path, PathBuf};

use crate::error::{SimError, SimResult};

/// Frame/glyph edge length in pixels
pub const FRAME_SIZE: u32 = 32;
/// Glyphs per row of the font sheet
pub const FONT_GLYPHS_PER_ROW: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SheetId {
    Button,
    Potentiometer,
    LcdBorder,
    Font,
}

impl SheetId {
    pub const ALL: [SheetId; 4] = [
        SheetId::Button,
        SheetId::Potentiometer,
        SheetId::LcdBorder,
        SheetId::Font,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            SheetId::Button => "button.bmp",
            SheetId::Potentiometer => "pot.bmp",
            SheetId::LcdBorder => "lcd1.bmp",
            SheetId::Font => "font.bmp",
        }
    }

    /// Sheet size in pixels when no bitmap is loaded
    pub fn builtin_size(self) -> (u32, u32) {
        match self {
            SheetId::Button => (2 * FRAME_SIZE, FRAME_SIZE),
            SheetId::Potentiometer => (8 * FRAME_SIZE, FRAME_SIZE),
            SheetId::LcdBorder => (8 * FRAME_SIZE, FRAME_SIZE),
            SheetId::Font => (FONT_GLYPHS_PER_ROW * FRAME_SIZE, 16 * FRAME_SIZE),
        }
    }
}

/// Source rectangle inside a sheet, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// A decoded (or placeholder) sprite sheet
#[derive(Debug, Clone)]
pub struct Sheet {
    pub id: SheetId,
    pub width: u32,
    pub height: u32,
    /// Row-major `0xAARRGGBB` pixels, top row first
    pub pixels: Option<Vec<u32>>,
}

impl Sheet {
    fn builtin(id: SheetId) -> Self {
        let (width, height) = id.builtin_size();
        Self {
            id,
            width,
            height,
            pixels: None,
        }
    }

    /// Horizontal strip frame `frame`
    pub fn frame_rect(&self, frame: usize) -> SourceRect {
        SourceRect {
            x: frame as u32 * FRAME_SIZE,
            y: 0,
            w: FRAME_SIZE,
            h: FRAME_SIZE,
        }
    }

    /// Glyph cell for a character code
    pub fn glyph_rect(&self, code: u8) -> SourceRect {
        let code = code as u32;
        SourceRect {
            x: (code % FONT_GLYPHS_PER_ROW) * FRAME_SIZE,
            y: (code / FONT_GLYPHS_PER_ROW) * FRAME_SIZE,
            w: FRAME_SIZE,
            h: FRAME_SIZE,
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .as_ref()
            .map(|p| p[(y * self.width + x) as usize])
    }
}

/// The fixed set of sheets every simulation draws with
#[derive(Debug, Clone)]
pub struct AssetSet {
    sheets: [Sheet; 4],
}

impl AssetSet {
    /// Placeholder geometry, no pixels
    pub fn builtin() -> Self {
        Self {
            sheets: SheetId::ALL.map(Sheet::builtin),
        }
    }

    /// Load every sheet from `dir`. A missing or undecodable file is fatal.
    pub fn load(dir: &Path) -> SimResult<Self> {
        let mut sheets = Vec::with_capacity(SheetId::ALL.len());
        for id in SheetId::ALL {
            let path = dir.join(id.file_name());
            let bytes = std::fs::read(&path).map_err(|e| {
                tracing::error!("Failed to load sheet '{}': {}", path.display(), e);
                SimError::MissingAsset { path: path.clone() }
            })?;
            let image = decode_bmp(&bytes).map_err(|reason| SimError::InvalidAsset {
                path: path.clone(),
                reason,
            })?;
            tracing::debug!("Loaded sheet {} ({}x{})", path.display(), image.width, image.height);
            sheets.push(Sheet {
                id,
                width: image.width,
                height: image.height,
                pixels: Some(image.pixels),
            });
        }
        let sheets: [Sheet; 4] = sheets
            .try_into()
            .map_err(|_| SimError::Platform("sheet table size mismatch".to_string()))?;
        Ok(Self { sheets })
    }

    /// Load from a configured directory, or fall back to the built-in geometry
    pub fn from_config(dir: Option<&PathBuf>) -> SimResult<Self> {
        match dir {
            Some(dir) => Self::load(dir),
            None => Ok(Self::builtin()),
        }
    }

    pub fn sheet(&self, id: SheetId) -> &Sheet {
        let idx = SheetId::ALL
            .iter()
            .position(|s| *s == id)
            .unwrap_or_default();
        &self.sheets[idx]
    }
}

/// Decoded bitmap
#[derive(Debug, Clone)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

fn read_u16(bytes: &[u8], at: usize) -> Result<u16, String> {
    bytes
        .get(at..at + 2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .ok_or_else(|| format!("truncated header at offset {at}"))
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32, String> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| format!("truncated header at offset {at}"))
}

/// Decode an uncompressed 24/32-bit BMP into `0xAARRGGBB` pixels
pub fn decode_bmp(bytes: &[u8]) -> Result<Image, String> {
    if bytes.get(0..2) != Some(b"BM") {
        return Err("not a BMP file".to_string());
    }
    let data_offset = read_u32(bytes, 10)? as usize;
    let width = read_u32(bytes, 18)? as i32;
    let raw_height = read_u32(bytes, 22)? as i32;
    let bpp = read_u16(bytes, 28)?;
    let compression = read_u32(bytes, 30)?;

    if width <= 0 || raw_height == 0 {
        return Err(format!("bad dimensions {width}x{raw_height}"));
    }
    // 3 = BI_BITFIELDS, accepted for 32-bit BGRA exports
    if !(compression == 0 || (compression == 3 && bpp == 32)) {
        return Err(format!("unsupported compression {compression}"));
    }
    let bytes_per_pixel = match bpp {
        24 => 3,
        32 => 4,
        other => return Err(format!("unsupported bit depth {other}")),
    };

    let top_down = raw_height < 0;
    let width = width as u32;
    let height = raw_height.unsigned_abs();
    let stride = (bpp as usize * width as usize).div_ceil(32) * 4;
    let needed = data_offset + stride * height as usize;
    if bytes.len() < needed {
        return Err(format!("pixel data truncated ({} < {needed} bytes)", bytes.len()));
    }

    let mut pixels = Vec::with_capacity((width * height) as usize);
    for y in 0..height as usize {
        let src_row = if top_down { y } else { height as usize - 1 - y };
        let row = &bytes[data_offset + src_row * stride..];
        for x in 0..width as usize {
            let px = &row[x * bytes_per_pixel..];
            let (b, g, r) = (px[0] as u32, px[1] as u32, px[2] as u32);
            let a = if bytes_per_pixel == 4 { px[3] as u32 } else { 0xff };
            pixels.push(a << 24 | r << 16 | g << 8 | b);
        }
    }
    Ok(Image {
        width,
        height,
        pixels,
    })
}

/// Encode pixels as a bottom-up 24-bit BMP
pub fn encode_bmp(width: u32, height: u32, pixels: &[u32]) -> Vec<u8> {
    let stride = (24 * width as usize).div_ceil(32) * 4;
    let data_size = stride * height as usize;
    let mut out = Vec::with_capacity(54 + data_size);
    out.extend_from_slice(b"BM");
    out.extend_from_slice(&(54 + data_size as u32).to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&54u32.to_le_bytes());
    out.extend_from_slice(&40u32.to_le_bytes());
    out.extend_from_slice(&(width as i32).to_le_bytes());
    out.extend_from_slice(&(height as i32).to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&24u16.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&(data_size as u32).to_le_bytes());
    out.extend_from_slice(&[0u8; 16]);
    for y in (0..height as usize).rev() {
        let start = out.len();
        for x in 0..width as usize {
            let p = pixels.get(y * width as usize + x).copied().unwrap_or(0);
            out.extend_from_slice(&[p as u8, (p >> 8) as u8, (p >> 16) as u8]);
        }
        out.resize(start + stride, 0);
    }
    out
}
