// src/geometry.rs - Positions, bounding boxes and colours in view space
use serde::{Deserialize, Serialize};

/// A point in the simulated view, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x as f32, y as f32)
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Point,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(pos: Point, width: f32, height: f32) -> Self {
        Self { pos, width, height }
    }

    /// Hit test with inclusive edges on all four sides
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.pos.x
            && p.x <= self.pos.x + self.width
            && p.y >= self.pos.y
            && p.y <= self.pos.y + self.height
    }
}

/// Packed colour, `0xRRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgba(pub u32);

impl Rgba {
    pub const BLACK: Rgba = Rgba(0x0000_00ff);
    pub const WHITE: Rgba = Rgba(0xffff_ffff);

    pub const fn from_components(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba((r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32)
    }

    pub const fn components(self) -> (u8, u8, u8, u8) {
        let c = self.0;
        ((c >> 24) as u8, (c >> 16) as u8, (c >> 8) as u8, c as u8)
    }

    /// Per-channel linear interpolation, `t` in [0, 1]
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let (r1, g1, b1, a1) = self.components();
        let (r2, g2, b2, a2) = other.components();
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba::from_components(mix(r1, r2), mix(g1, g2), mix(b1, b2), mix(a1, a2))
    }

    /// `0x00RRGGBB`, the layout framebuffer back-ends expect
    pub const fn to_rgb(self) -> u32 {
        self.0 >> 8
    }
}
