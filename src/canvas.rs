//! Braille-dot canvas: each terminal cell holds a 2x4 grid of dots

use crate::config::clamp_scale;
use crate::terminal::Terminal;
use crate::wave::render::{Canvas, Surface};
use crossterm::style::Color;
use std::f64::consts::TAU;

const BRAILLE_BASE: u32 = 0x2800;
pub const DOTS_X: usize = 2;
pub const DOTS_Y: usize = 4;

/// Keeps Bresenham bounded when a path runs far off-canvas
const MAX_COORD: f64 = 1.0e6;
const MAX_ARC_SEGMENTS: usize = 512;
/// Widest brush in dots, whatever the line width and scale
pub const MAX_BRUSH_RADIUS: f64 = 12.0;

/// Dot bit for (column, row) inside a braille cell
const DOT_BITS: [[u8; DOTS_X]; DOTS_Y] = [
    [0x01, 0x08],
    [0x02, 0x10],
    [0x04, 0x20],
    [0x40, 0x80],
];

#[derive(Clone, Copy)]
struct Dot {
    serial: u32, // Stroke that last touched this dot
    color: Color,
}

struct Brush {
    offsets: Vec<(i32, i32)>,
    reach: i32,
}

pub struct BrailleCanvas {
    surface: Surface,
    dot_w: usize,
    dot_h: usize,
    dots: Vec<Option<Dot>>,
    stroke_color: Color,
    line_width: f64,
    subpaths: Vec<Vec<(f64, f64)>>,
    serial: u32,
}

impl Default for BrailleCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl BrailleCanvas {
    pub fn new() -> Self {
        Self {
            surface: Surface::new(0.0, 0.0, 1.0),
            dot_w: 0,
            dot_h: 0,
            dots: Vec::new(),
            stroke_color: Color::White,
            line_width: 1.0,
            subpaths: Vec::new(),
            serial: 0,
        }
    }

    /// Surface covering `cols` x `rows` terminal cells at the given dots-per-unit scale
    pub fn surface_for_cells(cols: u16, rows: u16, scale: f64) -> Surface {
        let scale = clamp_scale(scale);
        Surface::new(
            (cols as usize * DOTS_X) as f64 / scale,
            (rows as usize * DOTS_Y) as f64 / scale,
            scale,
        )
    }

    #[cfg(test)]
    pub fn is_lit(&self, x: usize, y: usize) -> bool {
        x < self.dot_w && y < self.dot_h && self.dots[y * self.dot_w + x].is_some()
    }

    #[cfg(test)]
    pub fn lit_dots(&self) -> usize {
        self.dots.iter().filter(|d| d.is_some()).count()
    }

    /// Encode the dot grid into braille cells starting at terminal row `top`
    pub fn blit(&self, term: &mut Terminal, top: u16) {
        let cols = self.dot_w / DOTS_X;
        let rows = self.dot_h / DOTS_Y;

        for cy in 0..rows {
            for cx in 0..cols {
                let mut bits: u8 = 0;
                let mut newest: Option<Dot> = None;

                for (dy, row_bits) in DOT_BITS.iter().enumerate() {
                    for (dx, bit) in row_bits.iter().enumerate() {
                        let idx = (cy * DOTS_Y + dy) * self.dot_w + cx * DOTS_X + dx;
                        if let Some(dot) = self.dots[idx] {
                            bits |= bit;
                            if newest.map_or(true, |n| dot.serial >= n.serial) {
                                newest = Some(dot);
                            }
                        }
                    }
                }

                if let Some(dot) = newest {
                    let ch = char::from_u32(BRAILLE_BASE + bits as u32).unwrap_or(' ');
                    term.set(cx as i32, cy as i32 + top as i32, ch, Some(dot.color));
                }
            }
        }
    }

    fn to_dots(&self, x: f64, y: f64) -> (i32, i32) {
        let scale = self.surface.scale;
        (
            (x * scale).floor().clamp(-MAX_COORD, MAX_COORD) as i32,
            (y * scale).floor().clamp(-MAX_COORD, MAX_COORD) as i32,
        )
    }

    /// Disc of the current line width, capped so a huge width or scale
    /// cannot blow up the per-dot cost
    fn brush(&self) -> Brush {
        let radius = (self.line_width * self.surface.scale / 2.0).clamp(0.5, MAX_BRUSH_RADIUS);
        let reach = radius.ceil() as i32;
        let mut offsets = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if ((dx * dx + dy * dy) as f64) <= radius * radius {
                    offsets.push((dx, dy));
                }
            }
        }
        Brush { offsets, reach }
    }

    fn stamp(&mut self, x: i32, y: i32, brush: &Brush, dot: Dot) {
        let (w, h) = (self.dot_w as i32, self.dot_h as i32);
        if x + brush.reach < 0 || y + brush.reach < 0 || x - brush.reach >= w || y - brush.reach >= h {
            return;
        }
        for &(dx, dy) in &brush.offsets {
            let px = x + dx;
            let py = y + dy;
            if px >= 0 && px < w && py >= 0 && py < h {
                self.dots[py as usize * self.dot_w + px as usize] = Some(dot);
            }
        }
    }

    fn draw_line(&mut self, (x0, y0): (i32, i32), (x1, y1): (i32, i32), brush: &Brush, dot: Dot) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.stamp(x, y, brush, dot);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 >= dy {
                if x == x1 {
                    break;
                }
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                if y == y1 {
                    break;
                }
                err += dx;
                y += sy;
            }
        }
    }
}

impl Canvas for BrailleCanvas {
    fn size(&self) -> (f64, f64) {
        (
            self.dot_w as f64 / self.surface.scale,
            self.dot_h as f64 / self.surface.scale,
        )
    }

    fn backing_size(&self) -> (usize, usize) {
        (self.dot_w, self.dot_h)
    }

    fn scale(&self) -> f64 {
        self.surface.scale
    }

    fn resize(&mut self, surface: Surface) {
        let (w, h) = surface.backing_size();
        self.surface = surface;
        self.dot_w = w;
        self.dot_h = h;
        self.dots = vec![None; w * h];
        self.subpaths.clear();
    }

    fn clear(&mut self) {
        self.dots.fill(None);
        self.subpaths.clear();
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn set_line_width(&mut self, width: f64) {
        if width > 0.0 && width.is_finite() {
            self.line_width = width;
        }
    }

    fn begin_path(&mut self) {
        self.subpaths.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.subpaths.push(vec![(x, y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        match self.subpaths.last_mut() {
            Some(path) => path.push((x, y)),
            None => self.move_to(x, y),
        }
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        let sweep = end_angle - start_angle;
        if !(radius >= 0.0 && sweep.is_finite()) {
            return;
        }
        let length = sweep.abs().min(TAU) * radius * self.surface.scale;
        let segments = (length.ceil() as usize).clamp(8, MAX_ARC_SEGMENTS);
        for i in 0..=segments {
            let angle = start_angle + sweep * i as f64 / segments as f64;
            self.line_to(x + radius * angle.cos(), y + radius * angle.sin());
        }
    }

    fn stroke(&mut self) {
        self.serial = self.serial.wrapping_add(1);
        let dot = Dot {
            serial: self.serial,
            color: self.stroke_color,
        };
        let brush = self.brush();
        let subpaths = std::mem::take(&mut self.subpaths);

        for path in &subpaths {
            let points: Vec<(i32, i32)> = path.iter().map(|&(x, y)| self.to_dots(x, y)).collect();
            let Some((&first, rest)) = points.split_first() else {
                continue;
            };
            self.stamp(first.0, first.1, &brush, dot);
            let mut prev = first;
            for &next in rest {
                self.draw_line(prev, next, &brush, dot);
                prev = next;
            }
        }

        self.subpaths = subpaths;
    }
}
