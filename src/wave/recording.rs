//! Canvas that records draw calls, for tests

use super::geometry::Point;
use super::render::{Canvas, Surface};
use crossterm::style::Color;

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    StrokeColor(Color),
    LineWidth(f64),
    BeginPath,
    MoveTo(f64, f64),
    LineTo(f64, f64),
    Arc { x: f64, y: f64, radius: f64 },
    Stroke,
}

pub struct RecordingCanvas {
    pub surface: Surface,
    pub commands: Vec<DrawCommand>,
    pub resizes: usize,
}

impl RecordingCanvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            surface: Surface::new(width as f64, height as f64, 1.0),
            commands: Vec::new(),
            resizes: 0,
        }
    }

    pub fn strokes(&self) -> usize {
        self.commands.iter().filter(|c| **c == DrawCommand::Stroke).count()
    }

    /// Points of the most recently started path
    pub fn last_path(&self) -> Vec<Point> {
        let start = self
            .commands
            .iter()
            .rposition(|c| *c == DrawCommand::BeginPath)
            .map_or(0, |i| i + 1);
        self.commands[start..]
            .iter()
            .filter_map(|c| match *c {
                DrawCommand::MoveTo(x, y) | DrawCommand::LineTo(x, y) => Some(Point::new(x, y)),
                _ => None,
            })
            .collect()
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (f64, f64) {
        let (w, h) = self.backing_size();
        (w as f64 / self.surface.scale, h as f64 / self.surface.scale)
    }

    fn backing_size(&self) -> (usize, usize) {
        self.surface.backing_size()
    }

    fn scale(&self) -> f64 {
        self.surface.scale
    }

    fn resize(&mut self, surface: Surface) {
        self.surface = surface;
        self.resizes += 1;
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.commands.push(DrawCommand::StrokeColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.commands.push(DrawCommand::LineWidth(width));
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo(x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo(x, y));
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, _start_angle: f64, _end_angle: f64) {
        self.commands.push(DrawCommand::Arc { x, y, radius });
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }
}
