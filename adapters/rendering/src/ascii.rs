//! Character-cell canvas used by headless hosts and tests.

use anyhow::Result as AnyResult;
use glam::Vec2;

use crate::{Canvas, Color, RenderingError};

const EMPTY: char = ' ';

/// Canvas that rasterises primitives onto a grid of characters.
///
/// Each cell covers a square of `cell_size` screen units. Glyphs depend on
/// the primitive: large circles become `@`, small ones `o`, rectangles `#`,
/// outlines `+` and lines `.`. Fully transparent primitives are skipped.
#[derive(Clone, Debug, PartialEq)]
pub struct AsciiCanvas {
    columns: usize,
    rows: usize,
    cell_size: f32,
    cells: Vec<char>,
}

impl AsciiCanvas {
    /// Creates a blank canvas of `columns` × `rows` cells.
    pub fn new(columns: usize, rows: usize, cell_size: f32) -> Result<Self, RenderingError> {
        if columns == 0 || rows == 0 {
            return Err(RenderingError::InvalidCanvasSize { columns, rows });
        }
        Ok(Self {
            columns,
            rows,
            cell_size: if cell_size > 0.0 { cell_size } else { 1.0 },
            cells: vec![EMPTY; columns * rows],
        })
    }

    /// Glyph stored in the given cell.
    #[must_use]
    pub fn glyph(&self, column: usize, row: usize) -> Option<char> {
        (column < self.columns && row < self.rows).then(|| self.cells[row * self.columns + column])
    }

    /// Renders the grid as newline-separated rows without trailing spaces.
    #[must_use]
    pub fn render(&self) -> String {
        self.cells
            .chunks(self.columns)
            .map(|row| row.iter().collect::<String>().trim_end().to_owned())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn cell_center(&self, column: usize, row: usize) -> Vec2 {
        Vec2::new(
            (column as f32 + 0.5) * self.cell_size,
            (row as f32 + 0.5) * self.cell_size,
        )
    }

    fn plot(&mut self, point: Vec2, glyph: char) {
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return;
        }
        let column = (point.x / self.cell_size) as usize;
        let row = (point.y / self.cell_size) as usize;
        if column < self.columns && row < self.rows {
            self.cells[row * self.columns + column] = glyph;
        }
    }

    fn fill_where(&mut self, glyph: char, inside: impl Fn(Vec2) -> bool) {
        for row in 0..self.rows {
            for column in 0..self.columns {
                if inside(self.cell_center(column, row)) {
                    self.cells[row * self.columns + column] = glyph;
                }
            }
        }
    }
}

impl Canvas for AsciiCanvas {
    fn clear(&mut self, _color: Color) -> AnyResult<()> {
        self.cells.fill(EMPTY);
        Ok(())
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) -> AnyResult<()> {
        if color.alpha <= 0.0 {
            return Ok(());
        }
        let glyph = if radius >= self.cell_size { '@' } else { 'o' };
        let limit = radius.max(self.cell_size / 2.0);
        self.fill_where(glyph, |point| point.distance(center) <= limit);
        self.plot(center, glyph);
        Ok(())
    }

    fn stroke_circle(
        &mut self,
        center: Vec2,
        radius: f32,
        _width: f32,
        color: Color,
    ) -> AnyResult<()> {
        if color.alpha <= 0.0 {
            return Ok(());
        }
        let band = self.cell_size / 2.0;
        self.fill_where('+', |point| (point.distance(center) - radius).abs() <= band);
        Ok(())
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Color) -> AnyResult<()> {
        if color.alpha <= 0.0 || size.x <= 0.0 || size.y <= 0.0 {
            return Ok(());
        }
        let end = origin + size;
        self.fill_where('#', |point| {
            point.x >= origin.x && point.x <= end.x && point.y >= origin.y && point.y <= end.y
        });
        self.plot(origin + size / 2.0, '#');
        Ok(())
    }

    fn line(&mut self, from: Vec2, to: Vec2, _width: f32, color: Color) -> AnyResult<()> {
        if color.alpha <= 0.0 {
            return Ok(());
        }
        let steps = ((to - from).length() / (self.cell_size / 2.0)).ceil().max(1.0);
        if !steps.is_finite() {
            return Ok(());
        }
        let steps = steps as usize;
        for step in 0..=steps {
            self.plot(from.lerp(to, step as f32 / steps as f32), '.');
        }
        Ok(())
    }
}
