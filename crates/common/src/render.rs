use std::fmt;

use crate::world::{self, Cell, Grid};

/// A 2D drawing target measured in pixels.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_fill_color(&mut self, color: &str);
    fn set_stroke_color(&mut self, color: &str);
    fn fill_rect(&mut self, rect: Rect);
    fn clear_rect(&mut self, rect: Rect);
    fn stroke_rect(&mut self, rect: Rect);
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Maps grid cells onto a [`Surface`].
///
/// Each cell owns a `cell_size` square starting at `(col * cell_size, row *
/// cell_size)`. Live cells are painted `inset` pixels inside that square so
/// the grid lines between cells stay visible.
#[derive(Debug, Clone)]
pub struct Painter {
    cell_size: u32,
    inset: u32,
    alive_color: String,
    grid_color: String,
}

impl Painter {
    pub fn new(cell_size: u32, inset: u32, alive_color: &str, grid_color: &str) -> Self {
        Self {
            cell_size,
            inset,
            alive_color: alive_color.to_string(),
            grid_color: grid_color.to_string(),
        }
    }

    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }

    /// The inset square painted for `(row, col)`.
    pub fn cell_rect(&self, row: usize, col: usize) -> Rect {
        let (x, y) = self.cell_origin(row, col);
        let inset = f64::from(self.inset);
        let side = f64::from(self.cell_size) - 2.0 * inset;
        Rect::new(x + inset, y + inset, side, side)
    }

    fn cell_origin(&self, row: usize, col: usize) -> (f64, f64) {
        let size = f64::from(self.cell_size);
        (col as f64 * size, row as f64 * size)
    }

    pub fn draw_cell<S: Surface + ?Sized>(&self, surface: &mut S, row: usize, col: usize) {
        surface.set_fill_color(&self.alive_color);
        surface.fill_rect(self.cell_rect(row, col));
    }

    pub fn clear_cell<S: Surface + ?Sized>(&self, surface: &mut S, row: usize, col: usize) {
        surface.clear_rect(self.cell_rect(row, col));
    }

    pub fn paint_cell<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        row: usize,
        col: usize,
        cell: Cell,
    ) {
        match cell {
            Cell::Alive => self.draw_cell(surface, row, col),
            Cell::Dead => self.clear_cell(surface, row, col),
        }
    }

    /// Outlines every cell, normally once before the first generation.
    pub fn draw_grid_lines<S: Surface + ?Sized>(&self, surface: &mut S, rows: usize, cols: usize) {
        surface.set_stroke_color(&self.grid_color);
        let size = f64::from(self.cell_size);
        for row in 0..rows {
            for col in 0..cols {
                let (x, y) = self.cell_origin(row, col);
                surface.stroke_rect(Rect::new(x, y, size, size));
            }
        }
    }

    /// Repaints every cell of `grid`.
    pub fn render_full<S: Surface + ?Sized>(&self, surface: &mut S, grid: &Grid) {
        for ((row, col), cell) in grid.iter() {
            self.paint_cell(surface, row, col, cell);
        }
    }

    /// Repaints only the cells that differ between `previous` and `next`.
    pub fn render_changes<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        previous: &Grid,
        next: &Grid,
    ) {
        for ((row, col), cell) in world::changes(previous, next) {
            self.paint_cell(surface, row, col, cell);
        }
    }
}

/// How a surface is divided into cells.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Layout {
    pub surface_width: u32,
    pub surface_height: u32,
    pub cell_size: u32,
    pub rows: usize,
    pub cols: usize,
}

impl Layout {
    pub fn new(surface_width: u32, surface_height: u32, cell_size: u32) -> Self {
        let (rows, cols) = match cell_size {
            0 => (0, 0),
            _ => (
                (surface_height / cell_size) as usize,
                (surface_width / cell_size) as usize,
            ),
        };
        Self {
            surface_width,
            surface_height,
            cell_size,
            rows,
            cols,
        }
    }

    pub fn of<S: Surface + ?Sized>(surface: &S, cell_size: u32) -> Self {
        Self::new(surface.width(), surface.height(), cell_size)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Canvas size: ({}x{})",
            self.surface_width, self.surface_height
        )?;
        writeln!(f, "Matrix single cell size: {}px", self.cell_size)?;
        write!(f, "Matrix size: ({}x{}) cells", self.cols, self.rows)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Rect, Surface};

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        FillColor(String),
        StrokeColor(String),
        Fill(Rect),
        Clear(Rect),
        Stroke(Rect),
    }

    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub width: u32,
        pub height: u32,
        pub calls: Vec<Call>,
    }

    impl RecordingSurface {
        pub fn new(width: u32, height: u32) -> Self {
            Self {
                width,
                height,
                calls: Vec::new(),
            }
        }

        pub fn fills(&self) -> Vec<Rect> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Fill(rect) => Some(*rect),
                    _ => None,
                })
                .collect()
        }

        pub fn clears(&self) -> Vec<Rect> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Clear(rect) => Some(*rect),
                    _ => None,
                })
                .collect()
        }

        pub fn strokes(&self) -> Vec<Rect> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Stroke(rect) => Some(*rect),
                    _ => None,
                })
                .collect()
        }
    }

    impl Surface for RecordingSurface {
        fn width(&self) -> u32 {
            self.width
        }

        fn height(&self) -> u32 {
            self.height
        }

        fn set_fill_color(&mut self, color: &str) {
            self.calls.push(Call::FillColor(color.to_string()));
        }

        fn set_stroke_color(&mut self, color: &str) {
            self.calls.push(Call::StrokeColor(color.to_string()));
        }

        fn fill_rect(&mut self, rect: Rect) {
            self.calls.push(Call::Fill(rect));
        }

        fn clear_rect(&mut self, rect: Rect) {
            self.calls.push(Call::Clear(rect));
        }

        fn stroke_rect(&mut self, rect: Rect) {
            self.calls.push(Call::Stroke(rect));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::{Call, RecordingSurface};
    use super::*;

    fn painter() -> Painter {
        Painter::new(20, 1, "white", "rgb(0, 0, 0)")
    }

    #[test]
    fn cell_rect_is_inset() {
        let painter = painter();
        assert_eq!(painter.cell_rect(0, 0), Rect::new(1.0, 1.0, 18.0, 18.0));
        assert_eq!(painter.cell_rect(2, 3), Rect::new(61.0, 41.0, 18.0, 18.0));
    }

    #[test]
    fn draw_cell_sets_color_then_fills() {
        let mut surface = RecordingSurface::new(100, 100);
        painter().draw_cell(&mut surface, 1, 1);
        assert_eq!(
            surface.calls,
            vec![
                Call::FillColor("white".to_string()),
                Call::Fill(Rect::new(21.0, 21.0, 18.0, 18.0)),
            ]
        );
    }

    #[test]
    fn clear_cell_clears_inset_square() {
        let mut surface = RecordingSurface::new(100, 100);
        painter().clear_cell(&mut surface, 0, 4);
        assert_eq!(surface.calls, vec![Call::Clear(Rect::new(81.0, 1.0, 18.0, 18.0))]);
    }

    #[test]
    fn grid_lines_outline_every_cell() {
        let mut surface = RecordingSurface::new(60, 40);
        painter().draw_grid_lines(&mut surface, 2, 3);
        assert_eq!(surface.calls[0], Call::StrokeColor("rgb(0, 0, 0)".to_string()));
        let strokes = surface.strokes();
        assert_eq!(strokes.len(), 6);
        assert_eq!(strokes[0], Rect::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(strokes[5], Rect::new(40.0, 20.0, 20.0, 20.0));
    }

    #[test]
    fn render_full_touches_every_cell() {
        let grid = Grid::from_rows(&["#.", ".#", ".."]).unwrap();
        let mut surface = RecordingSurface::new(40, 60);
        painter().render_full(&mut surface, &grid);
        assert_eq!(
            surface.fills(),
            vec![painter().cell_rect(0, 0), painter().cell_rect(1, 1)]
        );
        assert_eq!(surface.clears().len(), 4);
    }

    #[test]
    fn render_changes_touches_flipped_cells_only() {
        let before = Grid::from_rows(&[".....", ".....", ".###.", ".....", "....."]).unwrap();
        let after = before.advance();
        let mut surface = RecordingSurface::new(100, 100);
        painter().render_changes(&mut surface, &before, &after);
        assert_eq!(surface.fills().len(), 2);
        assert_eq!(surface.clears().len(), 2);
        assert!(surface.fills().contains(&painter().cell_rect(1, 2)));
        assert!(surface.clears().contains(&painter().cell_rect(2, 1)));
    }

    #[test]
    fn layout_divides_surface() {
        let layout = Layout::of(&RecordingSurface::new(810, 405), 20);
        assert_eq!((layout.rows, layout.cols), (20, 40));
        assert_eq!(
            layout.to_string(),
            "Canvas size: (810x405)\nMatrix single cell size: 20px\nMatrix size: (40x20) cells"
        );
        assert_eq!(Layout::new(10, 10, 0).rows, 0);
    }
}
