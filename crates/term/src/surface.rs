use life_common::render::{Rect, Surface};

const UNDRAWN: char = ' ';
const GRID: char = '.';
const ALIVE: char = '#';

/// A [`Surface`] that keeps one glyph per cell, for printing to a terminal.
///
/// Rectangles are mapped back to the cell containing their top left corner,
/// so it only makes sense for drawing done through a `Painter` with the same
/// `cell_size`.
#[derive(Debug)]
pub struct TextSurface {
    width: u32,
    height: u32,
    cell_size: u32,
    rows: usize,
    cols: usize,
    glyphs: Vec<char>,
    dirty: bool,
}

impl TextSurface {
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        let cell_size = cell_size.max(1);
        let rows = (height / cell_size) as usize;
        let cols = (width / cell_size) as usize;
        Self {
            width,
            height,
            cell_size,
            rows,
            cols,
            glyphs: vec![UNDRAWN; rows * cols],
            dirty: false,
        }
    }

    fn index(&self, rect: Rect) -> Option<usize> {
        if rect.x < 0.0 || rect.y < 0.0 {
            return None;
        }
        let size = f64::from(self.cell_size);
        let row = (rect.y / size) as usize;
        let col = (rect.x / size) as usize;
        if row < self.rows && col < self.cols {
            Some(row * self.cols + col)
        } else {
            None
        }
    }

    fn put(&mut self, rect: Rect, glyph: char) {
        if let Some(index) = self.index(rect) {
            if self.glyphs[index] != glyph {
                self.glyphs[index] = glyph;
                self.dirty = true;
            }
        }
    }

    /// True if anything changed since the last `take_frame`.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn frame(&self) -> String {
        let mut frame = String::with_capacity(self.rows * (self.cols + 1));
        for row in self.glyphs.chunks(self.cols.max(1)) {
            frame.extend(row.iter());
            frame.push('\n');
        }
        frame
    }

    pub fn take_frame(&mut self) -> String {
        self.dirty = false;
        self.frame()
    }
}

impl Surface for TextSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_fill_color(&mut self, _color: &str) {}

    fn set_stroke_color(&mut self, _color: &str) {}

    fn fill_rect(&mut self, rect: Rect) {
        self.put(rect, ALIVE);
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.put(rect, GRID);
    }

    fn stroke_rect(&mut self, rect: Rect) {
        if let Some(index) = self.index(rect) {
            if self.glyphs[index] == UNDRAWN {
                self.glyphs[index] = GRID;
                self.dirty = true;
            }
        }
    }
}

/// Status line printed under each frame.
pub fn status(generation: u32, population: usize, state: &str) -> String {
    format!(
        "generation {} | population {} | {}",
        generation, population, state
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_common::{Grid, Painter};

    fn painter() -> Painter {
        Painter::new(4, 1, "white", "black")
    }

    #[test]
    fn grid_lines_then_cells() {
        let mut surface = TextSurface::new(12, 8, 4);
        assert_eq!(surface.frame(), "   \n   \n");

        painter().draw_grid_lines(&mut surface, 2, 3);
        assert_eq!(surface.take_frame(), "...\n...\n");
        assert!(!surface.is_dirty());

        let grid = Grid::from_rows(&["#..", "..#"]).unwrap();
        painter().render_full(&mut surface, &grid);
        assert!(surface.is_dirty());
        assert_eq!(surface.take_frame(), "#..\n..#\n");
    }

    #[test]
    fn unchanged_paint_is_not_dirty() {
        let mut surface = TextSurface::new(8, 8, 4);
        let grid = Grid::from_rows(&["#.", ".."]).unwrap();
        painter().render_full(&mut surface, &grid);
        surface.take_frame();
        painter().render_full(&mut surface, &grid);
        assert!(!surface.is_dirty());
    }

    #[test]
    fn out_of_bounds_rects_are_ignored() {
        let mut surface = TextSurface::new(8, 8, 4);
        surface.fill_rect(Rect::new(9.0, 1.0, 2.0, 2.0));
        surface.fill_rect(Rect::new(-1.0, 1.0, 2.0, 2.0));
        assert!(!surface.is_dirty());
    }

    #[test]
    fn status_line() {
        assert_eq!(
            status(3, 17, "running"),
            "generation 3 | population 17 | running"
        );
    }
}
