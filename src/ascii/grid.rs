//! Filled/empty character grid.

/// Row-major grid of filled cells, one per character position.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterGrid {
    cols: u32,
    rows: u32,
    cells: Vec<bool>,
}

impl CharacterGrid {
    /// An all-empty grid.
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            cells: vec![false; cols as usize * rows as usize],
        }
    }

    /// Build a grid from text rows, `#` marking a filled cell.
    ///
    /// Rows shorter than the longest row are padded with empty cells.
    pub fn from_rows(rows: &[&str]) -> Self {
        let cols = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as u32;
        let mut grid = Self::new(cols, rows.len() as u32);
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                grid.set(x as u32, y as u32, c == '#');
            }
        }
        grid
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the cell at (x, y) is filled. Out-of-range cells are empty.
    pub fn is_filled(&self, x: u32, y: u32) -> bool {
        if x >= self.cols || y >= self.rows {
            return false;
        }
        self.cells[(y * self.cols + x) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, filled: bool) {
        if x < self.cols && y < self.rows {
            self.cells[(y * self.cols + x) as usize] = filled;
        }
    }

    /// Iterate over rows as slices of cells.
    pub fn row_cells(&self) -> impl Iterator<Item = &[bool]> {
        // chunks_exact panics on a zero chunk size
        self.cells.chunks_exact(self.cols.max(1) as usize)
    }

    /// Number of filled cells.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
