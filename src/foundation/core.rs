use crate::foundation::error::{MalathError, MalathResult};

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure white, used for the canvas background and unknown color names.
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Pure black, used for cell borders and zone labels.
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Immutable rows x cols grid of zone ids for one template.
///
/// Always non-empty and rectangular; construction validates both.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZoneMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<u32>, // row-major
}

impl ZoneMatrix {
    /// Build a validated matrix from nested rows.
    pub fn from_rows(rows: Vec<Vec<u32>>) -> MalathResult<Self> {
        let Some(first) = rows.first() else {
            return Err(MalathError::validation("zone matrix must have at least one row"));
        };
        let cols = first.len();
        if cols == 0 {
            return Err(MalathError::validation(
                "zone matrix must have at least one column",
            ));
        }
        if let Some(i) = rows.iter().position(|r| r.len() != cols) {
            return Err(MalathError::validation(format!(
                "zone matrix is not rectangular: row {i} has {} cells, expected {cols}",
                rows[i].len()
            )));
        }

        let n_rows = rows.len();
        Ok(Self {
            rows: n_rows,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Zone id at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col).copied()
    }

    /// All zone ids in row-major order.
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Distinct zone ids, ascending.
    pub fn distinct_ids(&self) -> Vec<u32> {
        let mut ids = self.cells.clone();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Largest zone id present.
    pub fn max_id(&self) -> u32 {
        self.cells.iter().copied().max().unwrap_or(0)
    }

    /// `true` when `zone` appears at least once.
    pub fn contains(&self, zone: u32) -> bool {
        self.cells.contains(&zone)
    }
}

/// Value held by one cell of a [`ColoredMatrix`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Still unpainted: carries the original zone id.
    Zone(u32),
    /// Painted with the named color of the template vocabulary.
    Painted(String),
}

impl Cell {
    /// Zone id when the cell is unpainted.
    pub fn zone(&self) -> Option<u32> {
        match self {
            Self::Zone(z) => Some(*z),
            Self::Painted(_) => None,
        }
    }

    /// Color name when the cell is painted.
    pub fn color(&self) -> Option<&str> {
        match self {
            Self::Zone(_) => None,
            Self::Painted(name) => Some(name),
        }
    }
}

/// Mutable per-session grid, same shape as its [`ZoneMatrix`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColoredMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>, // row-major
}

impl ColoredMatrix {
    /// Fresh, fully unpainted copy of `zones`.
    pub fn unpainted(zones: &ZoneMatrix) -> Self {
        Self {
            rows: zones.rows(),
            cols: zones.cols(),
            cells: zones.cells().iter().copied().map(Cell::Zone).collect(),
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate `(row, col, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (i / cols, i % cols, c))
    }

    /// Number of painted cells.
    pub fn painted_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, Cell::Painted(_)))
            .count()
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
