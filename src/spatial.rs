//! Uniform spatial grid for neighbor queries.
//!
//! The simulation area is split into `columns x rows` cells. Every frame the
//! grid is rebuilt from node positions, then each node asks for the positions
//! stored in the square of cells around it. Buckets keep their allocations
//! between frames; [`SpatialGrid::rebuild`] only resets their length.
//!
//! Positions outside the area are clamped into the nearest edge cell. Nodes
//! that escape far past an edge therefore still land in (and repel from) that
//! edge cell.

use glam::Vec2;

/// Configuration for the spatial grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialConfig {
    /// Width of the area covered by the grid.
    pub width: f32,
    /// Height of the area covered by the grid.
    pub height: f32,
    /// Number of cell columns.
    pub columns: usize,
    /// Number of cell rows.
    pub rows: usize,
    /// How many cells to scan in each direction around the query cell.
    pub neighbor_radius: usize,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 480.0,
            columns: 32,
            rows: 18,
            neighbor_radius: 2,
        }
    }
}

impl SpatialConfig {
    pub fn new(width: f32, height: f32, columns: usize, rows: usize, neighbor_radius: usize) -> Self {
        Self {
            width,
            height,
            columns,
            rows,
            neighbor_radius,
        }
    }

    /// Size of one cell in world units.
    pub fn cell_size(&self) -> Vec2 {
        Vec2::new(
            self.width / self.columns as f32,
            self.height / self.rows as f32,
        )
    }

    /// Total number of cells in the grid.
    pub fn total_cells(&self) -> usize {
        self.columns * self.rows
    }

    /// Upper bound on cells visited by one neighbor query.
    pub fn cells_per_query(&self) -> usize {
        let side = self.neighbor_radius.saturating_mul(2).saturating_add(1);
        side.min(self.columns).saturating_mul(side.min(self.rows))
    }
}

/// Grid of position buckets, rebuilt every frame.
#[derive(Clone, Debug)]
pub struct SpatialGrid {
    config: SpatialConfig,
    cell_size: Vec2,
    // Row-major: index = row * columns + column
    cells: Vec<Vec<Vec2>>,
}

impl SpatialGrid {
    /// Create an empty grid. Zero columns or rows are treated as one.
    pub fn new(config: SpatialConfig) -> Self {
        let config = SpatialConfig {
            columns: config.columns.max(1),
            rows: config.rows.max(1),
            ..config
        };
        Self {
            config,
            cell_size: config.cell_size(),
            cells: vec![Vec::new(); config.total_cells()],
        }
    }

    pub fn config(&self) -> &SpatialConfig {
        &self.config
    }

    /// Cell containing `position`, clamped into the grid.
    pub fn cell_of(&self, position: Vec2) -> (usize, usize) {
        let cell = position / self.cell_size;
        let column = clamp_index(cell.x, self.config.columns);
        let row = clamp_index(cell.y, self.config.rows);
        (column, row)
    }

    /// Empty every bucket and re-insert `positions`.
    pub fn rebuild<I>(&mut self, positions: I)
    where
        I: IntoIterator<Item = Vec2>,
    {
        for bucket in &mut self.cells {
            bucket.clear();
        }
        for position in positions {
            let (column, row) = self.cell_of(position);
            let index = row * self.config.columns + column;
            self.cells[index].push(position);
        }
    }

    /// Positions stored in one cell. Out-of-range cells are empty.
    pub fn bucket(&self, column: usize, row: usize) -> &[Vec2] {
        if column >= self.config.columns || row >= self.config.rows {
            return &[];
        }
        &self.cells[row * self.config.columns + column]
    }

    /// Every position stored within `neighbor_radius` cells of the cell
    /// containing `position`, including positions equal to it.
    ///
    /// Cells past the grid edge are skipped, not wrapped. Order is
    /// unspecified.
    pub fn neighbors(&self, position: Vec2) -> impl Iterator<Item = Vec2> + '_ {
        let (column, row) = self.cell_of(position);
        let radius = self.config.neighbor_radius;
        let columns = self.config.columns;

        let min_col = column.saturating_sub(radius);
        let max_col = column.saturating_add(radius).min(columns - 1);
        let min_row = row.saturating_sub(radius);
        let max_row = row.saturating_add(radius).min(self.config.rows - 1);

        (min_row..=max_row)
            .flat_map(move |r| (min_col..=max_col).map(move |c| r * columns + c))
            .flat_map(move |index| self.cells[index].iter().copied())
    }

    /// Number of positions currently stored.
    pub fn len(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Vec::is_empty)
    }
}

fn clamp_index(cell: f32, count: usize) -> usize {
    // `as` saturates on infinities and maps NaN to 0
    let index = cell.floor() as i64;
    index.clamp(0, count as i64 - 1) as usize
}
