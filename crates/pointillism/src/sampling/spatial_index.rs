//! Uniform grid bucketing accepted points for bounded neighbor scans.
//!
//! The cell size is `max_radius / √2`. Every exclusion threshold is at most `max_radius`, so a
//! point violating a candidate's exclusion lies within two cells on each axis and never in a
//! `(±2, ±2)` corner cell. [`SCAN_PATTERN`] visits exactly the remaining 21 cells.
use glam::IVec2;

/// Half-width in columns of each scanned row, for row offsets `-2..=2`.
pub const SCAN_PATTERN: [i32; 5] = [1, 2, 2, 2, 1];

/// Grid of point indices. Holds no point data, only indices into the sampler's point list.
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    cell_size: f32,
    grid_width: usize,
    grid_height: usize,
    cells: Vec<Vec<usize>>,
    len: usize,
}

impl SpatialIndex {
    /// Creates an index covering `[0, width] x [0, height]` for exclusion radii up to
    /// `max_radius`.
    pub fn new(width: u32, height: u32, max_radius: f32) -> Self {
        debug_assert!(max_radius > 0.0);
        let cell_size = max_radius / std::f32::consts::SQRT_2;
        let grid_width = (width as f32 / cell_size).ceil() as usize + 1;
        let grid_height = (height as f32 / cell_size).ceil() as usize + 1;

        Self {
            cell_size,
            grid_width,
            grid_height,
            cells: vec![Vec::new(); grid_width * grid_height],
            len: 0,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Grid dimensions in cells as `(columns, rows)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.grid_width, self.grid_height)
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Cell coordinates `(column, row)` of a pixel position. May lie outside the grid.
    #[inline]
    pub fn cell_of(&self, x: i32, y: i32) -> IVec2 {
        IVec2::new(
            (x as f32 / self.cell_size).floor() as i32,
            (y as f32 / self.cell_size).floor() as i32,
        )
    }

    #[inline]
    fn slot(&self, cell: IVec2) -> Option<usize> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        let (cx, cy) = (cell.x as usize, cell.y as usize);
        if cx >= self.grid_width || cy >= self.grid_height {
            return None;
        }
        Some(cy * self.grid_width + cx)
    }

    /// Point indices stored in `cell`, or an empty slice outside the grid.
    pub fn cell(&self, cell: IVec2) -> &[usize] {
        match self.slot(cell) {
            Some(slot) => &self.cells[slot],
            None => &[],
        }
    }

    /// Files `index` under the cell containing `(x, y)`.
    ///
    /// Returns `false` and stores nothing when the cell lies outside the grid.
    pub fn insert(&mut self, index: usize, x: i32, y: i32) -> bool {
        let Some(slot) = self.slot(self.cell_of(x, y)) else {
            return false;
        };
        self.cells[slot].push(index);
        self.len += 1;
        true
    }

    /// Every point index in the diamond neighborhood around the cell of `(x, y)`.
    ///
    /// Order is unspecified. Cells outside the grid are skipped.
    pub fn neighbors_near(&self, x: i32, y: i32) -> impl Iterator<Item = usize> + '_ {
        let center = self.cell_of(x, y);
        SCAN_PATTERN
            .into_iter()
            .zip(-2..=2)
            .flat_map(move |(half, dy)| (-half..=half).map(move |dx| center + IVec2::new(dx, dy)))
            .flat_map(move |cell| self.cell(cell).iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_dimensions_follow_cell_size() {
        let index = SpatialIndex::new(100, 50, 10.0);
        let cell = 10.0 / std::f32::consts::SQRT_2;
        assert!((index.cell_size() - cell).abs() < 1e-6);
        assert_eq!(
            index.dimensions(),
            (
                (100.0 / cell).ceil() as usize + 1,
                (50.0 / cell).ceil() as usize + 1
            )
        );
    }

    #[test]
    fn scan_pattern_visits_twenty_one_cells() {
        let visited: i32 = SCAN_PATTERN.iter().map(|h| 2 * h + 1).sum();
        assert_eq!(visited, 21);
    }

    #[test]
    fn insert_files_point_in_its_cell() {
        let mut index = SpatialIndex::new(100, 100, 10.0);
        assert!(index.insert(0, 15, 3));
        let cell = index.cell_of(15, 3);
        assert_eq!(cell, IVec2::new(2, 0));
        assert_eq!(index.cell(cell), &[0]);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn cells_hold_several_points() {
        let mut index = SpatialIndex::new(100, 100, 10.0);
        index.insert(0, 1, 1);
        index.insert(1, 2, 2);
        let mut found: Vec<_> = index.neighbors_near(1, 1).collect();
        found.sort_unstable();
        assert_eq!(found, vec![0, 1]);
    }

    #[test]
    fn insert_outside_grid_is_rejected() {
        let mut index = SpatialIndex::new(20, 20, 10.0);
        assert!(!index.insert(0, -30, 5));
        assert!(!index.insert(0, 5, 500));
        assert!(index.is_empty());
    }

    #[test]
    fn neighbors_near_skips_corner_cells() {
        let mut index = SpatialIndex::new(200, 200, 10.0);
        let c = index.cell_size();
        let center = IVec2::new(5, 5);
        let at = |cell: IVec2| {
            (
                (cell.x as f32 * c + 0.5 * c) as i32,
                (cell.y as f32 * c + 0.5 * c) as i32,
            )
        };

        let corner = at(center + IVec2::new(2, 2));
        let edge = at(center + IVec2::new(2, 1));
        let top = at(center + IVec2::new(1, -2));
        index.insert(0, corner.0, corner.1);
        index.insert(1, edge.0, edge.1);
        index.insert(2, top.0, top.1);

        let (x, y) = at(center);
        let mut found: Vec<_> = index.neighbors_near(x, y).collect();
        found.sort_unstable();
        assert_eq!(found, vec![1, 2]);
    }

    #[test]
    fn neighbors_near_clips_at_grid_border() {
        let mut index = SpatialIndex::new(50, 50, 10.0);
        index.insert(7, 0, 0);
        let found: Vec<_> = index.neighbors_near(0, 0).collect();
        assert_eq!(found, vec![7]);
    }

    #[test]
    fn scan_finds_every_point_closer_than_max_radius() {
        let max_radius = 10.0_f32;
        let mut index = SpatialIndex::new(100, 100, max_radius);
        let mut points = Vec::new();
        for y in (0..100).step_by(3) {
            for x in (0..100).step_by(3) {
                index.insert(points.len(), x, y);
                points.push((x, y));
            }
        }

        let query = (47, 52);
        let found: std::collections::HashSet<_> = index.neighbors_near(query.0, query.1).collect();
        for (i, &(x, y)) in points.iter().enumerate() {
            let dx = (x - query.0) as f32;
            let dy = (y - query.1) as f32;
            if dx * dx + dy * dy < max_radius * max_radius {
                assert!(found.contains(&i), "missed point {:?}", (x, y));
            }
        }
    }
}
