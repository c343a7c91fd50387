//! Uniform grid index over a fixed 2D extent.
//!
//! Each entry is stored in every cell its bounding box touches. Boxes that
//! reach past the extent are clamped into the border cells, so entries in a
//! tile's buffer region are still found. Queries collect candidates from the
//! covered cells, drop repeats and apply an exact box test.

use geo::Rect;
use rustc_hash::FxHashSet;
use std::ops::RangeInclusive;

/// A bounding-box grid index with opaque entry values.
#[derive(Debug, Clone)]
pub struct GridIndex<T> {
    cell_size: f32,
    x_cells: usize,
    y_cells: usize,
    entries: Vec<(T, Rect<f32>)>,
    /// Row-major cell buckets holding positions into `entries`.
    cells: Vec<Vec<usize>>,
}

impl<T> GridIndex<T> {
    /// Create a grid covering `width` x `height` units split into square cells.
    ///
    /// # Panics
    ///
    /// Panics if any dimension is not strictly positive.
    pub fn new(width: f32, height: f32, cell_size: f32) -> Self {
        assert!(
            width > 0.0 && height > 0.0 && cell_size > 0.0,
            "Grid dimensions must be greater than zero"
        );

        let x_cells = (width / cell_size).ceil() as usize;
        let y_cells = (height / cell_size).ceil() as usize;

        Self {
            cell_size,
            x_cells,
            y_cells,
            entries: Vec::new(),
            cells: vec![Vec::new(); x_cells * y_cells],
        }
    }

    /// Insert an entry covering `bbox`.
    pub fn insert(&mut self, value: T, bbox: Rect<f32>) {
        let slot = self.entries.len();
        let (xs, ys) = self.cell_range(&bbox);

        for y in ys {
            for x in xs.clone() {
                self.cells[y * self.x_cells + x].push(slot);
            }
        }

        self.entries.push((value, bbox));
    }

    /// All entries whose box overlaps `bbox`, each reported once.
    ///
    /// Boxes that merely touch count as overlapping. Order is unspecified.
    pub fn query(&self, bbox: Rect<f32>) -> Vec<&T> {
        if !is_finite(&bbox) {
            log::warn!("Rejecting grid query with non-finite coordinates");
            return Vec::new();
        }

        let (xs, ys) = self.cell_range(&bbox);
        let mut seen = FxHashSet::default();
        let mut results = Vec::new();

        for y in ys {
            for x in xs.clone() {
                for &slot in &self.cells[y * self.x_cells + x] {
                    if !seen.insert(slot) {
                        continue;
                    }

                    let (value, entry_box) = &self.entries[slot];
                    if boxes_overlap(entry_box, &bbox) {
                        results.push(value);
                    }
                }
            }
        }

        results
    }

    /// Number of inserted entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cells per axis as `(x, y)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.x_cells, self.y_cells)
    }

    fn cell_range(&self, bbox: &Rect<f32>) -> (RangeInclusive<usize>, RangeInclusive<usize>) {
        let x0 = to_cell(bbox.min().x, self.cell_size, self.x_cells);
        let x1 = to_cell(bbox.max().x, self.cell_size, self.x_cells);
        let y0 = to_cell(bbox.min().y, self.cell_size, self.y_cells);
        let y1 = to_cell(bbox.max().y, self.cell_size, self.y_cells);
        (x0..=x1, y0..=y1)
    }
}

fn to_cell(coord: f32, cell_size: f32, count: usize) -> usize {
    let cell = (coord / cell_size).floor();
    if cell <= 0.0 {
        0
    } else {
        (cell as usize).min(count - 1)
    }
}

fn boxes_overlap(a: &Rect<f32>, b: &Rect<f32>) -> bool {
    a.min().x <= b.max().x
        && a.max().x >= b.min().x
        && a.min().y <= b.max().y
        && a.max().y >= b.min().y
}

fn is_finite(bbox: &Rect<f32>) -> bool {
    [bbox.min().x, bbox.min().y, bbox.max().x, bbox.max().y]
        .iter()
        .all(|v| v.is_finite())
}
