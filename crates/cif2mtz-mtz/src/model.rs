//! In-memory MTZ container.

use cif2mtz_symmetry::{SpaceGroup, UnitCell};

use crate::error::{MtzError, Result};

/// Number of integer words in a batch header.
pub const BATCH_INTS: usize = 29;
/// Number of float words in a batch header.
pub const BATCH_FLOATS: usize = 156;
/// Longest label a COLUMN record can hold.
pub const MAX_LABEL_LEN: usize = 30;

/// A project/crystal/dataset triple with its own cell and wavelength.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub id: i32,
    pub project_name: String,
    pub crystal_name: String,
    pub dataset_name: String,
    pub cell: UnitCell,
    pub wavelength: f64,
}

/// One data column. `idx` is the column's own position in [`Mtz::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub dataset_id: i32,
    pub col_type: char,
    pub label: String,
    pub idx: usize,
}

impl Column {
    pub fn new(label: impl Into<String>, col_type: char, dataset_id: i32) -> Self {
        Self {
            dataset_id,
            col_type,
            label: label.into(),
            idx: 0,
        }
    }
}

/// Orientation block of one batch (image) of unmerged data.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub number: i32,
    pub title: String,
    pub ints: Vec<i32>,
    pub floats: Vec<f32>,
    pub axes: Vec<String>,
}

impl Default for Batch {
    fn default() -> Self {
        let mut ints = vec![0; BATCH_INTS];
        ints[0] = (BATCH_INTS + BATCH_FLOATS) as i32;
        ints[1] = BATCH_INTS as i32;
        ints[2] = BATCH_FLOATS as i32;
        Self {
            number: 1,
            title: String::new(),
            ints,
            floats: vec![0.0; BATCH_FLOATS],
            axes: Vec::new(),
        }
    }
}

impl Batch {
    /// Cell parameters live in the first six floats.
    pub fn set_cell(&mut self, cell: &UnitCell) {
        for (slot, value) in self.floats.iter_mut().zip(cell.parameters()) {
            *slot = value as f32;
        }
    }
}

/// An MTZ file: metadata plus a row-major `f32` matrix.
#[derive(Debug, Clone, Default)]
pub struct Mtz {
    pub title: String,
    pub history: Vec<String>,
    pub cell: UnitCell,
    pub spacegroup: Option<&'static SpaceGroup>,
    pub datasets: Vec<Dataset>,
    pub columns: Vec<Column>,
    pub batches: Vec<Batch>,
    pub nreflections: usize,
    /// `columns.len() * nreflections` values, one reflection per row.
    pub data: Vec<f32>,
}

impl Mtz {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dataset named `name` (project, crystal and dataset alike),
    /// inheriting the container cell.
    pub fn add_dataset(&mut self, name: &str) -> &mut Dataset {
        let id = self.datasets.iter().map(|d| d.id + 1).max().unwrap_or(0);
        self.datasets.push(Dataset {
            id,
            project_name: name.to_string(),
            crystal_name: name.to_string(),
            dataset_name: name.to_string(),
            cell: self.cell,
            wavelength: 0.0,
        });
        let last = self.datasets.len() - 1;
        &mut self.datasets[last]
    }

    pub fn dataset(&self, id: i32) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id == id)
    }

    pub fn column_with_label(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.label == label)
    }

    /// Refresh every column's `idx` after columns were inserted.
    pub fn reindex_columns(&mut self) {
        for (i, column) in self.columns.iter_mut().enumerate() {
            column.idx = i;
        }
    }

    /// Values of one column, top to bottom.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = f32> + '_ {
        let ncol = self.columns.len();
        self.data.iter().skip(idx).step_by(ncol.max(1)).copied()
    }

    /// Smallest and largest non-NaN value of a column; zeros when the
    /// column has no finite values.
    pub fn column_range(&self, idx: usize) -> (f32, f32) {
        let mut range: Option<(f32, f32)> = None;
        for v in self.column_values(idx).filter(|v| v.is_finite()) {
            range = Some(match range {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
        range.unwrap_or((0.0, 0.0))
    }

    /// Row `i` of the data matrix.
    pub fn row(&self, i: usize) -> &[f32] {
        let ncol = self.columns.len();
        &self.data[i * ncol..(i + 1) * ncol]
    }

    /// Lowest and highest `1/d²` over all reflections, using the first
    /// three columns as H, K and L.
    pub fn resolution_range(&self) -> Option<(f64, f64)> {
        if self.columns.len() < 3 || self.nreflections == 0 || !self.cell.is_crystal() {
            return None;
        }
        let mut range: Option<(f64, f64)> = None;
        for i in 0..self.nreflections {
            let row = self.row(i);
            let hkl = [row[0], row[1], row[2]].map(|x| x as i32);
            if hkl == [0, 0, 0] {
                continue;
            }
            let d2 = self.cell.calculate_1_d2(hkl);
            range = Some(match range {
                Some((lo, hi)) => (lo.min(d2), hi.max(d2)),
                None => (d2, d2),
            });
        }
        range
    }

    /// Check the structural invariants the writer relies on.
    pub fn validate(&self) -> Result<()> {
        let ncol = self.columns.len();
        if self.data.len() != ncol * self.nreflections {
            return Err(MtzError::DataSize {
                actual: self.data.len(),
                ncol,
                nreflections: self.nreflections,
            });
        }
        for column in &self.columns {
            if column.label.len() > MAX_LABEL_LEN {
                return Err(MtzError::LabelTooLong {
                    label: column.label.clone(),
                });
            }
            if self.dataset(column.dataset_id).is_none() {
                return Err(MtzError::UnknownDataset {
                    label: column.label.clone(),
                    dataset_id: column.dataset_id,
                });
            }
        }
        for batch in &self.batches {
            if batch.ints.len() != BATCH_INTS || batch.floats.len() != BATCH_FLOATS {
                return Err(MtzError::BatchSize {
                    number: batch.number,
                    ints: batch.ints.len(),
                    floats: batch.floats.len(),
                });
            }
        }
        Ok(())
    }
}
