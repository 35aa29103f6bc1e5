//! Shaping the MTZ container before any values are written.

use cif2mtz_mtz::{Batch, Column, Mtz};
use tracing::info;

use crate::options::ConvertOptions;
use crate::resolve::Resolution;
use crate::source::ReflnBlock;

pub const BASE_DATASET: &str = "HKL_base";
pub const DATA_DATASET: &str = "unknown";
pub const ISYM_LABEL: &str = "M/ISYM";
pub const BATCH_LABEL: &str = "BATCH";

/// Position of the synthetic columns in unmerged files.
const SYNTHETIC_POS: usize = 3;

/// Build a container with columns, datasets and batches set and a
/// zero-filled data matrix of `nreflections` rows.
pub fn build_container(
    rb: &ReflnBlock<'_>,
    resolution: &Resolution,
    options: &ConvertOptions,
    nreflections: usize,
) -> Mtz {
    let mut mtz = Mtz::new();
    if let Some(title) = &options.title {
        mtz.title = title.clone();
    }
    mtz.history.extend(options.history.iter().cloned());
    mtz.cell = rb.cell;
    mtz.spacegroup = rb.spacegroup;
    mtz.add_dataset(BASE_DATASET);
    mtz.add_dataset(DATA_DATASET).wavelength = rb.wavelength;

    mtz.columns = resolution
        .columns
        .iter()
        .map(|c| Column::new(c.label.as_str(), c.col_type, c.dataset_id))
        .collect();
    if resolution.unmerged {
        info!("adding columns {ISYM_LABEL} and {BATCH_LABEL} for unmerged data");
        mtz.columns
            .insert(SYNTHETIC_POS, Column::new(ISYM_LABEL, 'Y', 1));
        mtz.columns
            .insert(SYNTHETIC_POS + 1, Column::new(BATCH_LABEL, 'B', 1));
        let mut batch = Batch::default();
        batch.set_cell(&mtz.cell);
        mtz.batches.push(batch);
    }
    mtz.reindex_columns();

    mtz.nreflections = nreflections;
    mtz.data = vec![0.0; mtz.columns.len() * nreflections];
    mtz
}
