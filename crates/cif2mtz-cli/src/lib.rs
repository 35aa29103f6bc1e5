//! Library parts of the cif2mtz command-line tools.

pub mod diff;
pub mod logging;
