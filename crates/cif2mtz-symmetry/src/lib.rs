//! Crystallographic symmetry needed for reflection data.
//!
//! Covers the 65 chiral (Sohncke) space groups in their reference settings,
//! which is every group a macromolecular structure can crystallize in.
//!
//! - [`UnitCell`]: cell parameters and resolution (`1/d²`).
//! - [`Op`]: a symmetry operator on a 1/24 translation grid.
//! - [`SpaceGroup`]: static group table, looked up by name or number.
//! - [`GroupOps`]: the full operator list of a group.
//! - [`ReciprocalAsu`]: reduction of Miller indices to the asymmetric unit.
//!
//! ```
//! use cif2mtz_symmetry::{ReciprocalAsu, find_spacegroup_by_name};
//!
//! let sg = find_spacegroup_by_name("P 21 21 21").unwrap();
//! let asu = ReciprocalAsu::new(sg).unwrap();
//! assert_eq!(asu.to_asu([-1, 2, -3]), ([1, 2, 3], 5));
//! ```

mod asu;
mod cell;
mod error;
mod op;
mod ops;
mod table;

pub use asu::{LaueClass, ReciprocalAsu};
pub use cell::UnitCell;
pub use error::{Result, SymmetryError};
pub use op::{DEN, Miller, Op, parse_triplet};
pub use ops::{GroupOps, centring_vectors};
pub use table::{SpaceGroup, find_spacegroup_by_name, find_spacegroup_by_number, space_groups};
