//! Reduction of unmerged Miller indices to the asymmetric unit.

use cif2mtz_symmetry::{Miller, ReciprocalAsu, SpaceGroup};
use tracing::{debug, warn};

use crate::error::Result;

/// Maps a reflection to its asymmetric-unit representative.
///
/// Implementations must be total and deterministic: every integer triple
/// has a representative and an ISYM code identifying the operator used.
pub trait IndexReducer: Send + Sync {
    fn reduce(&self, hkl: Miller) -> (Miller, i32);
}

/// Reduction with the operators of a space group.
#[derive(Debug, Clone)]
pub struct AsuReducer {
    asu: ReciprocalAsu,
}

impl AsuReducer {
    pub fn new(sg: &SpaceGroup) -> Result<Self> {
        Ok(Self {
            asu: ReciprocalAsu::new(sg)?,
        })
    }

    /// Reducer for the block's space group; `P 1` when it is unknown.
    pub fn for_spacegroup(sg: Option<&SpaceGroup>, block: &str) -> Result<Self> {
        match sg {
            Some(sg) => {
                debug!(block, spacegroup = sg.hm, "reducing unmerged indices");
                Self::new(sg)
            }
            None => {
                warn!(block, "unknown space group, unmerged indices reduced in P 1");
                Ok(Self {
                    asu: ReciprocalAsu::p1(),
                })
            }
        }
    }
}

impl IndexReducer for AsuReducer {
    fn reduce(&self, hkl: Miller) -> (Miller, i32) {
        self.asu.to_asu(hkl)
    }
}
