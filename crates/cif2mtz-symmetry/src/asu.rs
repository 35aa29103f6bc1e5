//! Reciprocal-space asymmetric units (CCP4 conventions).

use std::fmt;

use tracing::trace;

use crate::error::Result;
use crate::op::{Miller, Op};
use crate::table::SpaceGroup;

/// Laue class: the point group of the diffraction pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaueClass {
    L1,
    L2m,
    Lmmm,
    L4m,
    L4mmm,
    L3,
    L3m1,
    L31m,
    L6m,
    L6mmm,
    Lm3,
    Lm3m,
}

impl LaueClass {
    pub fn name(self) -> &'static str {
        match self {
            Self::L1 => "-1",
            Self::L2m => "2/m",
            Self::Lmmm => "mmm",
            Self::L4m => "4/m",
            Self::L4mmm => "4/mmm",
            Self::L3 => "-3",
            Self::L3m1 => "-3m1",
            Self::L31m => "-31m",
            Self::L6m => "6/m",
            Self::L6mmm => "6/mmm",
            Self::Lm3 => "m-3",
            Self::Lm3m => "m-3m",
        }
    }

    /// Whether `[h, k, l]` lies in the asymmetric unit of this class.
    pub fn is_in(self, [h, k, l]: Miller) -> bool {
        match self {
            Self::L1 => l > 0 || (l == 0 && (h > 0 || (h == 0 && k >= 0))),
            Self::L2m => k >= 0 && (l > 0 || (l == 0 && h >= 0)),
            Self::Lmmm => h >= 0 && k >= 0 && l >= 0,
            Self::L4m | Self::L6m => l >= 0 && ((h >= 0 && k > 0) || (h == 0 && k == 0)),
            Self::L4mmm => h >= k && k >= 0 && l >= 0,
            Self::L3 => (h >= 0 && k > 0) || (h == 0 && k == 0 && l >= 0),
            Self::L3m1 => h >= k && k >= 0 && (h > k || l >= 0),
            Self::L31m => h >= k && k >= 0 && (k > 0 || l >= 0),
            Self::L6mmm => h >= k && k >= 0 && l >= 0,
            Self::Lm3 => h >= 0 && ((l >= h && k > h) || (l == h && k == h)),
            Self::Lm3m => k >= l && l >= h && h >= 0,
        }
    }
}

impl fmt::Display for LaueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Maps reflections into the asymmetric unit of one space group.
#[derive(Debug, Clone)]
pub struct ReciprocalAsu {
    laue: LaueClass,
    ops: Vec<Op>,
}

impl ReciprocalAsu {
    pub fn new(sg: &SpaceGroup) -> Result<Self> {
        let ops = sg.operations()?;
        Ok(Self {
            laue: sg.laue,
            ops: ops.sym_ops,
        })
    }

    /// The ASU of `P 1`: only Friedel mates are merged.
    pub fn p1() -> Self {
        Self {
            laue: LaueClass::L1,
            ops: vec![Op::IDENTITY],
        }
    }

    pub fn laue(&self) -> LaueClass {
        self.laue
    }

    pub fn is_in(&self, hkl: Miller) -> bool {
        self.laue.is_in(hkl)
    }

    /// Reduce `hkl` to its asymmetric-unit representative.
    ///
    /// Operators are tried in order; for operator `i` the image `h·R`
    /// gives ISYM `2i+1` and its Friedel mate `-(h·R)` gives `2i+2`.
    /// Every integer triple has exactly one representative.
    pub fn to_asu(&self, hkl: Miller) -> (Miller, i32) {
        let mut isym = 1;
        for op in &self.ops {
            let image = op.apply_to_hkl(hkl);
            if self.laue.is_in(image) {
                return (image, isym);
            }
            let mate = image.map(|x| -x);
            if self.laue.is_in(mate) {
                return (mate, isym + 1);
            }
            isym += 2;
        }
        // Unreachable for the groups in the table: each Laue class ASU
        // covers every orbit of its rotation group.
        trace!(?hkl, laue = %self.laue, "reflection outside every ASU image");
        (hkl, 0)
    }

    /// Inverse of [`to_asu`](Self::to_asu): the original index from a
    /// representative and its ISYM code.
    pub fn from_asu(&self, asu: Miller, isym: i32) -> Option<Miller> {
        let index = usize::try_from((isym - 1) / 2).ok()?;
        let op = self.ops.get(index)?;
        let signed = if isym % 2 == 0 { asu.map(|x| -x) } else { asu };
        // h·R = signed, so h = signed·R⁻¹.
        let inverse = self
            .ops
            .iter()
            .find(|other| op.combine(other).rot == Op::IDENTITY.rot)?;
        Some(inverse.apply_to_hkl(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::find_spacegroup_by_number;

    fn asu(number: u16) -> ReciprocalAsu {
        ReciprocalAsu::new(find_spacegroup_by_number(number).unwrap()).unwrap()
    }

    #[test]
    fn test_orthorhombic_reduction() {
        let asu = asu(19);
        assert_eq!(asu.to_asu([-1, 2, -3]), ([1, 2, 3], 5));
        assert_eq!(asu.to_asu([1, -2, 3]), ([1, 2, 3], 6));
        assert_eq!(asu.to_asu([1, 2, 3]), ([1, 2, 3], 1));
    }

    #[test]
    fn test_monoclinic_reduction() {
        let asu = asu(4);
        assert_eq!(asu.to_asu([1, -2, -3]), ([-1, 2, 3], 2));
        assert_eq!(asu.to_asu([-1, 0, 2]), ([-1, 0, 2], 1));
    }

    #[test]
    fn test_tetragonal_trigonal_hexagonal_cubic() {
        assert_eq!(asu(96).to_asu([-3, 5, -2]), ([5, 3, 2], 14));
        assert_eq!(asu(152).to_asu([2, -5, 1]), ([3, 2, 1], 7));
        assert_eq!(asu(150).to_asu([-1, -2, 3]), ([2, 1, 3], 6));
        assert_eq!(asu(173).to_asu([-3, 1, -2]), ([1, 2, 2], 12));
        assert_eq!(asu(213).to_asu([1, 3, 2]), ([1, 3, 2], 1));
    }

    #[test]
    fn test_from_asu_inverts_reduction() {
        for number in [4, 19, 96, 152, 173, 213] {
            let asu = asu(number);
            for hkl in [[1, 2, 3], [-3, 5, -2], [2, -5, 1], [0, -4, 7]] {
                let (reduced, isym) = asu.to_asu(hkl);
                assert_eq!(asu.from_asu(reduced, isym), Some(hkl), "group {number}");
            }
        }
    }

    #[test]
    fn test_p1_matches_table_entry() {
        let p1 = ReciprocalAsu::p1();
        for hkl in [[1, 2, 3], [-1, 0, 2], [0, -1, 0], [-2, -2, -2]] {
            assert_eq!(p1.to_asu(hkl), asu(1).to_asu(hkl));
        }
        assert_eq!(p1.to_asu([-1, 0, 2]), ([-1, 0, 2], 1));
        assert_eq!(p1.to_asu([1, 0, -2]), ([-1, 0, 2], 2));
    }

    #[test]
    fn test_laue_names() {
        assert_eq!(LaueClass::L3m1.to_string(), "-3m1");
        assert_eq!(asu(149).laue().name(), "-31m");
    }
}
