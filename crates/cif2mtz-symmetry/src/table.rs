//! Static table of the 65 chiral space groups.
//!
//! | Range   | System       | Laue class     |
//! |---------|--------------|----------------|
//! | 1       | triclinic    | -1             |
//! | 3-5     | monoclinic   | 2/m            |
//! | 16-24   | orthorhombic | mmm            |
//! | 75-98   | tetragonal   | 4/m, 4/mmm     |
//! | 143-155 | trigonal     | -3, -31m, -3m1 |
//! | 168-182 | hexagonal    | 6/m, 6/mmm     |
//! | 195-214 | cubic        | m-3, m-3m      |
//!
//! Rhombohedral groups use hexagonal axes and the CCP4 names `H 3` and
//! `H 3 2`.

use crate::asu::LaueClass;
use crate::error::Result;
use crate::op::parse_triplet;
use crate::ops::{GroupOps, centring_vectors};

/// One space group in its reference setting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceGroup {
    /// International Tables number.
    pub number: u16,
    /// Full Hermann-Mauguin symbol, e.g. `P 1 21 1`.
    pub hm: &'static str,
    /// Generators besides the identity and lattice centring.
    pub generators: &'static [&'static str],
    pub laue: LaueClass,
    /// CCP4 point group name, e.g. `PG222`.
    pub point_group: &'static str,
}

impl SpaceGroup {
    /// Lattice symbol (`P`, `C`, `I`, `F` or `H`).
    pub fn lattice(&self) -> char {
        self.hm.chars().next().unwrap_or('P')
    }

    /// Full operator list: generator closure plus centring.
    pub fn operations(&self) -> Result<GroupOps> {
        let generators = self
            .generators
            .iter()
            .map(|g| parse_triplet(g))
            .collect::<Result<Vec<_>>>()?;
        Ok(GroupOps::from_generators(
            &generators,
            centring_vectors(self.lattice()),
        ))
    }
}

const fn sg(
    number: u16,
    hm: &'static str,
    generators: &'static [&'static str],
    laue: LaueClass,
    point_group: &'static str,
) -> SpaceGroup {
    SpaceGroup {
        number,
        hm,
        generators,
        laue,
        point_group,
    }
}

use LaueClass::{L1, L2m, L3, L3m1, L4m, L4mmm, L6m, L6mmm, L31m, Lm3, Lm3m, Lmmm};

const TET_4: &[&str] = &["-y,x,z"];
const TRI_3: &[&str] = &["-y,x-y,z"];
const HEX_6: &[&str] = &["x-y,x,z"];
const ORTHO_222: &[&str] = &["-x,-y,z", "-x,y,-z"];
const ORTHO_212121: &[&str] = &["-x+1/2,-y,z+1/2", "-x,y+1/2,-z+1/2"];
const CUBIC_23: &[&str] = &["-x,-y,z", "-x,y,-z", "z,x,y"];
const CUBIC_213: &[&str] = &["-x+1/2,-y,z+1/2", "-x,y+1/2,-z+1/2", "z,x,y"];
const CUBIC_432: &[&str] = &["-x,-y,z", "-x,y,-z", "z,x,y", "y,x,-z"];
const CUBIC_4132: &[&str] = &[
    "-x+1/2,-y,z+1/2",
    "-x,y+1/2,-z+1/2",
    "z,x,y",
    "y+3/4,x+1/4,-z+1/4",
];

static SPACE_GROUPS: [SpaceGroup; 65] = [
    sg(1, "P 1", &[], L1, "PG1"),
    sg(3, "P 1 2 1", &["-x,y,-z"], L2m, "PG2"),
    sg(4, "P 1 21 1", &["-x,y+1/2,-z"], L2m, "PG2"),
    sg(5, "C 1 2 1", &["-x,y,-z"], L2m, "PG2"),
    sg(16, "P 2 2 2", ORTHO_222, Lmmm, "PG222"),
    sg(17, "P 2 2 21", &["-x,-y,z+1/2", "-x,y,-z+1/2"], Lmmm, "PG222"),
    sg(18, "P 21 21 2", &["-x,-y,z", "-x+1/2,y+1/2,-z"], Lmmm, "PG222"),
    sg(19, "P 21 21 21", ORTHO_212121, Lmmm, "PG222"),
    sg(20, "C 2 2 21", &["-x,-y,z+1/2", "-x,y,-z+1/2"], Lmmm, "PG222"),
    sg(21, "C 2 2 2", ORTHO_222, Lmmm, "PG222"),
    sg(22, "F 2 2 2", ORTHO_222, Lmmm, "PG222"),
    sg(23, "I 2 2 2", ORTHO_222, Lmmm, "PG222"),
    sg(24, "I 21 21 21", ORTHO_212121, Lmmm, "PG222"),
    sg(75, "P 4", TET_4, L4m, "PG4"),
    sg(76, "P 41", &["-y,x,z+1/4"], L4m, "PG4"),
    sg(77, "P 42", &["-y,x,z+1/2"], L4m, "PG4"),
    sg(78, "P 43", &["-y,x,z+3/4"], L4m, "PG4"),
    sg(79, "I 4", TET_4, L4m, "PG4"),
    sg(80, "I 41", &["-y,x+1/2,z+1/4"], L4m, "PG4"),
    sg(89, "P 4 2 2", &["-y,x,z", "x,-y,-z"], L4mmm, "PG422"),
    sg(90, "P 4 21 2", &["-y+1/2,x+1/2,z", "x+1/2,-y+1/2,-z"], L4mmm, "PG422"),
    sg(91, "P 41 2 2", &["-y,x,z+1/4", "x,-y,-z+1/2"], L4mmm, "PG422"),
    sg(92, "P 41 21 2", &["-y+1/2,x+1/2,z+1/4", "x+1/2,-y+1/2,-z+3/4"], L4mmm, "PG422"),
    sg(93, "P 42 2 2", &["-y,x,z+1/2", "x,-y,-z"], L4mmm, "PG422"),
    sg(94, "P 42 21 2", &["-y+1/2,x+1/2,z+1/2", "x+1/2,-y+1/2,-z+1/2"], L4mmm, "PG422"),
    sg(95, "P 43 2 2", &["-y,x,z+3/4", "x,-y,-z+1/2"], L4mmm, "PG422"),
    sg(96, "P 43 21 2", &["-y+1/2,x+1/2,z+3/4", "x+1/2,-y+1/2,-z+1/4"], L4mmm, "PG422"),
    sg(97, "I 4 2 2", &["-y,x,z", "x,-y,-z"], L4mmm, "PG422"),
    sg(98, "I 41 2 2", &["-y,x+1/2,z+1/4", "x,-y+1/2,-z+1/4"], L4mmm, "PG422"),
    sg(143, "P 3", TRI_3, L3, "PG3"),
    sg(144, "P 31", &["-y,x-y,z+1/3"], L3, "PG3"),
    sg(145, "P 32", &["-y,x-y,z+2/3"], L3, "PG3"),
    sg(146, "H 3", TRI_3, L3, "PG3"),
    sg(149, "P 3 1 2", &["-y,x-y,z", "-y,-x,-z"], L31m, "PG312"),
    sg(150, "P 3 2 1", &["-y,x-y,z", "y,x,-z"], L3m1, "PG321"),
    sg(151, "P 31 1 2", &["-y,x-y,z+1/3", "-y,-x,-z+2/3"], L31m, "PG312"),
    sg(152, "P 31 2 1", &["-y,x-y,z+1/3", "y,x,-z"], L3m1, "PG321"),
    sg(153, "P 32 1 2", &["-y,x-y,z+2/3", "-y,-x,-z+1/3"], L31m, "PG312"),
    sg(154, "P 32 2 1", &["-y,x-y,z+2/3", "y,x,-z"], L3m1, "PG321"),
    sg(155, "H 3 2", &["-y,x-y,z", "y,x,-z"], L3m1, "PG32"),
    sg(168, "P 6", HEX_6, L6m, "PG6"),
    sg(169, "P 61", &["x-y,x,z+1/6"], L6m, "PG6"),
    sg(170, "P 65", &["x-y,x,z+5/6"], L6m, "PG6"),
    sg(171, "P 62", &["x-y,x,z+1/3"], L6m, "PG6"),
    sg(172, "P 64", &["x-y,x,z+2/3"], L6m, "PG6"),
    sg(173, "P 63", &["x-y,x,z+1/2"], L6m, "PG6"),
    sg(177, "P 6 2 2", &["x-y,x,z", "y,x,-z"], L6mmm, "PG622"),
    sg(178, "P 61 2 2", &["x-y,x,z+1/6", "y,x,-z+1/3"], L6mmm, "PG622"),
    sg(179, "P 65 2 2", &["x-y,x,z+5/6", "y,x,-z+2/3"], L6mmm, "PG622"),
    sg(180, "P 62 2 2", &["x-y,x,z+1/3", "y,x,-z+2/3"], L6mmm, "PG622"),
    sg(181, "P 64 2 2", &["x-y,x,z+2/3", "y,x,-z+1/3"], L6mmm, "PG622"),
    sg(182, "P 63 2 2", &["x-y,x,z+1/2", "y,x,-z"], L6mmm, "PG622"),
    sg(195, "P 2 3", CUBIC_23, Lm3, "PG23"),
    sg(196, "F 2 3", CUBIC_23, Lm3, "PG23"),
    sg(197, "I 2 3", CUBIC_23, Lm3, "PG23"),
    sg(198, "P 21 3", CUBIC_213, Lm3, "PG23"),
    sg(199, "I 21 3", CUBIC_213, Lm3, "PG23"),
    sg(207, "P 4 3 2", CUBIC_432, Lm3m, "PG432"),
    sg(
        208,
        "P 42 3 2",
        &["-x,-y,z", "-x,y,-z", "z,x,y", "y+1/2,x+1/2,-z+1/2"],
        Lm3m,
        "PG432",
    ),
    sg(209, "F 4 3 2", CUBIC_432, Lm3m, "PG432"),
    sg(
        210,
        "F 41 3 2",
        &["-x,-y+1/2,z+1/2", "-x+1/2,y+1/2,-z", "z,x,y", "y+3/4,x+1/4,-z+3/4"],
        Lm3m,
        "PG432",
    ),
    sg(211, "I 4 3 2", CUBIC_432, Lm3m, "PG432"),
    sg(
        212,
        "P 43 3 2",
        &["-x+1/2,-y,z+1/2", "-x,y+1/2,-z+1/2", "z,x,y", "y+1/4,x+3/4,-z+3/4"],
        Lm3m,
        "PG432",
    ),
    sg(213, "P 41 3 2", CUBIC_4132, Lm3m, "PG432"),
    sg(214, "I 41 3 2", CUBIC_4132, Lm3m, "PG432"),
];

/// Alternative names, matched after normalization.
const ALIASES: &[(&str, u16)] = &[
    ("P 2", 3),
    ("P 21", 4),
    ("C 2", 5),
    ("R 3", 146),
    ("R 3:H", 146),
    ("H 3:H", 146),
    ("R 3 2", 155),
    ("R 3 2:H", 155),
    ("H 3 2:H", 155),
    ("R 32", 155),
];

/// All supported space groups, ordered by number.
pub fn space_groups() -> &'static [SpaceGroup] {
    &SPACE_GROUPS
}

/// Look up a group by IT number.
pub fn find_spacegroup_by_number(number: u16) -> Option<&'static SpaceGroup> {
    SPACE_GROUPS.iter().find(|sg| sg.number == number)
}

/// Look up a group by Hermann-Mauguin name.
///
/// Case and spacing are ignored (`p 21 21 21`, `P212121`), and short
/// monoclinic and rhombohedral aliases are accepted. Unknown names and
/// non-reference settings return `None`.
pub fn find_spacegroup_by_name(name: &str) -> Option<&'static SpaceGroup> {
    let normalized = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase();
    if normalized.is_empty() {
        return None;
    }
    if let Some(sg) = SPACE_GROUPS.iter().find(|sg| sg.hm == normalized) {
        return Some(sg);
    }
    if let Some(&(_, number)) = ALIASES.iter().find(|(alias, _)| *alias == normalized) {
        return find_spacegroup_by_number(number);
    }

    let squeezed = squeeze(&normalized);
    SPACE_GROUPS
        .iter()
        .find(|sg| squeeze(sg.hm) == squeezed)
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| squeeze(alias) == squeezed)
                .and_then(|&(_, number)| find_spacegroup_by_number(number))
        })
}

fn squeeze(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}
