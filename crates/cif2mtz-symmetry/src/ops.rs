//! Operator lists of a space group.

use std::collections::HashSet;

use crate::op::{DEN, Op};

const H: i32 = DEN / 2;
const T1: i32 = DEN / 3;
const T2: i32 = 2 * DEN / 3;

static CENTRING_P: [[i32; 3]; 1] = [[0, 0, 0]];
static CENTRING_C: [[i32; 3]; 2] = [[0, 0, 0], [H, H, 0]];
static CENTRING_I: [[i32; 3]; 2] = [[0, 0, 0], [H, H, H]];
static CENTRING_F: [[i32; 3]; 4] = [[0, 0, 0], [0, H, H], [H, 0, H], [H, H, 0]];
static CENTRING_H: [[i32; 3]; 3] = [[0, 0, 0], [T2, T1, T1], [T1, T2, T2]];

/// Centring translations (in `1/DEN` units) of a lattice symbol.
/// `R` and `H` both mean rhombohedral centring on hexagonal axes.
pub fn centring_vectors(lattice: char) -> &'static [[i32; 3]] {
    match lattice.to_ascii_uppercase() {
        'C' => &CENTRING_C,
        'I' => &CENTRING_I,
        'F' => &CENTRING_F,
        'R' | 'H' => &CENTRING_H,
        _ => &CENTRING_P,
    }
}

/// Symmetry operators of a group, split into the rotational part and
/// the centring translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupOps {
    /// One operator per distinct rotation, identity first.
    pub sym_ops: Vec<Op>,
    /// Centring vectors, `[0, 0, 0]` first.
    pub cen_ops: Vec<[i32; 3]>,
}

impl GroupOps {
    /// Close a set of generators under composition.
    ///
    /// Operators are keyed on their rotation. The identity comes first,
    /// then the generators, then products appended pass by pass until no
    /// new rotation appears, so the order is deterministic.
    pub fn from_generators(generators: &[Op], centring: &[[i32; 3]]) -> Self {
        let mut sym_ops = vec![Op::IDENTITY];
        let mut seen = HashSet::from([Op::IDENTITY.rot]);
        for g in generators {
            if seen.insert(g.rot) {
                sym_ops.push(*g);
            }
        }
        loop {
            let n = sym_ops.len();
            for i in 0..n {
                for j in 0..n {
                    let product = sym_ops[i].combine(&sym_ops[j]);
                    if seen.insert(product.rot) {
                        sym_ops.push(product);
                    }
                }
            }
            if sym_ops.len() == n {
                break;
            }
        }
        let cen_ops = if centring.is_empty() {
            vec![[0, 0, 0]]
        } else {
            centring.to_vec()
        };
        Self { sym_ops, cen_ops }
    }

    /// Number of operators including centring.
    pub fn order(&self) -> usize {
        self.sym_ops.len() * self.cen_ops.len()
    }

    /// Every operator: each rotation combined with each centring vector,
    /// grouped by centring vector.
    pub fn all_ops(&self) -> impl Iterator<Item = Op> + '_ {
        self.cen_ops
            .iter()
            .flat_map(|&cen| self.sym_ops.iter().map(move |op| op.translated(cen)))
    }
}
