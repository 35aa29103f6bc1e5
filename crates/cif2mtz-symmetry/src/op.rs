//! Symmetry operators in coordinate-triplet form.

use std::fmt;

use crate::error::{Result, SymmetryError};

/// Denominator of the translation grid: 24 covers 1/2, 1/3, 1/4 and 1/6.
pub const DEN: i32 = 24;

/// Miller index triple `[h, k, l]`.
pub type Miller = [i32; 3];

/// A symmetry operator `x' = R·x + t` acting on fractional coordinates.
///
/// Row `i` of `rot` holds the x/y/z coefficients of output coordinate `i`;
/// `tran` is in units of `1/DEN` and kept in `0..DEN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Op {
    pub rot: [[i32; 3]; 3],
    pub tran: [i32; 3],
}

impl Op {
    pub const IDENTITY: Op = Op {
        rot: [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
        tran: [0, 0, 0],
    };

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn combine(&self, other: &Op) -> Op {
        let mut rot = [[0; 3]; 3];
        let mut tran = [0; 3];
        for i in 0..3 {
            for j in 0..3 {
                rot[i][j] = (0..3).map(|k| self.rot[i][k] * other.rot[k][j]).sum();
            }
            let t: i32 = (0..3).map(|k| self.rot[i][k] * other.tran[k]).sum();
            tran[i] = (t + self.tran[i]).rem_euclid(DEN);
        }
        Op { rot, tran }
    }

    /// The same rotation with `shift` added to the translation.
    pub fn translated(&self, shift: [i32; 3]) -> Op {
        let mut op = *self;
        for (t, s) in op.tran.iter_mut().zip(shift) {
            *t = (*t + s).rem_euclid(DEN);
        }
        op
    }

    /// Transform a reflection index: `h'_i = Σ_j h_j·R[j][i]`.
    pub fn apply_to_hkl(&self, hkl: Miller) -> Miller {
        let r = &self.rot;
        [0, 1, 2].map(|i| hkl[0] * r[0][i] + hkl[1] * r[1][i] + hkl[2] * r[2][i])
    }

    /// Coordinate triplet such as `-y,x-y,z+1/3`.
    pub fn triplet(&self) -> String {
        (0..3)
            .map(|i| format_component(self.rot[i], self.tran[i]))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.triplet())
    }
}

fn format_component(row: [i32; 3], tran: i32) -> String {
    let mut out = String::new();
    for (coef, axis) in row.into_iter().zip(['x', 'y', 'z']) {
        match coef {
            0 => continue,
            1 if !out.is_empty() => out.push('+'),
            1 => {}
            -1 => out.push('-'),
            c if c > 0 && !out.is_empty() => out.push_str(&format!("+{c}")),
            c => out.push_str(&c.to_string()),
        }
        out.push(axis);
    }
    if tran != 0 {
        let g = gcd(tran, DEN);
        let fraction = format!("{}/{}", tran / g, DEN / g);
        if !out.is_empty() {
            out.push('+');
        }
        out.push_str(&fraction);
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}

fn gcd(a: i32, b: i32) -> i32 {
    if b == 0 { a.abs() } else { gcd(b, a % b) }
}

/// Parse a coordinate triplet such as `-x+1/2,y,-z` (case-insensitive).
pub fn parse_triplet(s: &str) -> Result<Op> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(SymmetryError::invalid_triplet(
            s,
            format!("expected 3 components, found {}", parts.len()),
        ));
    }
    let mut op = Op {
        rot: [[0; 3]; 3],
        tran: [0; 3],
    };
    for (i, part) in parts.iter().enumerate() {
        let (row, tran) = parse_component(s, part)?;
        op.rot[i] = row;
        op.tran[i] = tran.rem_euclid(DEN);
    }
    Ok(op)
}

fn parse_component(triplet: &str, part: &str) -> Result<([i32; 3], i32)> {
    let mut row = [0; 3];
    let mut tran = 0;
    let mut sign = 1;
    let mut chars = part.chars().filter(|c| !c.is_whitespace()).peekable();
    while let Some(c) = chars.next() {
        match c.to_ascii_lowercase() {
            '+' => sign = 1,
            '-' => sign = -1,
            axis @ ('x' | 'y' | 'z') => {
                row[usize::from(axis as u8 - b'x')] += sign;
                sign = 1;
            }
            d if d.is_ascii_digit() => {
                let mut number = String::from(d);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_digit() || next == '/' {
                        number.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tran += sign * parse_fraction(triplet, &number)?;
                sign = 1;
            }
            other => {
                return Err(SymmetryError::invalid_triplet(
                    triplet,
                    format!("unexpected character '{other}'"),
                ));
            }
        }
    }
    if row == [0; 3] {
        return Err(SymmetryError::invalid_triplet(
            triplet,
            format!("component '{}' has no x, y or z", part.trim()),
        ));
    }
    Ok((row, tran))
}

/// A fraction `n/d` (or integer `n`) converted to `1/DEN` units.
fn parse_fraction(triplet: &str, text: &str) -> Result<i32> {
    let bad = || SymmetryError::invalid_triplet(triplet, format!("bad translation '{text}'"));
    let (num, den) = match text.split_once('/') {
        Some((n, d)) => (
            n.parse::<i32>().map_err(|_| bad())?,
            d.parse::<i32>().map_err(|_| bad())?,
        ),
        None => (text.parse::<i32>().map_err(|_| bad())?, 1),
    };
    if den == 0 || (num * DEN) % den != 0 {
        return Err(SymmetryError::invalid_triplet(
            triplet,
            format!("translation '{text}' is not a multiple of 1/{DEN}"),
        ));
    }
    Ok(num * DEN / den)
}
