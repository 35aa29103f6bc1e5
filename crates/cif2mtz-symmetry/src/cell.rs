//! Unit cell parameters.

use crate::op::Miller;

/// Unit cell: edge lengths in Å, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitCell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Default for UnitCell {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0, 90.0, 90.0, 90.0)
    }
}

impl UnitCell {
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
    }

    /// The six parameters in `a b c alpha beta gamma` order.
    pub fn parameters(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.alpha, self.beta, self.gamma]
    }

    /// True when the cell was actually set (not the 1 Å placeholder) and
    /// describes a real lattice.
    pub fn is_crystal(&self) -> bool {
        let lengths_ok = self.a > 0.0 && self.b > 0.0 && self.c > 0.0;
        let angles_ok = [self.alpha, self.beta, self.gamma]
            .iter()
            .all(|&x| x > 0.0 && x < 180.0);
        lengths_ok && angles_ok && *self != Self::default() && self.volume() > 0.0
    }

    /// Cell volume in Å³ (zero or NaN for degenerate parameters).
    pub fn volume(&self) -> f64 {
        let (ca, cb, cg) = (
            self.alpha.to_radians().cos(),
            self.beta.to_radians().cos(),
            self.gamma.to_radians().cos(),
        );
        let v2 = 1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg;
        self.a * self.b * self.c * v2.max(0.0).sqrt()
    }

    /// `1/d²` of a reflection, from the reciprocal metric tensor.
    pub fn calculate_1_d2(&self, hkl: Miller) -> f64 {
        let g = self.reciprocal_metric();
        let h = hkl.map(f64::from);
        h.iter()
            .zip(&g)
            .map(|(hi, row)| hi * row.iter().zip(&h).map(|(gij, hj)| gij * hj).sum::<f64>())
            .sum()
    }

    /// Inverse of the direct metric tensor.
    fn reciprocal_metric(&self) -> [[f64; 3]; 3] {
        let (ca, cb, cg) = (
            self.alpha.to_radians().cos(),
            self.beta.to_radians().cos(),
            self.gamma.to_radians().cos(),
        );
        let g = [
            [self.a * self.a, self.a * self.b * cg, self.a * self.c * cb],
            [self.a * self.b * cg, self.b * self.b, self.b * self.c * ca],
            [self.a * self.c * cb, self.b * self.c * ca, self.c * self.c],
        ];
        let cof = |r0: usize, r1: usize, c0: usize, c1: usize| {
            g[r0][c0] * g[r1][c1] - g[r0][c1] * g[r1][c0]
        };
        let adj = [
            [cof(1, 2, 1, 2), -cof(0, 2, 1, 2), cof(0, 1, 1, 2)],
            [-cof(1, 2, 0, 2), cof(0, 2, 0, 2), -cof(0, 1, 0, 2)],
            [cof(1, 2, 0, 1), -cof(0, 2, 0, 1), cof(0, 1, 0, 1)],
        ];
        let det = g[0][0] * adj[0][0] + g[0][1] * adj[1][0] + g[0][2] * adj[2][0];
        adj.map(|row| row.map(|x| x / det))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_orthorhombic_resolution() {
        let cell = UnitCell::new(10.0, 20.0, 40.0, 90.0, 90.0, 90.0);
        assert!(close(cell.calculate_1_d2([1, 0, 0]), 0.01));
        assert!(close(cell.calculate_1_d2([0, 2, 0]), 0.01));
        assert!(close(cell.calculate_1_d2([1, 2, 4]), 0.03));
    }

    #[test]
    fn test_hexagonal_resolution() {
        // 1/d² = 4/3 (h² + hk + k²)/a² + l²/c²
        let cell = UnitCell::new(50.0, 50.0, 80.0, 90.0, 90.0, 120.0);
        let expected = 4.0 / 3.0 * (1.0 + 2.0 + 4.0) / 2500.0 + 9.0 / 6400.0;
        assert!((cell.calculate_1_d2([1, 2, 3]) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_monoclinic_volume() {
        let cell = UnitCell::new(10.0, 10.0, 10.0, 90.0, 120.0, 90.0);
        assert!((cell.volume() - 1000.0 * 60f64.to_radians().sin()).abs() < 1e-9);
    }

    #[test]
    fn test_placeholder_cell_is_not_crystal() {
        assert!(!UnitCell::default().is_crystal());
        assert!(UnitCell::new(52.1, 63.4, 71.9, 90.0, 90.0, 90.0).is_crystal());
        assert!(!UnitCell::new(52.1, 0.0, 71.9, 90.0, 90.0, 90.0).is_crystal());
    }
}
