// SPDX-License-Identifier: AGPL-3.0-only

//! Scalar two-sphere lubrication functions.
//!
//! Near contact (`r ≤ 2.1`) the functions follow their logarithmic
//! asymptotics in the gap `ξ = r − 2` (Jeffrey & Onishi 1984, Jeffrey 1992).
//! Further out they are interpolated from a [`LubricationTable`].
//!
//! [`LubricationTable`]: super::LubricationTable

/// Resistance scalars of one pair. `11` couples a sphere to itself, `12` to
/// its partner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LubricationFunctions {
    pub x11a: f64,
    pub x12a: f64,
    pub y11a: f64,
    pub y12a: f64,
    pub y11b: f64,
    pub y12b: f64,
    pub x11c: f64,
    pub x12c: f64,
    pub y11c: f64,
    pub y12c: f64,
    pub x11g: f64,
    pub x12g: f64,
    pub y11g: f64,
    pub y12g: f64,
    pub y11h: f64,
    pub y12h: f64,
    pub xm: f64,
    pub ym: f64,
    pub zm: f64,
}

impl LubricationFunctions {
    /// Asymptotic forms at dimensionless separation `r` (`2 < r ≤ 2.1`).
    #[must_use]
    pub fn near_contact(r: f64) -> Self {
        let xi = r - 2.0;
        let xi1 = 1.0 / xi;
        let dlx = xi1.ln();
        let xdlx = xi * dlx;
        let dlx1 = dlx + xdlx;

        let csa1 = dlx / 6.0;
        let csa2 = xdlx / 6.0;
        let csa3 = dlx1 / 6.0;
        let csa4 = 0.25 * xi1 + 0.225 * dlx;
        let csa5 = dlx / 15.0;

        let x11a = csa4 - 1.23041 + 3.0 / 112.0 * xdlx + 1.8918 * xi;
        let y11a = csa1 - 0.39394 + 0.95665 * xi;
        let y11b = -csa1 + 0.408286 - xdlx / 12.0 - 0.84055 * xi;

        let csg1 = csa4 + 39.0 / 280.0 * xdlx;
        let csg2 = dlx / 12.0 + xdlx / 24.0;

        Self {
            x11a,
            x12a: -x11a + 0.00312 - 0.0011 * xi,
            y11a,
            y12a: -y11a + 0.00463606 - 0.007049 * xi,
            y11b,
            y12b: -y11b + 0.00230818 - 0.007508 * xi,
            x11c: 0.0479 - csa2 + 0.12494 * xi,
            x12c: -0.031031 + csa2 - 0.174476 * xi,
            y11c: 4.0 * csa5 - 0.605434 + 94.0 / 375.0 * xdlx + 0.939139 * xi,
            y12c: csa5 - 0.212032 + 31.0 / 375.0 * xdlx + 0.452843 * xi,
            x11g: csg1 - 1.16897 + 1.47882 * xi,
            x12g: -csg1 + 1.178967 - 1.480493 * xi,
            y11g: csg2 - 0.2041 + 0.442226 * xi,
            y12g: -csg2 + 0.216365 - 0.469830 * xi,
            y11h: 0.5 * csa5 - 0.143777 + 137.0 / 1500.0 * xdlx + 0.264207 * xi,
            y12h: 2.0 * csa5 - 0.298166 + 113.0 / 1500.0 * xdlx + 0.534123 * xi,
            xm: 1.0 / 3.0 * xi1 + 0.3 * dlx - 1.48163 + 0.335714 * xdlx + 1.413604 * xi,
            ym: csa3 - 0.423489 + 0.827286 * xi,
            zm: 0.0129151 - 0.042284 * xi,
        }
    }

    /// Every function multiplied by `w`.
    #[must_use]
    pub fn scaled(&self, w: f64) -> Self {
        Self {
            x11a: self.x11a * w,
            x12a: self.x12a * w,
            y11a: self.y11a * w,
            y12a: self.y12a * w,
            y11b: self.y11b * w,
            y12b: self.y12b * w,
            x11c: self.x11c * w,
            x12c: self.x12c * w,
            y11c: self.y11c * w,
            y12c: self.y12c * w,
            x11g: self.x11g * w,
            x12g: self.x12g * w,
            y11g: self.y11g * w,
            y12g: self.y12g * w,
            y11h: self.y11h * w,
            y12h: self.y12h * w,
            xm: self.xm * w,
            ym: self.ym * w,
            zm: self.zm * w,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squeeze_terms_diverge_toward_contact() {
        let far = LubricationFunctions::near_contact(2.1);
        let near = LubricationFunctions::near_contact(2.001);
        assert!(near.x11a > far.x11a);
        assert!(near.x11a > 200.0);
        assert!(near.xm > far.xm);
    }

    #[test]
    fn pair_terms_oppose_self_terms() {
        let f = LubricationFunctions::near_contact(2.01);
        assert!(f.x11a > 0.0 && f.x12a < 0.0);
        assert!((f.x11a + f.x12a).abs() < 0.01);
        assert!((f.y11a + f.y12a).abs() < 0.01);
    }

    #[test]
    fn scaling_by_zero_clears_everything() {
        let f = LubricationFunctions::near_contact(2.05).scaled(0.0);
        assert_eq!(f.x11a, 0.0);
        assert_eq!(f.zm, 0.0);
    }
}
