// fd-core/src/units.rs
//
// Process quantities are entered in liters, grams, g/L and mg/L. The
// canonical storage is uom SI (f64). Mass concentration is carried as
// `MassDensity`; 1 g/L is exactly 1 kg/m^3.

use uom::si::f64::{Mass as UomMass, MassDensity as UomMassDensity, Volume as UomVolume};

// Public canonical unit types (SI, f64)
pub type Mass = UomMass;
pub type Concentration = UomMassDensity;
pub type Volume = UomVolume;

#[inline]
pub fn liters(v: f64) -> Volume {
    use uom::si::volume::liter;
    Volume::new::<liter>(v)
}

#[inline]
pub fn grams(v: f64) -> Mass {
    use uom::si::mass::gram;
    Mass::new::<gram>(v)
}

/// Grams per liter, stored as kg/m^3 (numerically identical).
#[inline]
pub fn g_per_l(v: f64) -> Concentration {
    use uom::si::mass_density::kilogram_per_cubic_meter;
    Concentration::new::<kilogram_per_cubic_meter>(v)
}

/// Milligrams per liter (1 mg/L is 1e-3 kg/m^3).
#[inline]
pub fn mg_per_l(v: f64) -> Concentration {
    g_per_l(v / constants::MG_PER_G)
}

#[inline]
pub fn as_liters(v: Volume) -> f64 {
    use uom::si::volume::liter;
    v.get::<liter>()
}

#[inline]
pub fn as_grams(m: Mass) -> f64 {
    use uom::si::mass::gram;
    m.get::<gram>()
}

#[inline]
pub fn as_kilograms(m: Mass) -> f64 {
    use uom::si::mass::kilogram;
    m.get::<kilogram>()
}

pub mod constants {
    /// Percent TRS to g/L: 1 % w/v is 10 g/L at near-unit density.
    pub const TRS_G_PER_L_PER_PERCENT: f64 = 10.0;

    pub const MG_PER_G: f64 = 1000.0;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tolerances, nearly_equal};

    #[test]
    fn constructors_smoke() {
        let _v = liters(238_000.0);
        let _m = grams(1.0);
        let _c = g_per_l(130.0);
        let _f = mg_per_l(220.0);
    }

    #[test]
    fn concentration_times_volume_is_mass() {
        // 220 mg/L in 1000 L is 220 g
        let m: Mass = mg_per_l(220.0) * liters(1000.0);
        assert!(nearly_equal(as_grams(m), 220.0, Tolerances::default()));
    }

    #[test]
    fn readback_round_trip() {
        let tol = Tolerances::default();
        assert!(nearly_equal(as_liters(liters(91_538.5)), 91_538.5, tol));
        assert!(nearly_equal(as_kilograms(grams(2_500.0)), 2.5, tol));
        assert!(nearly_equal(as_grams(g_per_l(180.0) * liters(2.0)), 360.0, tol));
    }
}
