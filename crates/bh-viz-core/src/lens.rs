//! Closed-form gravitational lensing.
//!
//! Maps a screen-space coordinate to the disk-space coordinate it "sees",
//! plus an attenuation factor. This is a radial approximation of light bending,
//! not an integrated geodesic.

use crate::params::ParameterStore;

/// Radius floor that keeps the deflection finite at the origin
pub const MIN_RADIUS: f64 = 1e-10;

/// Result of deflecting one screen coordinate
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deflection {
    pub x: f64,
    pub y: f64,
    /// Attenuation in (0, 1], decreasing with distance from the hole
    pub intensity: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct LensModel {
    light_bending_strength: f64,
    /// Schwarzschild radius expressed in the caller's length unit
    schwarzschild_radius: f64,
    disk_inner_radius: f64,
}

impl LensModel {
    /// Lens for coordinates in kilometres.
    pub fn new(store: &ParameterStore) -> Self {
        Self::with_radius(store, store.schwarzschild_radius())
    }

    /// Lens for coordinates measured in Schwarzschild radii (rs = 1).
    pub fn in_schwarzschild_units(store: &ParameterStore) -> Self {
        Self::with_radius(store, 1.0)
    }

    fn with_radius(store: &ParameterStore, schwarzschild_radius: f64) -> Self {
        let params = store.parameters();
        Self {
            light_bending_strength: params.light_bending_strength,
            schwarzschild_radius,
            disk_inner_radius: params.disk_inner_radius,
        }
    }

    /// Angular deflection for a ray passing at distance `r`.
    pub fn deflection_angle(&self, r: f64) -> f64 {
        self.light_bending_strength * 2.0 * self.schwarzschild_radius / r.max(MIN_RADIUS)
    }

    pub fn deflect(&self, x: f64, y: f64) -> Deflection {
        let r = (x * x + y * y).sqrt().max(MIN_RADIUS);
        let deflection_angle = self.deflection_angle(r);

        let theta = y.atan2(x);
        let lensed_x = x - deflection_angle * theta.cos() * r;
        let lensed_y = y - deflection_angle * theta.sin() * r;

        let intensity = 1.0 - (r / self.disk_inner_radius).atan() * 0.5;

        Deflection {
            x: lensed_x,
            y: lensed_y,
            intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParameterUpdate;

    #[test]
    fn test_intensity_non_increasing_with_radius() {
        let store = ParameterStore::default();
        let lens = LensModel::new(&store);

        let mut last = f64::INFINITY;
        for i in 0..200 {
            let r = i as f64 * 0.37;
            let d = lens.deflect(r * 0.6, r * 0.8);
            assert!(d.intensity <= last, "intensity rose at r = {}", r);
            assert!(d.intensity > 0.0 && d.intensity <= 1.0);
            last = d.intensity;
        }
    }

    #[test]
    fn test_origin_is_finite() {
        let store = ParameterStore::default();
        let d = LensModel::new(&store).deflect(0.0, 0.0);
        assert!(d.x.is_finite() && d.y.is_finite());
        assert!(d.intensity > 0.999_999);
    }

    #[test]
    fn test_deflection_pulls_towards_centre_by_constant_offset() {
        let store = ParameterStore::default();
        let lens = LensModel::in_schwarzschild_units(&store);

        // alpha * r = 2 * 0.95 * rs, independent of r
        let d = lens.deflect(10.0, 0.0);
        assert!((d.x - (10.0 - 1.9)).abs() < 1e-12);
        assert!(d.y.abs() < 1e-12);

        let d = lens.deflect(0.0, -4.0);
        assert!((d.y - (-4.0 + 1.9)).abs() < 1e-12);
    }

    #[test]
    fn test_bending_strength_scales_deflection() {
        let mut store = ParameterStore::default();
        store
            .set_parameters(&ParameterUpdate {
                light_bending: Some(0.8),
                ..Default::default()
            })
            .unwrap();
        let weak = LensModel::new(&store).deflection_angle(1e8);
        store
            .set_parameters(&ParameterUpdate {
                light_bending: Some(0.99),
                ..Default::default()
            })
            .unwrap();
        let strong = LensModel::new(&store).deflection_angle(1e8);
        assert!(strong > weak);
        assert!((strong / weak - 0.99 / 0.8).abs() < 1e-12);
    }
}
