//! Physical parameters and the quantities derived from them.
//!
//! `ParameterStore` owns the current parameter set together with its derived
//! radii. Every mutation goes through a `ParameterUpdate` (a partial set of
//! named overrides) and recomputes the derived values immediately, so readers
//! never see radii that belong to an older parameter set.

use serde::{Deserialize, Serialize};

/// Gravitational constant (m^3 kg^-1 s^-2)
pub const G: f64 = 6.67430e-11;
/// Speed of light (m/s)
pub const C: f64 = 299_792_458.0;
/// Solar mass (kg)
pub const M_SUN: f64 = 1.989e30;

/// The full physical parameter set of the model.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalParameters {
    /// Black hole mass in solar masses
    pub mass: f64,
    /// Dimensionless spin, intended range [0, 0.99]
    pub spin: f64,
    /// Accretion rate [0, 1]
    pub accretion_rate: f64,
    /// Inner disk edge, in Schwarzschild radii
    pub disk_inner_radius: f64,
    /// Outer disk edge, in Schwarzschild radii
    pub disk_outer_radius: f64,
    /// Disk temperature at the inner edge (K)
    pub disk_temp: f64,
    /// Turbulence strength [0, 1)
    pub disk_turbulence: f64,
    /// Light bending strength, intended range [0.8, 0.99]
    pub light_bending_strength: f64,
    /// Doppler beaming strength [0, 1]
    pub doppler_factor: f64,
}

impl Default for PhysicalParameters {
    fn default() -> Self {
        Self {
            mass: 4.3e6,
            spin: 0.7,
            accretion_rate: 0.01,
            disk_inner_radius: 3.0,
            disk_outer_radius: 20.0,
            disk_temp: 1e6,
            disk_turbulence: 0.15,
            light_bending_strength: 0.95,
            doppler_factor: 0.65,
        }
    }
}

impl PhysicalParameters {
    /// Returns a copy with every override in `update` applied.
    pub fn merged(&self, update: &ParameterUpdate) -> Self {
        Self {
            mass: update.mass.unwrap_or(self.mass),
            spin: update.spin.unwrap_or(self.spin),
            accretion_rate: update.accretion_rate.unwrap_or(self.accretion_rate),
            disk_inner_radius: update.disk_inner_radius.unwrap_or(self.disk_inner_radius),
            disk_outer_radius: update.disk_outer_radius.unwrap_or(self.disk_outer_radius),
            disk_temp: update.disk_temp.unwrap_or(self.disk_temp),
            disk_turbulence: update.disk_turbulence.unwrap_or(self.disk_turbulence),
            light_bending_strength: update
                .light_bending
                .unwrap_or(self.light_bending_strength),
            doppler_factor: update.doppler_effect.unwrap_or(self.doppler_factor),
        }
    }

    /// Checks the set against the physically meaningful ranges.
    pub fn validate(&self) -> Result<(), ParameterError> {
        let fields = [
            ("mass", self.mass),
            ("spin", self.spin),
            ("accretionRate", self.accretion_rate),
            ("diskInnerRadius", self.disk_inner_radius),
            ("diskOuterRadius", self.disk_outer_radius),
            ("diskTemp", self.disk_temp),
            ("diskTurbulence", self.disk_turbulence),
            ("lightBending", self.light_bending_strength),
            ("dopplerEffect", self.doppler_factor),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ParameterError::NotFinite(*name));
        }

        if self.mass <= 0.0 {
            return Err(ParameterError::OutOfRange {
                name: "mass",
                value: self.mass,
            });
        }
        // spin = 1 is the extremal Kerr limit; the horizon formula is still real
        // there but the disk model is not meant for it.
        if !(0.0..1.0).contains(&self.spin) {
            return Err(ParameterError::OutOfRange {
                name: "spin",
                value: self.spin,
            });
        }
        if !(0.0..=1.0).contains(&self.accretion_rate) {
            return Err(ParameterError::OutOfRange {
                name: "accretionRate",
                value: self.accretion_rate,
            });
        }
        if self.disk_inner_radius <= 0.0 {
            return Err(ParameterError::OutOfRange {
                name: "diskInnerRadius",
                value: self.disk_inner_radius,
            });
        }
        if self.disk_inner_radius >= self.disk_outer_radius {
            return Err(ParameterError::DiskInverted {
                inner: self.disk_inner_radius,
                outer: self.disk_outer_radius,
            });
        }
        if self.disk_temp <= 0.0 {
            return Err(ParameterError::OutOfRange {
                name: "diskTemp",
                value: self.disk_temp,
            });
        }
        if !(0.0..1.0).contains(&self.disk_turbulence) {
            return Err(ParameterError::OutOfRange {
                name: "diskTurbulence",
                value: self.disk_turbulence,
            });
        }
        if self.light_bending_strength < 0.0 {
            return Err(ParameterError::OutOfRange {
                name: "lightBending",
                value: self.light_bending_strength,
            });
        }
        if !(0.0..=1.0).contains(&self.doppler_factor) {
            return Err(ParameterError::OutOfRange {
                name: "dopplerEffect",
                value: self.doppler_factor,
            });
        }
        Ok(())
    }
}

/// A partial set of named overrides. Keys left as `None` keep their value.
///
/// Serialized keys follow the update contract (`lightBending`,
/// `dopplerEffect`, ...); snake_case aliases are accepted so the same type can
/// be read from the TOML config.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mass: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spin: Option<f64>,
    #[serde(alias = "accretion_rate", skip_serializing_if = "Option::is_none")]
    pub accretion_rate: Option<f64>,
    #[serde(alias = "disk_inner_radius", skip_serializing_if = "Option::is_none")]
    pub disk_inner_radius: Option<f64>,
    #[serde(alias = "disk_outer_radius", skip_serializing_if = "Option::is_none")]
    pub disk_outer_radius: Option<f64>,
    #[serde(alias = "disk_temp", skip_serializing_if = "Option::is_none")]
    pub disk_temp: Option<f64>,
    #[serde(alias = "disk_turbulence", skip_serializing_if = "Option::is_none")]
    pub disk_turbulence: Option<f64>,
    #[serde(alias = "light_bending", skip_serializing_if = "Option::is_none")]
    pub light_bending: Option<f64>,
    #[serde(alias = "doppler_effect", skip_serializing_if = "Option::is_none")]
    pub doppler_effect: Option<f64>,
}

impl ParameterUpdate {
    /// An update that overrides every key with the values of `params`.
    pub fn full(params: &PhysicalParameters) -> Self {
        Self {
            mass: Some(params.mass),
            spin: Some(params.spin),
            accretion_rate: Some(params.accretion_rate),
            disk_inner_radius: Some(params.disk_inner_radius),
            disk_outer_radius: Some(params.disk_outer_radius),
            disk_temp: Some(params.disk_temp),
            disk_turbulence: Some(params.disk_turbulence),
            light_bending: Some(params.light_bending_strength),
            doppler_effect: Some(params.doppler_factor),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Errors raised when an update would leave the model in a degenerate state
#[derive(Debug, Clone, PartialEq)]
pub enum ParameterError {
    NotFinite(&'static str),
    OutOfRange { name: &'static str, value: f64 },
    DiskInverted { inner: f64, outer: f64 },
}

impl std::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterError::NotFinite(name) => write!(f, "{} is not a finite number", name),
            ParameterError::OutOfRange { name, value } => {
                write!(f, "{} = {} is out of range", name, value)
            }
            ParameterError::DiskInverted { inner, outer } => write!(
                f,
                "disk inner radius {} must be smaller than outer radius {}",
                inner, outer
            ),
        }
    }
}

impl std::error::Error for ParameterError {}

/// Radii derived from the physical parameters, both in kilometres.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DerivedQuantities {
    pub schwarzschild_radius: f64,
    pub event_horizon_radius: f64,
}

impl DerivedQuantities {
    pub fn from_parameters(params: &PhysicalParameters) -> Self {
        let mass_kg = params.mass * M_SUN;
        let rs_m = 2.0 * G * mass_kg / (C * C);
        let schwarzschild_radius = rs_m / 1000.0;
        // Kerr outer horizon; NaN once spin exceeds 1
        let event_horizon_radius = schwarzschild_radius * (1.0 + (1.0 - params.spin.powi(2)).sqrt());

        Self {
            schwarzschild_radius,
            event_horizon_radius,
        }
    }
}

/// Owns the current parameter set and keeps its derived radii in step.
#[derive(Clone, Debug)]
pub struct ParameterStore {
    params: PhysicalParameters,
    derived: DerivedQuantities,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(PhysicalParameters::default())
    }
}

impl ParameterStore {
    pub fn new(params: PhysicalParameters) -> Self {
        Self {
            derived: DerivedQuantities::from_parameters(&params),
            params,
        }
    }

    /// Merges `update` into the current set after validating the result.
    ///
    /// On error the store is left untouched.
    pub fn set_parameters(&mut self, update: &ParameterUpdate) -> Result<(), ParameterError> {
        let merged = self.params.merged(update);
        if let Err(e) = merged.validate() {
            log::warn!("Rejected parameter update: {}", e);
            return Err(e);
        }
        self.replace(merged);
        Ok(())
    }

    /// Merges `update` without any range checks. Degenerate inputs produce
    /// degenerate derived values (spin > 1 gives a NaN horizon).
    pub fn set_parameters_unchecked(&mut self, update: &ParameterUpdate) {
        let merged = self.params.merged(update);
        self.replace(merged);
    }

    /// Restores the start-up parameter set.
    pub fn reset(&mut self) {
        self.replace(PhysicalParameters::default());
    }

    fn replace(&mut self, params: PhysicalParameters) {
        self.params = params;
        self.derived = DerivedQuantities::from_parameters(&self.params);
        log::debug!(
            "Parameters applied: rs = {:.3e} km, r+ = {:.3e} km",
            self.derived.schwarzschild_radius,
            self.derived.event_horizon_radius
        );
    }

    pub fn parameters(&self) -> &PhysicalParameters {
        &self.params
    }

    pub fn derived(&self) -> &DerivedQuantities {
        &self.derived
    }

    pub fn schwarzschild_radius(&self) -> f64 {
        self.derived.schwarzschild_radius
    }

    pub fn event_horizon_radius(&self) -> f64 {
        self.derived.event_horizon_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_close(a: f64, b: f64, tol: f64) -> bool {
        ((a - b) / b).abs() < tol
    }

    #[test]
    fn test_sagittarius_schwarzschild_radius() {
        let store = ParameterStore::default();
        assert!(rel_close(store.schwarzschild_radius(), 1.27e7, 0.01));
    }

    #[test]
    fn test_event_horizon_with_spin() {
        let store = ParameterStore::default();
        let expected = store.schwarzschild_radius() * (1.0 + (1.0f64 - 0.49).sqrt());
        assert!(rel_close(store.event_horizon_radius(), expected, 1e-12));
        let ratio = store.event_horizon_radius() / store.schwarzschild_radius();
        assert!((ratio - 1.714).abs() < 0.001);
    }

    #[test]
    fn test_horizon_bounds_and_monotonic_in_mass() {
        let mut store = ParameterStore::default();
        for spin in [0.0, 0.3, 0.7, 0.99] {
            let mut last = (0.0, 0.0);
            for mass in [1.0, 15.0, 1e4, 4.3e6, 6.5e9] {
                let update = ParameterUpdate {
                    mass: Some(mass),
                    spin: Some(spin),
                    ..Default::default()
                };
                store.set_parameters(&update).unwrap();
                let rs = store.schwarzschild_radius();
                let rh = store.event_horizon_radius();
                assert!(rh > 0.0 && rh <= 2.0 * rs);
                assert!(rs >= last.0 && rh >= last.1);
                last = (rs, rh);
            }
        }
    }

    #[test]
    fn test_partial_update_keeps_other_keys() {
        let mut store = ParameterStore::default();
        let update = ParameterUpdate {
            disk_temp: Some(2e6),
            ..Default::default()
        };
        store.set_parameters(&update).unwrap();

        let params = store.parameters();
        assert_eq!(params.disk_temp, 2e6);
        assert_eq!(params.mass, 4.3e6);
        assert_eq!(params.spin, 0.7);
        assert_eq!(params.light_bending_strength, 0.95);
    }

    #[test]
    fn test_derived_values_reproducible() {
        let update = ParameterUpdate {
            mass: Some(6.5e9),
            spin: Some(0.9),
            ..Default::default()
        };
        let mut a = ParameterStore::default();
        let mut b = ParameterStore::default();
        // Different history, same final parameters
        a.set_parameters(&ParameterUpdate { mass: Some(15.0), ..Default::default() })
            .unwrap();
        a.set_parameters(&update).unwrap();
        b.set_parameters(&update).unwrap();

        assert_eq!(a.derived(), b.derived());
        assert_eq!(*a.derived(), DerivedQuantities::from_parameters(a.parameters()));
    }

    #[test]
    fn test_invalid_update_leaves_store_unchanged() {
        let mut store = ParameterStore::default();
        let before = *store.parameters();

        let bad_spin = ParameterUpdate {
            mass: Some(10.0),
            spin: Some(1.2),
            ..Default::default()
        };
        assert_eq!(
            store.set_parameters(&bad_spin),
            Err(ParameterError::OutOfRange {
                name: "spin",
                value: 1.2
            })
        );

        let inverted = ParameterUpdate {
            disk_inner_radius: Some(30.0),
            ..Default::default()
        };
        assert!(matches!(
            store.set_parameters(&inverted),
            Err(ParameterError::DiskInverted { .. })
        ));

        let nan = ParameterUpdate {
            disk_temp: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(
            store.set_parameters(&nan),
            Err(ParameterError::NotFinite("diskTemp"))
        );

        assert_eq!(*store.parameters(), before);
    }

    #[test]
    fn test_unchecked_update_propagates_nan() {
        let mut store = ParameterStore::default();
        store.set_parameters_unchecked(&ParameterUpdate {
            spin: Some(1.5),
            ..Default::default()
        });
        assert!(store.event_horizon_radius().is_nan());
        assert!(store.schwarzschild_radius().is_finite());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut store = ParameterStore::default();
        store
            .set_parameters(&ParameterUpdate {
                mass: Some(15.0),
                ..Default::default()
            })
            .unwrap();
        store.reset();
        assert_eq!(*store.parameters(), PhysicalParameters::default());
    }

    #[test]
    fn test_full_update_round_trip() {
        let params = PhysicalParameters {
            mass: 15.0,
            spin: 0.85,
            ..Default::default()
        };
        let mut store = ParameterStore::default();
        store.set_parameters(&ParameterUpdate::full(&params)).unwrap();
        assert_eq!(*store.parameters(), params);
        assert!(!ParameterUpdate::full(&params).is_empty());
        assert!(ParameterUpdate::default().is_empty());
    }
}
