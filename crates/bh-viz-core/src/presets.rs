//! Named parameter bundles for well-known black holes.

use serde::{Deserialize, Serialize};

use crate::params::{ParameterError, ParameterStore, ParameterUpdate, PhysicalParameters};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    #[default]
    SagittariusA,
    M87,
    CygnusX1,
    /// Keeps whatever values are currently set
    Custom,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::SagittariusA,
        Preset::M87,
        Preset::CygnusX1,
        Preset::Custom,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::SagittariusA => "Sagittarius A*",
            Preset::M87 => "M87*",
            Preset::CygnusX1 => "Cygnus X-1",
            Preset::Custom => "Custom",
        }
    }

    pub fn parameters(self) -> Option<PhysicalParameters> {
        let params = match self {
            Preset::SagittariusA => PhysicalParameters {
                mass: 4.3e6,
                spin: 0.65,
                accretion_rate: 0.005,
                disk_inner_radius: 3.0,
                disk_outer_radius: 30.0,
                disk_temp: 1e6,
                disk_turbulence: 0.15,
                light_bending_strength: 0.92,
                doppler_factor: 0.6,
            },
            Preset::M87 => PhysicalParameters {
                mass: 6.5e9,
                spin: 0.90,
                accretion_rate: 0.08,
                disk_inner_radius: 5.0,
                disk_outer_radius: 40.0,
                disk_temp: 5e6,
                disk_turbulence: 0.25,
                light_bending_strength: 0.97,
                doppler_factor: 0.75,
            },
            Preset::CygnusX1 => PhysicalParameters {
                mass: 15.0,
                spin: 0.85,
                accretion_rate: 0.2,
                disk_inner_radius: 2.5,
                disk_outer_radius: 15.0,
                disk_temp: 3e6,
                disk_turbulence: 0.20,
                light_bending_strength: 0.93,
                doppler_factor: 0.7,
            },
            Preset::Custom => return None,
        };
        Some(params)
    }

    pub fn update(self) -> Option<ParameterUpdate> {
        self.parameters().map(|p| ParameterUpdate::full(&p))
    }

    /// Applies the bundle to `store`. Returns whether anything was applied.
    pub fn apply(self, store: &mut ParameterStore) -> Result<bool, ParameterError> {
        match self.update() {
            Some(update) => {
                store.set_parameters(&update)?;
                log::info!("Preset applied: {}", self.name());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// The built-in preset whose bundle equals `params`, otherwise Custom.
    pub fn matching(params: &PhysicalParameters) -> Self {
        Preset::ALL
            .into_iter()
            .find(|p| p.parameters().as_ref() == Some(params))
            .unwrap_or(Preset::Custom)
    }

    /// Preset bound to a number key (0 = Custom).
    pub fn from_digit(digit: u32) -> Option<Self> {
        match digit {
            1 => Some(Preset::SagittariusA),
            2 => Some(Preset::M87),
            3 => Some(Preset::CygnusX1),
            0 => Some(Preset::Custom),
            _ => None,
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A user-declared preset; only the keys it names are overridden.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedPreset {
    pub name: String,
    #[serde(flatten)]
    pub update: ParameterUpdate,
}

impl NamedPreset {
    pub fn apply(&self, store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.set_parameters(&self.update)?;
        log::info!("Preset applied: {}", self.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets_are_valid() {
        for preset in Preset::ALL {
            if let Some(params) = preset.parameters() {
                assert_eq!(params.validate(), Ok(()), "{}", preset);
            }
        }
    }

    #[test]
    fn test_apply_goes_through_update_contract() {
        let mut store = ParameterStore::default();
        assert_eq!(Preset::M87.apply(&mut store), Ok(true));
        assert_eq!(store.parameters().mass, 6.5e9);
        assert_eq!(store.parameters().doppler_factor, 0.75);
        assert_eq!(
            *store.derived(),
            crate::params::DerivedQuantities::from_parameters(store.parameters())
        );
    }

    #[test]
    fn test_custom_keeps_current_values() {
        let mut store = ParameterStore::default();
        Preset::CygnusX1.apply(&mut store).unwrap();
        let before = *store.parameters();
        assert_eq!(Preset::Custom.apply(&mut store), Ok(false));
        assert_eq!(*store.parameters(), before);
    }

    #[test]
    fn test_matching_names_only_exact_bundles() {
        // Start-up defaults are close to Sgr A* but not its bundle
        assert_eq!(Preset::matching(&PhysicalParameters::default()), Preset::Custom);

        let mut store = ParameterStore::default();
        store.reset();
        assert_eq!(Preset::matching(store.parameters()), Preset::Custom);

        for preset in [Preset::SagittariusA, Preset::M87, Preset::CygnusX1] {
            preset.apply(&mut store).unwrap();
            assert_eq!(Preset::matching(store.parameters()), preset);
        }
    }

    #[test]
    fn test_digit_mapping() {
        assert_eq!(Preset::from_digit(1), Some(Preset::SagittariusA));
        assert_eq!(Preset::from_digit(3), Some(Preset::CygnusX1));
        assert_eq!(Preset::from_digit(0), Some(Preset::Custom));
        assert_eq!(Preset::from_digit(7), None);
    }

    #[test]
    fn test_named_preset_partial_override() {
        let preset: NamedPreset =
            toml::from_str("name = \"Tiny\"\nmass = 10.0\ndisk_temp = 2e6\n").unwrap();
        assert_eq!(preset.name, "Tiny");

        let mut store = ParameterStore::default();
        preset.apply(&mut store).unwrap();
        assert_eq!(store.parameters().mass, 10.0);
        assert_eq!(store.parameters().disk_temp, 2e6);
        assert_eq!(store.parameters().spin, 0.7);
    }
}
