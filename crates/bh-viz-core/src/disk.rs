//! Accretion disk sampling and shading.
//!
//! The color law is artistic rather than measured: a radial cooling profile
//! picks one of three temperature bands, each with its own per-channel linear
//! scaling, and a Doppler term then brightens red and dims blue (or the
//! reverse) depending on which side of the disk is sampled.

use crate::params::{ParameterStore, C, G, M_SUN};

pub type Rgb = [u8; 3];

pub const BLACK: Rgb = [0, 0, 0];

/// Lower temperature bound of the hot band (exclusive)
pub const HOT_THRESHOLD: f64 = 1e6;
/// Lower temperature bound of the mid band (exclusive)
pub const MID_THRESHOLD: f64 = 3e5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemperatureBand {
    Hot,
    Mid,
    Cool,
}

impl TemperatureBand {
    pub fn for_temperature(temp: f64) -> Self {
        if temp > HOT_THRESHOLD {
            TemperatureBand::Hot
        } else if temp > MID_THRESHOLD {
            TemperatureBand::Mid
        } else {
            TemperatureBand::Cool
        }
    }

    /// Base color before the Doppler shift, as `[red, green, blue]`.
    ///
    /// `disk_temp` is the reference temperature at the inner edge.
    pub fn base_color(self, temp: f64, disk_temp: f64) -> Rgb {
        let ratio = temp / disk_temp;
        let (red, green, blue) = match self {
            TemperatureBand::Hot => (
                120.0 * (ratio * 0.4),
                200.0 * (ratio * 0.6),
                255.0 * ratio,
            ),
            TemperatureBand::Mid => (
                80.0 * (ratio * 0.8),
                150.0 * (ratio * 1.2),
                200.0 * ratio,
            ),
            TemperatureBand::Cool => (
                220.0 * (temp / (0.5 * disk_temp)),
                120.0 * (temp / (0.5 * disk_temp)),
                80.0 * (temp / (0.3 * disk_temp)),
            ),
        };
        [channel(red), channel(green), channel(blue)]
    }
}

/// Truncates toward zero and clamps into a byte. NaN maps to 0.
fn channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Result of sampling one disk-space point
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiskSample {
    /// Radiative intensity, 0 off the disk
    pub intensity: f64,
    pub color: Rgb,
}

impl DiskSample {
    pub const EMPTY: DiskSample = DiskSample {
        intensity: 0.0,
        color: BLACK,
    };
}

#[derive(Clone, Copy, Debug)]
pub struct DiskShader {
    inner_radius: f64,
    outer_radius: f64,
    disk_temp: f64,
    doppler_factor: f64,
    /// sqrt(G * M) with M in kilograms
    sqrt_gm: f64,
}

impl DiskShader {
    pub fn new(store: &ParameterStore) -> Self {
        let params = store.parameters();
        Self {
            inner_radius: params.disk_inner_radius,
            outer_radius: params.disk_outer_radius,
            disk_temp: params.disk_temp,
            doppler_factor: params.doppler_factor,
            sqrt_gm: (G * params.mass * M_SUN).sqrt(),
        }
    }

    pub fn contains(&self, r: f64) -> bool {
        r >= self.inner_radius && r <= self.outer_radius
    }

    /// Radial cooling profile, valid on the disk.
    pub fn temperature_at(&self, r: f64) -> f64 {
        self.disk_temp * (self.inner_radius / r).powf(0.75)
    }

    /// Relativistic beaming factor at `(x, y)`; above 1 on the approaching side.
    pub fn doppler_shift(&self, x: f64, y: f64) -> f64 {
        let r = (x * x + y * y).sqrt();
        let angular_velocity = self.sqrt_gm / (r * 1000.0);
        1.0 + self.doppler_factor * angular_velocity / C * y.atan2(x).sin()
    }

    pub fn sample(&self, x: f64, y: f64) -> DiskSample {
        let r = (x * x + y * y).sqrt();
        if !self.contains(r) {
            return DiskSample::EMPTY;
        }

        let temp = self.temperature_at(r);
        let intensity = (temp / self.disk_temp).powi(4);

        let [red, green, blue] =
            TemperatureBand::for_temperature(temp).base_color(temp, self.disk_temp);
        let shift = self.doppler_shift(x, y);
        let red = channel(red as f64 * shift);
        let blue = channel(blue as f64 * (2.0 - shift));

        DiskSample {
            intensity,
            color: [red, green, blue],
        }
    }
}
