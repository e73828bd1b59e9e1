//! Bounded observation history and the chart curves derived from parameters.

use std::collections::VecDeque;

use crate::disk::DiskShader;
use crate::params::ParameterStore;

pub const MAX_SAMPLES: usize = 500;

const TEMPERATURE_CURVE_POINTS: usize = 100;
const DEFLECTION_CURVE_POINTS: usize = 200;

/// Snapshot of the model at one monitoring tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObservationSample {
    /// Schwarzschild radius (km)
    pub radius: f64,
    pub mass: f64,
    pub spin: f64,
    pub accretion_rate: f64,
    pub disk_temp: f64,
}

impl ObservationSample {
    pub fn capture(store: &ParameterStore) -> Self {
        let params = store.parameters();
        Self {
            radius: store.schwarzschild_radius(),
            mass: params.mass,
            spin: params.spin,
            accretion_rate: params.accretion_rate,
            disk_temp: params.disk_temp,
        }
    }
}

/// FIFO of samples, oldest first, never longer than its capacity.
pub struct MonitoringBuffer {
    samples: VecDeque<ObservationSample>,
    capacity: usize,
}

impl Default for MonitoringBuffer {
    fn default() -> Self {
        Self::with_capacity(MAX_SAMPLES)
    }
}

impl MonitoringBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn record_sample(&mut self, store: &ParameterStore) {
        self.push(ObservationSample::capture(store));
    }

    pub fn push(&mut self, sample: ObservationSample) {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn samples(&self) -> impl Iterator<Item = &ObservationSample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&ObservationSample> {
        self.samples.back()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

fn linspace(start: f64, end: f64, n: usize) -> impl Iterator<Item = f64> {
    let step = if n > 1 {
        (end - start) / (n - 1) as f64
    } else {
        0.0
    };
    (0..n).map(move |i| start + step * i as f64)
}

/// Curves shown by the monitor charts, recomputed from the current parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartCurves {
    /// (radius in Rs, temperature in K) across the disk
    pub temperature: Vec<(f64, f64)>,
    /// (distance in Rs, deflection in degrees)
    pub deflection: Vec<(f64, f64)>,
}

impl ChartCurves {
    pub fn compute(store: &ParameterStore) -> Self {
        let params = store.parameters();
        let shader = DiskShader::new(store);

        let temperature = linspace(
            params.disk_inner_radius,
            params.disk_outer_radius,
            TEMPERATURE_CURVE_POINTS,
        )
        .map(|r| (r, shader.temperature_at(r)))
        .collect();

        // 2 rs / (r rs): the lensing chart is plotted in horizon units, so the
        // physical scale cancels out.
        let rs_m = store.schwarzschild_radius() * 1000.0;
        let deflection = linspace(
            params.disk_inner_radius * 0.5,
            params.disk_outer_radius * 5.0,
            DEFLECTION_CURVE_POINTS,
        )
        .map(|r| (r, (2.0 * rs_m / (r * rs_m)).to_degrees()))
        .collect();

        Self {
            temperature,
            deflection,
        }
    }
}
