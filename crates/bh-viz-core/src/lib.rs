//! Core model for the black hole visualizer
//!
//! Physical parameters and their derived radii, the closed-form lens and disk
//! shading, full-frame rendering (inline or on a worker thread), presets and
//! the monitoring history. Nothing here depends on a window or GPU.

pub mod disk;
pub mod frame;
pub mod lens;
pub mod monitor;
pub mod params;
pub mod presets;
pub mod worker;

pub use disk::{DiskSample, DiskShader, Rgb, TemperatureBand};
pub use frame::{FrameBuffer, FrameContext, FrameRenderer, ViewState, WorldUnits};
pub use lens::{Deflection, LensModel};
pub use monitor::{ChartCurves, MonitoringBuffer, ObservationSample, MAX_SAMPLES};
pub use params::{
    DerivedQuantities, ParameterError, ParameterStore, ParameterUpdate, PhysicalParameters,
};
pub use presets::{NamedPreset, Preset};
pub use worker::{PublishedFrame, RenderJob, RenderWorker};

/// Milliseconds between rendered frames
pub const RENDER_INTERVAL_MS: u64 = 100;
/// Milliseconds between monitoring samples
pub const MONITOR_INTERVAL_MS: u64 = 500;
/// Milliseconds between status line refreshes
pub const STATUS_INTERVAL_MS: u64 = 1000;
