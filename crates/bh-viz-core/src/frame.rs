//! Full-frame image synthesis.
//!
//! Every pixel goes through the same pure function: map the pixel to world
//! coordinates, rotate by the view angle, deflect through the lens, sample the
//! disk, then combine the two intensities. `FrameRenderer` owns the view state
//! and rebuilds the whole buffer on every pass.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::disk::{DiskShader, Rgb, BLACK};
use crate::lens::LensModel;
use crate::params::ParameterStore;

pub const DEFAULT_RESOLUTION: u32 = 512;
pub const DEFAULT_VIEW_ANGLE: f64 = 45.0;
/// Degrees advanced per render tick
pub const DEFAULT_ANGLE_STEP: f64 = 0.5;

/// Length unit of the world grid the pixels are mapped onto
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorldUnits {
    /// Grid spans `outer * rs * zoom` kilometres
    #[default]
    Kilometres,
    /// Grid spans `outer * zoom` Schwarzschild radii, matching the disk radii
    SchwarzschildRadii,
}

impl WorldUnits {
    pub fn toggled(self) -> Self {
        match self {
            WorldUnits::Kilometres => WorldUnits::SchwarzschildRadii,
            WorldUnits::SchwarzschildRadii => WorldUnits::Kilometres,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// Rotation around the vertical axis, in degrees [0, 360)
    pub view_angle: f64,
    pub zoom: f64,
    /// Side length of the square pixel grid
    pub resolution: u32,
    pub angle_step: f64,
    pub units: WorldUnits,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            view_angle: DEFAULT_VIEW_ANGLE,
            zoom: 1.0,
            resolution: DEFAULT_RESOLUTION,
            angle_step: DEFAULT_ANGLE_STEP,
            units: WorldUnits::default(),
        }
    }
}

impl ViewState {
    /// Advances the view angle by one step, wrapping into [0, 360).
    pub fn advance(&mut self) {
        self.view_angle = (self.view_angle + self.angle_step).rem_euclid(360.0);
    }
}

/// A square RGB8 image, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    resolution: u32,
    pixels: Vec<Rgb>,
}

impl FrameBuffer {
    pub fn new(resolution: u32) -> Self {
        let len = resolution as usize * resolution as usize;
        Self {
            resolution,
            pixels: vec![BLACK; len],
        }
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.resolution as usize + x as usize
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.pixels[self.index(x, y)]
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Tightly packed RGB bytes, suitable for texture upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Number of pixels that are not pure black.
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|p| **p != BLACK).count()
    }
}

/// Everything the per-pixel function needs, resolved once per frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext {
    lens: LensModel,
    disk: DiskShader,
    resolution: u32,
    render_radius: f64,
    view_cos: f64,
    view_sin: f64,
}

impl FrameContext {
    pub fn new(store: &ParameterStore, view: &ViewState) -> Self {
        let params = store.parameters();
        let (lens, render_radius) = match view.units {
            WorldUnits::Kilometres => (
                LensModel::new(store),
                params.disk_outer_radius * store.schwarzschild_radius() * view.zoom,
            ),
            WorldUnits::SchwarzschildRadii => (
                LensModel::in_schwarzschild_units(store),
                params.disk_outer_radius * view.zoom,
            ),
        };
        let angle = view.view_angle.to_radians();

        Self {
            lens,
            disk: DiskShader::new(store),
            resolution: view.resolution,
            render_radius,
            view_cos: angle.cos(),
            view_sin: angle.sin(),
        }
    }

    /// Maps a pixel index to a world coordinate centred on the grid midpoint.
    fn to_world(&self, index: u32) -> f64 {
        let size = self.resolution as f64;
        2.0 * (index as f64 - size / 2.0) / size * self.render_radius
    }

    /// Color of one pixel. Pure: depends only on the pixel and the context.
    pub fn shade_pixel(&self, px: u32, py: u32) -> Rgb {
        let sx = self.to_world(px);
        let sy = self.to_world(py);

        // Rotation about the vertical axis; the depth component is dropped
        // by the 2D projection.
        let rx = sx * self.view_cos;
        let ry = sy;
        let _rz = sx * self.view_sin;

        let lensed = self.lens.deflect(rx, ry);
        let disk = self.disk.sample(lensed.x, lensed.y);
        if disk.intensity <= 0.0 {
            return BLACK;
        }

        let ri = (disk.intensity * lensed.intensity).min(1.0);
        disk.color.map(|c| (c as f64 * ri).clamp(0.0, 255.0) as u8)
    }

    /// Renders a complete frame.
    pub fn render(&self) -> FrameBuffer {
        let started = Instant::now();
        let mut frame = FrameBuffer::new(self.resolution);
        let size = self.resolution as usize;

        for (y, row) in frame.pixels.chunks_mut(size.max(1)).enumerate() {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = self.shade_pixel(x as u32, y as u32);
            }
        }

        log::debug!(
            "Rendered {}x{} frame in {:?} ({} lit)",
            self.resolution,
            self.resolution,
            started.elapsed(),
            frame.lit_pixels()
        );
        frame
    }
}

/// Owns the view state and the most recent frame.
pub struct FrameRenderer {
    view: ViewState,
    frame: Arc<FrameBuffer>,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(ViewState::default())
    }
}

impl FrameRenderer {
    pub fn new(view: ViewState) -> Self {
        Self {
            frame: Arc::new(FrameBuffer::new(view.resolution)),
            view,
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn frame(&self) -> &Arc<FrameBuffer> {
        &self.frame
    }

    /// Discards the previous frame and renders a new one. The returned handle
    /// shares the renderer's buffer.
    pub fn generate_frame(&mut self, store: &ParameterStore) -> Arc<FrameBuffer> {
        self.frame = Arc::new(FrameContext::new(store, &self.view).render());
        Arc::clone(&self.frame)
    }

    /// Advances the view angle one step and renders.
    pub fn tick(&mut self, store: &ParameterStore) -> Arc<FrameBuffer> {
        self.view.advance();
        self.generate_frame(store)
    }

    /// Re-renders at the current angle.
    pub fn on_parameters_changed(&mut self, store: &ParameterStore) -> Arc<FrameBuffer> {
        self.generate_frame(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_view(units: WorldUnits) -> ViewState {
        ViewState {
            resolution: 64,
            units,
            ..Default::default()
        }
    }

    #[test]
    fn test_view_angle_after_ticks() {
        let store = ParameterStore::default();
        let mut renderer = FrameRenderer::new(ViewState {
            resolution: 4,
            ..Default::default()
        });

        for _ in 0..1000 {
            renderer.tick(&store);
        }
        let expected = (45.0 + 1000.0 * 0.5) % 360.0;
        assert!((renderer.view().view_angle - expected).abs() < 1e-9);
    }

    #[test]
    fn test_view_angle_period() {
        let mut view = ViewState::default();
        for _ in 0..720 {
            view.advance();
        }
        assert!((view.view_angle - DEFAULT_VIEW_ANGLE).abs() < 1e-9);
    }

    #[test]
    fn test_parameter_change_keeps_angle() {
        let store = ParameterStore::default();
        let mut renderer = FrameRenderer::new(small_view(WorldUnits::SchwarzschildRadii));
        renderer.on_parameters_changed(&store);
        assert_eq!(renderer.view().view_angle, DEFAULT_VIEW_ANGLE);
    }

    #[test]
    fn test_frame_dimensions() {
        let store = ParameterStore::default();
        let mut renderer = FrameRenderer::new(small_view(WorldUnits::Kilometres));
        let frame = renderer.generate_frame(&store);
        assert_eq!(frame.resolution(), 64);
        assert_eq!(frame.pixels().len(), 64 * 64);
        assert_eq!(frame.as_bytes().len(), 64 * 64 * 3);
    }

    #[test]
    fn test_pixel_index_does_not_overflow_u32() {
        // Built without allocating; only the index arithmetic is exercised
        let frame = FrameBuffer {
            resolution: 70_000,
            pixels: Vec::new(),
        };
        assert_eq!(frame.index(1, 69_999), 69_999usize * 70_000 + 1);
        assert_eq!(frame.index(69_999, 69_999), 70_000usize * 70_000 - 1);
    }

    #[test]
    fn test_generated_frame_is_shared_not_copied() {
        let store = ParameterStore::default();
        let mut renderer = FrameRenderer::new(small_view(WorldUnits::SchwarzschildRadii));
        let frame = renderer.tick(&store);
        assert!(Arc::ptr_eq(&frame, renderer.frame()));
    }

    #[test]
    fn test_schwarzschild_units_show_disk() {
        let store = ParameterStore::default();
        let mut renderer = FrameRenderer::new(small_view(WorldUnits::SchwarzschildRadii));
        let frame = renderer.generate_frame(&store);
        assert!(frame.lit_pixels() > 0);
        // The centre maps inside the lensed hole
        assert_eq!(frame.pixel(32, 32), BLACK);
    }

    #[test]
    fn test_render_matches_pure_pixel_function() {
        let store = ParameterStore::default();
        let view = small_view(WorldUnits::SchwarzschildRadii);
        let ctx = FrameContext::new(&store, &view);
        let frame = ctx.render();
        for (y, x) in [(0, 0), (10, 50), (32, 5), (63, 63), (20, 40)] {
            assert_eq!(frame.pixel(x, y), ctx.shade_pixel(x, y));
        }
    }

    #[test]
    fn test_pixel_is_disk_color_scaled_by_intensity() {
        let store = ParameterStore::default();
        let view = small_view(WorldUnits::SchwarzschildRadii);
        let ctx = FrameContext::new(&store, &view);

        let lens = LensModel::in_schwarzschild_units(&store);
        let disk = DiskShader::new(&store);
        let angle = view.view_angle.to_radians();

        for (px, py) in [(5, 32), (50, 10), (40, 40)] {
            let sx = 2.0 * (px as f64 - 32.0) / 64.0 * 20.0;
            let sy = 2.0 * (py as f64 - 32.0) / 64.0 * 20.0;
            let lensed = lens.deflect(sx * angle.cos(), sy);
            let sample = disk.sample(lensed.x, lensed.y);
            let expected = if sample.intensity > 0.0 {
                let ri = (sample.intensity * lensed.intensity).min(1.0);
                sample.color.map(|c| (c as f64 * ri) as u8)
            } else {
                BLACK
            };
            assert_eq!(ctx.shade_pixel(px, py), expected);
        }
    }
}
