mod pipeline;
mod ui;
mod utils;

use bh_viz_core::{
    ChartCurves, FrameBuffer, MonitoringBuffer, ParameterStore, ParameterUpdate, Preset,
    ViewState, MONITOR_INTERVAL_MS, RENDER_INTERVAL_MS, STATUS_INTERVAL_MS,
};
use nannou::image::{DynamicImage, RgbaImage};
use nannou::prelude::*;
use nannou::winit::event::WindowEvent;
use pipeline::FramePipeline;
use std::time::{Duration, Instant};
use ui::bindings::{parse_key, Action};
use ui::control_panel::ControlPanel;
use ui::help_overlay::HelpOverlay;
use ui::monitor_panel::MonitorPanel;
use ui::starfield::Starfield;
use utils::Config;

const PANEL_WIDTH: f32 = 290.0;
const NOTIFICATION_SECS: f32 = 2.5;
const ZOOM_FACTOR: f64 = 1.25;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    nannou::app(model).update(update).run();
}

/// Which preset the current parameters came from
enum PresetLabel {
    Builtin(Preset),
    User(String),
}

impl PresetLabel {
    fn name(&self) -> &str {
        match self {
            PresetLabel::Builtin(preset) => preset.name(),
            PresetLabel::User(name) => name,
        }
    }
}

struct Notification {
    text: String,
    shown_at: f32,
}

struct Model {
    config: Config,
    store: ParameterStore,
    pipeline: FramePipeline,
    /// Last frame uploaded to the GPU, with the view it was rendered from
    texture: Option<(wgpu::Texture, ViewState)>,
    monitor: MonitoringBuffer,
    curves: ChartCurves,
    controls: ControlPanel,
    help_overlay: HelpOverlay,
    starfield: Starfield,
    preset: PresetLabel,
    status: String,
    notification: Option<Notification>,
    paused: bool,
    last_render: Instant,
    last_monitor: Instant,
    last_status: Instant,
    /// Track shift key state from raw events (more reliable than app.keys.mods)
    shift_held: bool,
}

fn model(app: &App) -> Model {
    let config = Config::load();
    let (width, height) = config.window_size();
    app.set_exit_on_escape(false);

    app.new_window()
        .title("bh-viz")
        .view(view)
        .key_pressed(key_pressed)
        .raw_event(raw_event)
        .size(width, height)
        .min_size(800, 600)
        .build()
        .unwrap();

    let mut store = ParameterStore::default();
    let mut preset = PresetLabel::Builtin(config.preset());
    if let Err(e) = config.preset().apply(&mut store) {
        log::warn!("Start-up preset rejected: {}", e);
    }
    if let Some(overrides) = config.parameters.filter(|u| !u.is_empty()) {
        match store.set_parameters(&overrides) {
            Ok(()) => preset = PresetLabel::Builtin(Preset::Custom),
            Err(e) => log::warn!("Config parameter overrides rejected: {}", e),
        }
    }

    let view = config.view();
    log::info!(
        "Rendering {}x{} frames in {:?} ({})",
        view.resolution,
        view.resolution,
        view.units,
        if config.background_render() {
            "background thread"
        } else {
            "inline"
        }
    );
    let mut pipeline = FramePipeline::new(view, config.background_render());
    pipeline.refresh(&store);

    let mut monitor = MonitoringBuffer::default();
    monitor.record_sample(&store);
    let now = Instant::now();

    Model {
        curves: ChartCurves::compute(&store),
        status: status_line(&store),
        config,
        store,
        pipeline,
        texture: None,
        monitor,
        controls: ControlPanel::new(),
        help_overlay: HelpOverlay::new(),
        starfield: Starfield::new(),
        preset,
        notification: None,
        paused: false,
        last_render: now,
        last_monitor: now,
        last_status: now,
        shift_held: false,
    }
}

fn status_line(store: &ParameterStore) -> String {
    let params = store.parameters();
    format!(
        "Mass: {:.1e} M☉ | Horizon: {:.1} km | Temp: {:.1e} K",
        params.mass,
        store.event_horizon_radius(),
        params.disk_temp
    )
}

fn frame_texture(app: &App, frame: &FrameBuffer) -> Option<wgpu::Texture> {
    let size = frame.resolution();
    let rgba: Vec<u8> = frame
        .as_bytes()
        .chunks_exact(3)
        .flat_map(|px| [px[0], px[1], px[2], 255])
        .collect();
    let image = RgbaImage::from_raw(size, size, rgba)?;
    Some(wgpu::Texture::from_image(app, &DynamicImage::ImageRgba8(image)))
}

impl Model {
    fn notify(&mut self, app: &App, text: String) {
        self.notification = Some(Notification {
            text,
            shown_at: app.time,
        });
    }

    /// Sends an update through the store; on success everything derived from
    /// the parameters is refreshed.
    fn apply_update(&mut self, app: &App, update: &ParameterUpdate) -> bool {
        match self.store.set_parameters(update) {
            Ok(()) => {
                self.on_parameters_changed();
                true
            }
            Err(e) => {
                self.notify(app, format!("Rejected: {}", e));
                false
            }
        }
    }

    fn on_parameters_changed(&mut self) {
        self.pipeline.refresh(&self.store);
        self.curves = ChartCurves::compute(&self.store);
        self.status = status_line(&self.store);
    }

    fn apply_preset(&mut self, app: &App, digit: u32) {
        if let Some(preset) = Preset::from_digit(digit) {
            match preset.apply(&mut self.store) {
                Ok(applied) => {
                    if applied {
                        self.on_parameters_changed();
                    }
                    self.preset = PresetLabel::Builtin(preset);
                    self.notify(app, format!("Preset: {}", preset));
                }
                Err(e) => self.notify(app, format!("Rejected: {}", e)),
            }
            return;
        }

        let index = digit as usize - 4;
        let Some(user) = self.config.presets.get(index) else {
            self.notify(app, format!("No preset on key {}", digit));
            return;
        };
        match user.apply(&mut self.store) {
            Ok(()) => {
                let name = user.name.clone();
                self.on_parameters_changed();
                self.notify(app, format!("Preset: {}", name));
                self.preset = PresetLabel::User(name);
            }
            Err(e) => self.notify(app, format!("Rejected: {}", e)),
        }
    }

    fn change_view(&mut self, change: impl FnOnce(&mut ViewState)) {
        change(self.pipeline.view_mut());
        self.pipeline.refresh(&self.store);
    }
}

fn update(app: &App, model: &mut Model, _update: Update) {
    let now = Instant::now();

    if now.duration_since(model.last_render) >= Duration::from_millis(RENDER_INTERVAL_MS) {
        model.last_render = now;
        model.pipeline.tick(&model.store, !model.paused);
    }

    if now.duration_since(model.last_monitor) >= Duration::from_millis(MONITOR_INTERVAL_MS) {
        model.last_monitor = now;
        model.monitor.record_sample(&model.store);
    }

    if now.duration_since(model.last_status) >= Duration::from_millis(STATUS_INTERVAL_MS) {
        model.last_status = now;
        model.status = status_line(&model.store);
        log::debug!("{}", model.status);
    }

    if let Some(ready) = model.pipeline.take_ready() {
        match frame_texture(app, &ready.frame) {
            Some(texture) => model.texture = Some((texture, ready.view)),
            None => log::warn!("Frame buffer has an unexpected size; skipped"),
        }
    }

    if let Some(n) = &model.notification {
        if app.time - n.shown_at > NOTIFICATION_SECS {
            model.notification = None;
        }
    }
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let bounds = app.window_rect();
    draw.background().color(BLACK);

    // Frame area: right of the control panel, above the monitor strip
    let strip = MonitorPanel::strip(bounds);
    let area = Rect::from_corners(
        pt2(bounds.left() + PANEL_WIDTH, strip.top()),
        pt2(bounds.right(), bounds.top() - 30.0),
    );
    let side = (area.w().min(area.h()) - 40.0).max(64.0);
    let center = area.xy();

    model
        .starfield
        .draw(&draw, bounds, center, side / bounds.w().min(bounds.h()) * 0.35);

    if let Some((texture, rendered_view)) = &model.texture {
        draw.texture(texture).xy(center).w_h(side, side);
        draw.text(&format!(
            "Rs: {:.3e} km | View angle: {:.1}°",
            model.store.schwarzschild_radius(),
            rendered_view.view_angle
        ))
        .xy(pt2(center.x, center.y - side / 2.0 - 12.0))
        .w_h(side, 18.0)
        .color(rgba(1.0, 1.0, 1.0, 0.7))
        .font_size(13);
    }

    model
        .controls
        .draw(&draw, bounds, model.store.parameters(), model.preset.name());

    MonitorPanel::draw(
        &draw,
        bounds,
        &model.curves,
        &model.monitor,
        model.store.parameters().disk_inner_radius,
    );

    let units = match model.pipeline.view().units {
        bh_viz_core::WorldUnits::Kilometres => "km",
        bh_viz_core::WorldUnits::SchwarzschildRadii => "Rs",
    };
    let status = format!(
        "{} | Zoom: {:.2} | Units: {}{}",
        model.status,
        model.pipeline.view().zoom,
        units,
        if model.paused { " | PAUSED" } else { "" }
    );
    draw.text(&status)
        .x_y(bounds.x(), bounds.top() - 15.0)
        .w_h(bounds.w() - 20.0, 20.0)
        .color(rgb(0.9, 0.9, 0.9))
        .font_size(14);

    if let Some(n) = &model.notification {
        draw.text(&n.text)
            .xy(pt2(center.x, area.top() - 30.0))
            .w_h(area.w(), 20.0)
            .color(rgb(1.0, 0.8, 0.3))
            .font_size(16);
    }

    model
        .help_overlay
        .draw(&draw, model.paused, model.config.presets.len());

    draw.to_frame(app, &frame).unwrap();
}

fn raw_event(_app: &App, model: &mut Model, event: &WindowEvent) {
    // Track shift key state from raw events for reliable modifier detection
    if let WindowEvent::ModifiersChanged(mods) = event {
        model.shift_held = mods.shift();
    }
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    let shift = model.shift_held || app.keys.mods.shift();

    match parse_key(key, shift, model.help_overlay.visible) {
        Some(Action::Quit) => app.quit(),
        Some(Action::ShowHelp) => model.help_overlay.toggle(),
        Some(Action::HideHelp) => model.help_overlay.hide(),

        Some(Action::SelectPrevious) => model.controls.move_up(),
        Some(Action::SelectNext) => model.controls.move_down(),
        Some(Action::Adjust { direction, coarse }) => {
            if let Some(update) =
                model
                    .controls
                    .adjust(model.store.parameters(), direction, coarse)
            {
                if model.apply_update(app, &update) {
                    model.preset = PresetLabel::Builtin(Preset::Custom);
                }
            }
        }

        Some(Action::ApplyPreset(digit)) => model.apply_preset(app, digit),
        Some(Action::Reset) => {
            model.store.reset();
            model.on_parameters_changed();
            model.preset = PresetLabel::Builtin(Preset::matching(model.store.parameters()));
            model.notify(app, "Parameters reset".to_string());
        }

        Some(Action::ZoomIn) => {
            model.change_view(|v| v.zoom = utils::clamp_zoom(v.zoom / ZOOM_FACTOR))
        }
        Some(Action::ZoomOut) => {
            model.change_view(|v| v.zoom = utils::clamp_zoom(v.zoom * ZOOM_FACTOR))
        }
        Some(Action::ToggleUnits) => model.change_view(|v| v.units = v.units.toggled()),
        Some(Action::TogglePause) => model.paused = !model.paused,

        None => {} // Unhandled key
    }
}
