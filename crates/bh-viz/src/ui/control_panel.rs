//! Parameter knobs listed on the left of the window.
//!
//! Each knob maps to one key of the update contract. Adjusting a knob only
//! produces a `ParameterUpdate`; the store decides whether to accept it.

use bh_viz_core::{ParameterUpdate, PhysicalParameters};
use nannou::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Scale {
    Linear,
    /// Steps are applied to log10 of the value
    Log,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Knob {
    Mass,
    Spin,
    AccretionRate,
    DiskInnerRadius,
    DiskOuterRadius,
    DiskTemp,
    DiskTurbulence,
    LightBending,
    DopplerEffect,
}

impl Knob {
    pub const ALL: [Knob; 9] = [
        Knob::Mass,
        Knob::Spin,
        Knob::AccretionRate,
        Knob::DiskInnerRadius,
        Knob::DiskOuterRadius,
        Knob::DiskTemp,
        Knob::DiskTurbulence,
        Knob::LightBending,
        Knob::DopplerEffect,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Knob::Mass => "Mass (M☉)",
            Knob::Spin => "Spin",
            Knob::AccretionRate => "Accretion rate",
            Knob::DiskInnerRadius => "Disk inner (Rs)",
            Knob::DiskOuterRadius => "Disk outer (Rs)",
            Knob::DiskTemp => "Disk temp (K)",
            Knob::DiskTurbulence => "Turbulence",
            Knob::LightBending => "Light bending",
            Knob::DopplerEffect => "Doppler",
        }
    }

    /// `(min, max, step, scale)`
    pub fn range(self) -> (f64, f64, f64, Scale) {
        match self {
            Knob::Mass => (1e4, 1e10, 0.1, Scale::Log),
            Knob::Spin => (0.0, 0.99, 0.01, Scale::Linear),
            Knob::AccretionRate => (0.0, 1.0, 0.01, Scale::Linear),
            Knob::DiskInnerRadius => (1.0, 10.0, 0.1, Scale::Linear),
            Knob::DiskOuterRadius => (5.0, 50.0, 0.5, Scale::Linear),
            Knob::DiskTemp => (1e4, 1e8, 0.1, Scale::Log),
            Knob::DiskTurbulence => (0.0, 0.9, 0.01, Scale::Linear),
            Knob::LightBending => (0.8, 0.99, 0.01, Scale::Linear),
            Knob::DopplerEffect => (0.0, 1.0, 0.01, Scale::Linear),
        }
    }

    pub fn value(self, params: &PhysicalParameters) -> f64 {
        match self {
            Knob::Mass => params.mass,
            Knob::Spin => params.spin,
            Knob::AccretionRate => params.accretion_rate,
            Knob::DiskInnerRadius => params.disk_inner_radius,
            Knob::DiskOuterRadius => params.disk_outer_radius,
            Knob::DiskTemp => params.disk_temp,
            Knob::DiskTurbulence => params.disk_turbulence,
            Knob::LightBending => params.light_bending_strength,
            Knob::DopplerEffect => params.doppler_factor,
        }
    }

    pub fn format(self, value: f64) -> String {
        match self.range().3 {
            Scale::Log => format!("{:.2e}", value),
            Scale::Linear => format!("{:.2}", value),
        }
    }

    /// The value after `direction` steps (x10 when coarse), clamped to the range.
    pub fn stepped(self, value: f64, direction: f64, coarse: bool) -> f64 {
        let (min, max, step, scale) = self.range();
        let step = if coarse { step * 10.0 } else { step };
        let next = match scale {
            Scale::Linear => value + step * direction,
            Scale::Log => 10f64.powf(value.max(min).log10() + step * direction),
        };
        // Round away float drift from repeated linear steps
        let next = match scale {
            Scale::Linear => (next * 1e4).round() / 1e4,
            Scale::Log => next,
        };
        next.clamp(min, max)
    }

    pub fn update(self, value: f64) -> ParameterUpdate {
        let mut update = ParameterUpdate::default();
        let slot = match self {
            Knob::Mass => &mut update.mass,
            Knob::Spin => &mut update.spin,
            Knob::AccretionRate => &mut update.accretion_rate,
            Knob::DiskInnerRadius => &mut update.disk_inner_radius,
            Knob::DiskOuterRadius => &mut update.disk_outer_radius,
            Knob::DiskTemp => &mut update.disk_temp,
            Knob::DiskTurbulence => &mut update.disk_turbulence,
            Knob::LightBending => &mut update.light_bending,
            Knob::DopplerEffect => &mut update.doppler_effect,
        };
        *slot = Some(value);
        update
    }
}

pub struct ControlPanel {
    selected: usize,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    pub fn selected(&self) -> Knob {
        Knob::ALL[self.selected]
    }

    pub fn move_up(&mut self) {
        self.selected = (self.selected + Knob::ALL.len() - 1) % Knob::ALL.len();
    }

    pub fn move_down(&mut self) {
        self.selected = (self.selected + 1) % Knob::ALL.len();
    }

    /// Update for one step of the selected knob, or `None` at the range limit.
    pub fn adjust(
        &self,
        params: &PhysicalParameters,
        direction: f64,
        coarse: bool,
    ) -> Option<ParameterUpdate> {
        let knob = self.selected();
        let current = knob.value(params);
        let next = knob.stepped(current, direction, coarse);
        if next == current {
            return None;
        }
        Some(knob.update(next))
    }

    pub fn draw(&self, draw: &Draw, bounds: Rect, params: &PhysicalParameters, preset: &str) {
        let width = 260.0;
        let line_height = 22.0;
        let font_size = 14;
        let left = bounds.left() + 15.0;
        let top = bounds.top() - 20.0;

        draw.text(&format!("Preset: {}", preset))
            .x_y(left + width / 2.0, top)
            .w_h(width, line_height)
            .left_justify()
            .color(rgb(1.0, 0.7, 0.4))
            .font_size(font_size);

        for (i, knob) in Knob::ALL.iter().enumerate() {
            let y = top - (i as f32 + 1.5) * line_height;
            let selected = i == self.selected;

            if selected {
                draw.rect()
                    .x_y(left + width / 2.0 - 5.0, y)
                    .w_h(width + 10.0, line_height)
                    .color(rgba(1.0, 0.6, 0.2, 0.2));
            }

            let color = if selected {
                rgb(1.0, 0.85, 0.6)
            } else {
                rgb(0.75, 0.75, 0.75)
            };

            draw.text(knob.label())
                .x_y(left + width * 0.3, y)
                .w_h(width * 0.6, line_height)
                .left_justify()
                .color(color)
                .font_size(font_size);

            draw.text(&knob.format(knob.value(params)))
                .x_y(left + width * 0.8, y)
                .w_h(width * 0.4, line_height)
                .right_justify()
                .color(color)
                .font_size(font_size);
        }
    }
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self::new()
    }
}
