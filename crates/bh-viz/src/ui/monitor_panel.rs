//! Monitor strip along the bottom of the window.

use bh_viz_core::{ChartCurves, MonitoringBuffer};
use nannou::prelude::*;

const STRIP_HEIGHT: f32 = 170.0;
const CHART_PADDING: f32 = 18.0;

/// Maps data points into `rect`, scaling both axes to the data extent.
/// Non-positive values are dropped when `log_y` is set.
pub fn chart_points(points: &[(f64, f64)], rect: Rect, log_y: bool) -> Vec<Point2> {
    let transformed: Vec<(f64, f64)> = points
        .iter()
        .filter(|(x, y)| x.is_finite() && y.is_finite() && (!log_y || *y > 0.0))
        .map(|&(x, y)| (x, if log_y { y.log10() } else { y }))
        .collect();
    if transformed.is_empty() {
        return Vec::new();
    }

    let (min_x, max_x) = extent(transformed.iter().map(|p| p.0));
    let (min_y, max_y) = extent(transformed.iter().map(|p| p.1));

    transformed
        .iter()
        .map(|&(x, y)| {
            let tx = normalize(x, min_x, max_x);
            let ty = normalize(y, min_y, max_y);
            pt2(
                rect.left() + tx as f32 * rect.w(),
                rect.bottom() + ty as f32 * rect.h(),
            )
        })
        .collect()
}

fn extent(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    })
}

fn normalize(v: f64, min: f64, max: f64) -> f64 {
    if max > min {
        (v - min) / (max - min)
    } else {
        0.5
    }
}

pub struct MonitorPanel;

impl MonitorPanel {
    /// Area the strip occupies, for layout of the frame above it.
    pub fn strip(bounds: Rect) -> Rect {
        Rect::from_x_y_w_h(
            bounds.x(),
            bounds.bottom() + STRIP_HEIGHT / 2.0,
            bounds.w(),
            STRIP_HEIGHT,
        )
    }

    pub fn draw(
        draw: &Draw,
        bounds: Rect,
        curves: &ChartCurves,
        history: &MonitoringBuffer,
        inner_radius: f64,
    ) {
        let strip = Self::strip(bounds);
        draw.rect()
            .xy(strip.xy())
            .wh(strip.wh())
            .color(rgba(0.0, 0.0, 0.0, 0.75));

        let chart_w = strip.w() / 3.0;
        let slot = |i: f32| {
            Rect::from_x_y_w_h(
                strip.left() + chart_w * (i + 0.5),
                strip.y() - 6.0,
                chart_w - CHART_PADDING * 2.0,
                strip.h() - CHART_PADDING * 3.0,
            )
        };

        Self::chart(
            draw,
            slot(0.0),
            "Disk temperature (log K) vs r",
            &chart_points(&curves.temperature, slot(0.0), true),
            rgb(1.0, 0.55, 0.2),
        );

        let deflection_rect = slot(1.0);
        Self::chart(
            draw,
            deflection_rect,
            "Light deflection (deg) vs distance",
            &chart_points(&curves.deflection, deflection_rect, false),
            rgb(0.4, 0.75, 1.0),
        );
        Self::horizon_marker(draw, deflection_rect, &curves.deflection, inner_radius);

        Self::readout(draw, slot(2.0), history);
    }

    fn chart(draw: &Draw, rect: Rect, title: &str, points: &[Point2], color: Rgb) {
        draw.rect()
            .xy(rect.xy())
            .wh(rect.wh())
            .no_fill()
            .stroke(rgba(1.0, 1.0, 1.0, 0.2))
            .stroke_weight(1.0);

        draw.text(title)
            .x_y(rect.x(), rect.top() + 10.0)
            .w_h(rect.w(), 16.0)
            .color(rgba(1.0, 1.0, 1.0, 0.7))
            .font_size(12);

        if points.len() > 1 {
            draw.polyline()
                .weight(1.5)
                .points(points.iter().copied())
                .color(color);
        }
    }

    fn horizon_marker(draw: &Draw, rect: Rect, curve: &[(f64, f64)], inner_radius: f64) {
        let (min_x, max_x) = extent(curve.iter().map(|p| p.0));
        if !(inner_radius >= min_x && inner_radius <= max_x) {
            return;
        }
        let x = rect.left() + normalize(inner_radius, min_x, max_x) as f32 * rect.w();

        draw.line()
            .start(pt2(x, rect.bottom()))
            .end(pt2(x, rect.top()))
            .weight(1.0)
            .color(rgba(1.0, 0.3, 0.3, 0.8));
        draw.text("Event Horizon")
            .x_y(x + 45.0, rect.top() - 10.0)
            .w_h(90.0, 14.0)
            .left_justify()
            .color(rgba(1.0, 0.3, 0.3, 0.9))
            .font_size(11);
    }

    fn readout(draw: &Draw, rect: Rect, history: &MonitoringBuffer) {
        let Some(latest) = history.latest() else {
            return;
        };

        let lines = [
            format!("Mass: {:.2e} M☉", latest.mass),
            format!("Spin: {:.2}", latest.spin),
            format!("Temperature: {:.2e} K", latest.disk_temp),
            format!("Accretion: {:.3}", latest.accretion_rate),
            format!("Rs: {:.3e} km", latest.radius),
            format!("Samples: {}", history.len()),
        ];

        let line_height = 18.0;
        let top = rect.top() - line_height / 2.0;
        for (i, line) in lines.iter().enumerate() {
            draw.text(line)
                .x_y(rect.x(), top - i as f32 * line_height)
                .w_h(rect.w(), line_height)
                .left_justify()
                .color(rgb(0.85, 0.85, 0.85))
                .font_size(13);
        }
    }
}
