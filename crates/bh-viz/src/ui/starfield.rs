//! Static background stars, generated once at start-up.

use nannou::prelude::*;
use rand::Rng;

/// Number of stars in background
const NUM_STARS: usize = if cfg!(debug_assertions) { 150 } else { 400 };

#[derive(Clone)]
struct Star {
    /// Position in [-1, 1] on both axes
    x: f32,
    y: f32,
    brightness: f32,
    size: f32,
}

pub struct Starfield {
    stars: Vec<Star>,
}

impl Starfield {
    pub fn new() -> Self {
        let mut rng = rand::rng();
        let stars = (0..NUM_STARS)
            .map(|_| Star {
                x: rng.random_range(-1.0..1.0),
                y: rng.random_range(-1.0..1.0),
                brightness: rng.random_range(0.2..1.0),
                size: rng.random_range(0.8..2.2),
            })
            .collect();
        Self { stars }
    }

    /// Brightness multiplier at normalised distance `d` from the hole; stars
    /// fade out inside `hole_radius`.
    pub fn dimming(d: f32, hole_radius: f32) -> f32 {
        if hole_radius <= 0.0 {
            return 1.0;
        }
        ((d - hole_radius) / hole_radius).clamp(0.0, 1.0)
    }

    /// `hole_radius` is the fraction of the half-extent kept dark.
    pub fn draw(&self, draw: &Draw, bounds: Rect, center: Point2, hole_radius: f32) {
        let half_w = bounds.w() / 2.0;
        let half_h = bounds.h() / 2.0;
        let scale = half_w.min(half_h);

        for star in &self.stars {
            let x = bounds.x() + star.x * half_w;
            let y = bounds.y() + star.y * half_h;
            let d = pt2(x, y).distance(center) / scale;
            let brightness = star.brightness * Self::dimming(d, hole_radius);
            if brightness <= 0.01 {
                continue;
            }

            draw.ellipse()
                .x_y(x, y)
                .w_h(star.size, star.size)
                .color(srgba(
                    (brightness * 255.0) as u8,
                    (brightness * 240.0) as u8,
                    (brightness * 255.0) as u8,
                    (brightness * 200.0) as u8,
                ));
        }
    }
}

impl Default for Starfield {
    fn default() -> Self {
        Self::new()
    }
}
