//! Help overlay showing keyboard shortcuts.

use nannou::prelude::*;

/// Manages help overlay visibility
pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn draw(&self, draw: &Draw, paused: bool, extra_presets: usize) {
        if !self.visible {
            return;
        }

        let padding = 25.0;
        let line_height = 24.0;
        let font_size = 18;

        let user_presets = match extra_presets {
            0 => String::from("Config presets (none declared)"),
            n => format!("Config presets ({} declared)", n.min(6)),
        };

        let shortcuts: [(&str, &str); 17] = [
            ("h", "Toggle this help"),
            ("q", "Quit"),
            ("", ""),
            ("--- Parameters ---", ""),
            ("Up/Down", "Select parameter"),
            ("Left/Right", "Adjust selected parameter"),
            ("Shift", "Hold for a x10 step"),
            ("1 / 2 / 3", "Sgr A* / M87* / Cygnus X-1"),
            ("4-9", &user_presets),
            ("0", "Custom (keep current values)"),
            ("r", "Reset to defaults"),
            ("", ""),
            ("--- View ---", ""),
            ("z / x", "Zoom in / out"),
            ("u", "Toggle km / Schwarzschild units"),
            (
                "p",
                if paused {
                    "Resume rotation (currently PAUSED)"
                } else {
                    "Pause rotation"
                },
            ),
            ("Esc", "Close help"),
        ];

        let overlay_height = line_height * (shortcuts.len() as f32) + padding * 2.0;
        let overlay_width = 580.0;
        let key_col_width = 120.0;

        // Semi-transparent background
        draw.rect()
            .x_y(0.0, 0.0)
            .w_h(overlay_width, overlay_height)
            .color(rgba(0.0, 0.0, 0.0, 0.9));

        // Border
        draw.rect()
            .x_y(0.0, 0.0)
            .w_h(overlay_width, overlay_height)
            .stroke(rgba(1.0, 1.0, 1.0, 0.3))
            .stroke_weight(1.0)
            .no_fill();

        let start_y = overlay_height / 2.0 - padding - line_height / 2.0;
        let left_edge = -overlay_width / 2.0 + padding;
        let desc_width = overlay_width - key_col_width - padding * 2.0 - 15.0;

        for (i, (key, desc)) in shortcuts.iter().enumerate() {
            let y = start_y - (i as f32) * line_height;

            if key.is_empty() && desc.is_empty() {
                continue;
            }

            if key.starts_with("---") {
                // Section header
                draw.text(key)
                    .xy(pt2(0.0, y))
                    .wh(pt2(overlay_width - padding * 2.0, line_height))
                    .center_justify()
                    .color(rgba(1.0, 0.7, 0.4, 0.8))
                    .font_size(font_size);
            } else {
                draw.text(key)
                    .xy(pt2(left_edge + key_col_width / 2.0, y))
                    .wh(pt2(key_col_width, line_height))
                    .right_justify()
                    .color(rgb(1.0, 0.6, 0.2))
                    .font_size(font_size);

                draw.text(desc)
                    .xy(pt2(left_edge + key_col_width + 15.0 + desc_width / 2.0, y))
                    .wh(pt2(desc_width, line_height))
                    .left_justify()
                    .color(rgb(1.0, 1.0, 1.0))
                    .font_size(font_size);
            }
        }
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}
