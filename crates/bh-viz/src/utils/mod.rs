mod config;

pub use config::{clamp_zoom, Config};
