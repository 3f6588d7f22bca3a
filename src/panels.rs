//! Plain-data content for the on-screen panels.
//!
//! These functions decide what the info panel, the coordinate readout and the
//! magnitude legend say and where the info panel goes. The HUD plugin turns
//! the results into UI nodes.

use crate::quakes::Quake;
use crate::selection::CoordinateReadout;
use crate::utils::color::{Rgb8, gradient_samples};
use crate::utils::geo::GeoPoint;
use crate::utils::lunar::phase_name;
use bevy::prelude::*;

/// Room reserved for the info panel so it never leaves the window.
pub const INFO_PANEL_RESERVE: Vec2 = Vec2::new(250.0, 160.0);

/// Top-left corner of the info panel for a click at `click`, kept inside a
/// window of `window` logical pixels.
pub fn info_panel_position(click: Vec2, window: Vec2) -> Vec2 {
    let limit = (window - INFO_PANEL_RESERVE).max(Vec2::ZERO);
    click.max(Vec2::ZERO).min(limit)
}

/// Label/value rows describing one quake.
pub fn info_lines(quake: &Quake, phase: f64) -> Vec<(&'static str, String)> {
    let mut lines = vec![
        ("Year", quake.timestamp.year.to_string()),
        ("Day", quake.timestamp.day.to_string()),
        ("Time", quake.timestamp.time_of_day()),
        (
            "Coordinates",
            format!(
                "{}, {}",
                quake.location.latitude, quake.location.longitude
            ),
        ),
        ("Magnitude", quake.magnitude.to_string()),
        ("Moon", format!("{} ({:.0}%)", phase_name(phase), phase * 100.0)),
    ];
    if !quake.stations.is_empty() {
        lines.push(("Stations", quake.stations.join(", ")));
    }
    lines
}

/// Info panel text, one row per line.
pub fn info_text(quake: &Quake, phase: f64) -> String {
    info_lines(quake, phase)
        .into_iter()
        .map(|(label, value)| format!("{label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_geo(point: GeoPoint) -> String {
    format!(
        "Latitude: {:.6}; Longitude: {:.6}",
        point.latitude, point.longitude
    )
}

/// Readout text: the camera position always, the pointer position only while
/// it is over the surface.
pub fn readout_text(readout: &CoordinateReadout) -> String {
    let camera = readout
        .camera
        .map(|point| format!("Camera {}", format_geo(point)))
        .unwrap_or_default();
    match readout.pointer {
        Some(point) => format!("{camera}\nPointer {}", format_geo(point)),
        None => camera,
    }
}

/// Content of the magnitude legend.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub min: f64,
    pub mid: f64,
    pub max: f64,
    /// Gradient stops from the top (max) to the bottom (min).
    pub stops: Vec<Rgb8>,
}

impl Legend {
    pub fn new(min: f64, max: f64, steps: usize) -> Self {
        let stops = gradient_samples(min, max, steps.max(2))
            .into_iter()
            .rev()
            .map(|(_, color)| color)
            .collect();
        Self {
            min,
            mid: (min + max) / 2.0,
            max,
            stops,
        }
    }

    /// Labels from top to bottom.
    pub fn labels(&self) -> [String; 3] {
        [
            format_magnitude(self.max),
            format_magnitude(self.mid),
            format_magnitude(self.min),
        ]
    }
}

fn format_magnitude(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}
