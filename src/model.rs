use crate::config;
use std::fmt;

/// A position in the Sun-centred frame, in kilometres.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Point {
    pub(crate) x: f64,
    pub(crate) y: f64,
}

impl Point {
    pub(crate) const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub(crate) fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
    pub(crate) fn add(self, o: Point) -> Point {
        Point { x: self.x + o.x, y: self.y + o.y }
    }
    #[cfg(test)]
    pub(crate) fn sub(self, o: Point) -> Point {
        Point { x: self.x - o.x, y: self.y - o.y }
    }
    #[cfg(test)]
    pub(crate) fn len(self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// The five inputs of the parameter form, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum FieldId {
    Au,
    EmDist,
    Year,
    Month,
    Scale,
}

impl FieldId {
    pub(crate) const ALL: [FieldId; 5] = [
        FieldId::Au,
        FieldId::EmDist,
        FieldId::Year,
        FieldId::Month,
        FieldId::Scale,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            FieldId::Au => 0,
            FieldId::EmDist => 1,
            FieldId::Year => 2,
            FieldId::Month => 3,
            FieldId::Scale => 4,
        }
    }

    pub(crate) fn key(self) -> &'static str {
        match self {
            FieldId::Au => "AU",
            FieldId::EmDist => "EM_DIST",
            FieldId::Year => "YEAR",
            FieldId::Month => "MONTH",
            FieldId::Scale => "SCALE",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            FieldId::Au => "Sun-Earth mean distance (km):",
            FieldId::EmDist => "Earth-Moon mean distance (km):",
            FieldId::Year => "Earth orbital period (days):",
            FieldId::Month => "Moon orbital period (days):",
            FieldId::Scale => "Moon path magnification:",
        }
    }

    pub(crate) fn default_text(self) -> &'static str {
        match self {
            FieldId::Au => config::DEFAULT_SUN_EARTH_KM,
            FieldId::EmDist => config::DEFAULT_EARTH_MOON_KM,
            FieldId::Year => config::DEFAULT_YEAR_DAYS,
            FieldId::Month => config::DEFAULT_MONTH_DAYS,
            FieldId::Scale => config::DEFAULT_MOON_SCALE,
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldId::Au => "Sun-Earth distance",
            FieldId::EmDist => "Earth-Moon distance",
            FieldId::Year => "Earth period",
            FieldId::Month => "Moon period",
            FieldId::Scale => "Magnification",
        };
        f.write_str(name)
    }
}

/// Validated inputs of one submission. Built fresh from a form snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct OrbitParameters {
    pub(crate) sun_earth_distance: f64,
    pub(crate) earth_moon_distance: f64,
    pub(crate) year_length_days: f64,
    pub(crate) month_length_days: f64,
    pub(crate) moon_scale_factor: f64,
}

impl OrbitParameters {
    /// Radius of the Moon's circle around Earth as drawn.
    pub(crate) fn apparent_moon_radius(&self) -> f64 {
        self.earth_moon_distance * self.moon_scale_factor
    }
}

/// Sampled Earth and Moon paths; index `i` of both paths is the same instant `times[i]`.
#[derive(Clone, Debug, Default)]
pub(crate) struct Trajectory {
    pub(crate) times: Vec<f64>,
    pub(crate) earth_path: Vec<Point>,
    pub(crate) moon_path: Vec<Point>,
}

impl Trajectory {
    pub(crate) fn len(&self) -> usize {
        self.times.len()
    }

    /// Simulated time covered by the samples, in days.
    pub(crate) fn span_days(&self) -> f64 {
        match (self.times.first(), self.times.last()) {
            (Some(a), Some(b)) => b - a,
            _ => 0.0,
        }
    }
}
