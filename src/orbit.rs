use crate::model::{OrbitParameters, Point, Trajectory};
use crate::plot::{Figure, GridStyle, LineKind, Marker, Rgb, Series, SeriesStyle};
use std::f64::consts::TAU;

const SUN_COLOR: Rgb = Rgb { r: 235, g: 60, b: 50 };
const EARTH_COLOR: Rgb = Rgb { r: 70, g: 120, b: 255 };
const MOON_COLOR: Rgb = Rgb { r: 60, g: 200, b: 90 };

/// `n` evenly spaced values from `start` to `end`, both included.
pub(crate) fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            // pin the endpoint so accumulated rounding never overshoots it
            out[n - 1] = end;
            out
        }
    }
}

/// Radians per day for a circular orbit of the given period.
pub(crate) fn angular_rate(period_days: f64) -> f64 {
    TAU / period_days
}

/// Samples one Earth year of the Earth and Moon positions in the Sun's frame.
///
/// Earth moves on a circle of radius `sun_earth_distance`; the Moon circles Earth at its
/// true angular rate but at `earth_moon_distance * moon_scale_factor`.
pub(crate) fn generate(params: &OrbitParameters, sample_count: usize) -> Trajectory {
    let times = linspace(0.0, params.year_length_days, sample_count);
    let earth_rate = angular_rate(params.year_length_days);
    let moon_rate = angular_rate(params.month_length_days);
    let moon_radius = params.apparent_moon_radius();

    tracing::debug!(
        samples = sample_count,
        earth_rate,
        moon_rate,
        moon_radius,
        "generating trajectory"
    );

    let mut earth_path = Vec::with_capacity(times.len());
    let mut moon_path = Vec::with_capacity(times.len());
    for &t in &times {
        let (se, ce) = (earth_rate * t).sin_cos();
        let earth = Point::new(params.sun_earth_distance * ce, params.sun_earth_distance * se);
        let (sm, cm) = (moon_rate * t).sin_cos();
        let moon = earth.add(Point::new(moon_radius * cm, moon_radius * sm));
        earth_path.push(earth);
        moon_path.push(moon);
    }

    Trajectory {
        times,
        earth_path,
        moon_path,
    }
}

/// Wraps a trajectory into the figure handed to the renderer.
pub(crate) fn figure(params: &OrbitParameters, trajectory: Trajectory) -> Figure {
    tracing::debug!(
        samples = trajectory.len(),
        span_days = trajectory.span_days(),
        "building figure"
    );
    let Trajectory {
        earth_path,
        moon_path,
        ..
    } = trajectory;

    let sun = Series {
        label: "Sun".to_string(),
        points: vec![Point::ORIGIN],
        style: SeriesStyle {
            color: SUN_COLOR,
            line: LineKind::None,
            width: 0.0,
            alpha: 1.0,
            marker: Some(Marker::Disc { radius: 3.0 }),
        },
    };
    let earth = Series {
        label: "Earth orbit".to_string(),
        points: earth_path,
        style: SeriesStyle {
            color: EARTH_COLOR,
            line: LineKind::Dashed,
            width: 1.0,
            alpha: 0.4,
            marker: None,
        },
    };
    let moon = Series {
        label: format!(
            "Moon path (scale: {}x)",
            params.moon_scale_factor.trunc() as i64
        ),
        points: moon_path,
        style: SeriesStyle {
            color: MOON_COLOR,
            line: LineKind::Solid,
            width: 0.8,
            alpha: 0.9,
            marker: None,
        },
    };

    Figure {
        title: format!(
            "Moon trajectory in the Sun's frame (simulated: {:?} days)",
            params.year_length_days
        ),
        x_label: "Distance (km)".to_string(),
        y_label: "Distance (km)".to_string(),
        series: vec![sun, earth, moon],
        equal_aspect: true,
        grid: Some(GridStyle {
            line: LineKind::Dotted,
            alpha: 0.6,
        }),
        legend: true,
    }
}
