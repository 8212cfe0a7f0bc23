use anyhow::{Context, Result};
use clap::Parser;
use std::{fs::File, path::PathBuf, sync::Mutex};

pub(crate) const DEFAULT_SUN_EARTH_KM: &str = "149600000";
pub(crate) const DEFAULT_EARTH_MOON_KM: &str = "384400";
pub(crate) const DEFAULT_YEAR_DAYS: &str = "365.25";
pub(crate) const DEFAULT_MONTH_DAYS: &str = "27.32";
pub(crate) const DEFAULT_MOON_SCALE: &str = "50";

pub(crate) const DEFAULT_SAMPLES: usize = 10_000;

#[derive(Parser, Debug)]
#[command(name = "moontrace", about = "Plot the Moon's path around the Sun in your terminal")]
pub(crate) struct Args {
    /// number of time samples along one year
    #[arg(long, default_value_t = DEFAULT_SAMPLES as u64, value_parser = clap::value_parser!(u64).range(2..))]
    samples: u64,

    /// draw with plain ASCII instead of braille dots
    #[arg(long, default_value_t = false)]
    ascii: bool,

    /// monochrome output
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// write logs to this file (the screen belongs to the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// maximum log level written to --log-file
    #[arg(long, default_value_t = tracing::Level::INFO)]
    log_level: tracing::Level,
}

impl Args {
    pub(crate) fn sample_count(&self) -> usize {
        self.samples as usize
    }

    pub(crate) fn render_config(&self) -> RenderConfig {
        RenderConfig {
            glyphs: if self.ascii {
                GlyphSet::Ascii
            } else {
                GlyphSet::Braille
            },
            color: !self.no_color,
        }
    }
}

/// How plot pixels become terminal characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum GlyphSet {
    /// 2×4 dots per cell (U+2800..U+28FF).
    Braille,
    /// One pixel per cell, density characters.
    Ascii,
}

impl GlyphSet {
    /// Pixels per cell as (columns, rows).
    pub(crate) fn subpixels(self) -> (u32, u32) {
        match self {
            GlyphSet::Braille => (2, 4),
            GlyphSet::Ascii => (1, 1),
        }
    }

    /// Height of one pixel divided by its width, for a cell roughly twice as tall as wide.
    pub(crate) fn pixel_aspect(self) -> f64 {
        let (sx, sy) = self.subpixels();
        2.0 * sx as f64 / sy as f64
    }
}

/// Rendering setup chosen once at start-up and handed to the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RenderConfig {
    pub(crate) glyphs: GlyphSet,
    pub(crate) color: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            glyphs: GlyphSet::Braille,
            color: true,
        }
    }
}

pub(crate) fn init_logging(args: &Args) -> Result<()> {
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(args.log_level)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_uses_defaults() {
        let args = Args::try_parse_from(["moontrace"]).unwrap();
        assert_eq!(args.sample_count(), 10_000);
        assert_eq!(args.render_config(), RenderConfig::default());
        assert!(args.log_file.is_none());
        assert_eq!(args.log_level, tracing::Level::INFO);
    }

    #[test]
    fn flags_map_to_render_config() {
        let args =
            Args::try_parse_from(["moontrace", "--ascii", "--no-color", "--samples", "500"]).unwrap();
        assert_eq!(args.sample_count(), 500);
        assert_eq!(
            args.render_config(),
            RenderConfig {
                glyphs: GlyphSet::Ascii,
                color: false
            }
        );
    }

    #[test]
    fn rejects_fewer_than_two_samples() {
        assert!(Args::try_parse_from(["moontrace", "--samples", "1"]).is_err());
    }

    #[test]
    fn braille_pixels_are_square() {
        assert_eq!(GlyphSet::Braille.pixel_aspect(), 1.0);
        assert_eq!(GlyphSet::Ascii.pixel_aspect(), 2.0);
    }
}
